//! Configuration loading from files layered under environment overrides.

use std::io::Write;

use dispatch_bench::{BenchConfig, BenchError, DispatchMode, RuntimeFlavor};

fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("dispatch-bench-")
        .suffix(suffix)
        .tempfile()
        .expect("temp config file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn test_load_toml_file() {
    let file = write_config(
        ".toml",
        r#"
worker_threads = 6
dispatch_mode = "blocking_runtime"
runtime_flavor = "multi_thread"
work_factor = 2500
"#,
    );

    let config = BenchConfig::from_sources(Some(file.path()), "CFG_IT_TOML").unwrap();

    assert_eq!(config.worker_threads, 6);
    assert_eq!(config.dispatch_mode, DispatchMode::BlockingRuntime);
    assert_eq!(config.runtime_flavor, RuntimeFlavor::MultiThread);
    assert_eq!(config.work_factor, 2500);
    // Unset fields keep their defaults.
    assert_eq!(config.loop_count, BenchConfig::default().loop_count);
    assert_eq!(config.thread_name_prefix, "bench-worker");
}

#[test]
fn test_load_yaml_file() {
    let file = write_config(
        ".yaml",
        "worker_threads: 2\nloop_count: 12\nthread_name_prefix: yaml-worker\n",
    );

    let config = BenchConfig::from_sources(Some(file.path()), "CFG_IT_YAML").unwrap();

    assert_eq!(config.worker_threads, 2);
    assert_eq!(config.loop_count, 12);
    assert_eq!(config.thread_name_prefix, "yaml-worker");
}

#[test]
fn test_environment_overrides_file() {
    let file = write_config(".toml", "worker_threads = 6\nloop_count = 10\n");

    std::env::set_var("CFG_IT_LAYERED_LOOP_COUNT", "99");
    let result = BenchConfig::from_sources(Some(file.path()), "CFG_IT_LAYERED");
    std::env::remove_var("CFG_IT_LAYERED_LOOP_COUNT");

    let config = result.unwrap();
    assert_eq!(config.worker_threads, 6);
    assert_eq!(config.loop_count, 99);
}

#[test]
fn test_missing_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    assert!(matches!(
        BenchConfig::from_sources(Some(&missing), "CFG_IT_MISSING"),
        Err(BenchError::Configuration(_))
    ));
}

#[test]
fn test_file_values_are_validated() {
    let file = write_config(".toml", "work_factor = -10\n");

    assert!(matches!(
        BenchConfig::from_sources(Some(file.path()), "CFG_IT_INVALID"),
        Err(BenchError::Configuration(_))
    ));
}
