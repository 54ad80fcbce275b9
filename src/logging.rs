//! # Structured Logging
//!
//! Environment-aware console logging through `tracing`.
//!
//! - Environment comes from `DISPATCH_BENCH_ENV`, then `APP_ENV`, defaulting to
//!   `development`.
//! - `RUST_LOG` wins over the environment default level.
//! - The `benchmark` and `production` environments default to `warn`, which
//!   keeps per-unit `debug!`/`trace!` events out of timed runs.
//! - `DISPATCH_BENCH_LOG_FORMAT=json` switches to JSON lines; otherwise output
//!   is human-readable with ANSI colors only on a terminal.

use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::constants::env;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging once per process.
///
/// Safe to call repeatedly and when another global subscriber is already
/// installed (for example by a test harness); in that case it does nothing.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);
        let json_output = std::env::var(env::LOG_FORMAT)
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let use_ansi = !json_output && IsTerminal::is_terminal(&std::io::stdout());

        let init_result = if json_output {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_thread_names(true)
                        .with_level(true)
                        .with_filter(EnvFilter::new(&log_level)),
                )
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_thread_names(true)
                        .with_level(true)
                        .with_ansi(use_ansi)
                        .with_filter(EnvFilter::new(&log_level)),
                )
                .try_init()
        };

        if init_result.is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        } else {
            tracing::info!(
                environment = %environment,
                log_level = %log_level,
                json_output,
                ansi_colors = use_ansi,
                "Structured logging initialized"
            );
        }
    });
}

fn get_environment() -> String {
    std::env::var(env::ENVIRONMENT)
        .or_else(|_| std::env::var(env::APP_ENVIRONMENT))
        .unwrap_or_else(|_| "development".to_string())
}

fn get_log_level(environment: &str) -> String {
    if let Ok(level) = std::env::var("RUST_LOG") {
        return level.to_lowercase();
    }
    default_log_level(environment).to_string()
}

fn default_log_level(environment: &str) -> &'static str {
    match environment {
        "test" | "development" => "debug",
        "benchmark" | "production" => "warn",
        _ => "debug",
    }
}
