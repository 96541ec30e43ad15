//! # Logging
//!
//! `tracing` subscriber setup. `RUST_LOG` wins when set; otherwise the crate
//! logs at the configured level.

use crate::config::ControllerConfig;
use crate::constants::LOG_TARGET;
use tracing_subscriber::EnvFilter;

/// Default filter directive for the configured level, e.g. `gitlab_bucket_controller=info`
#[must_use]
pub fn default_directive(config: &ControllerConfig) -> String {
    format!("{LOG_TARGET}={}", config.log_level.to_lowercase())
}

/// Install the global `fmt` subscriber
///
/// Returns `false` when a subscriber was already installed, which is not an
/// error: tests and embedding processes may have set one up first.
pub fn init_tracing(config: &ControllerConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let result = if config.json_logs() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_ansi(config.log_enable_color)
            .with_env_filter(filter)
            .try_init()
    };
    result.is_ok()
}
