//! # Controller Configuration
//!
//! Controller-level settings loaded from environment variables.

use crate::constants::{
    DEFAULT_ENABLE_METRICS, DEFAULT_HELM_SECRET_PREFIX, DEFAULT_LOG_ENABLE_COLOR,
    DEFAULT_LOG_FORMAT, DEFAULT_LOG_LEVEL,
};

/// Controller-level configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
/// Environment variables are populated from a ConfigMap using `envFrom` in the deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Global log level (ERROR, WARN, INFO, DEBUG, TRACE)
    /// Used when `RUST_LOG` is not set
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
    /// Enable color in text format logs
    pub log_enable_color: bool,
    /// Enable metrics collection
    pub enable_metrics: bool,
    /// Prefix prepended to derived secret names in helm values
    /// Matches the prefix the chart applies to secrets it mounts
    pub helm_secret_prefix: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: DEFAULT_LOG_FORMAT.to_string(),
            log_enable_color: DEFAULT_LOG_ENABLE_COLOR,
            enable_metrics: DEFAULT_ENABLE_METRICS,
            helm_secret_prefix: DEFAULT_HELM_SECRET_PREFIX.to_string(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            log_level: env_var_or_default_str("LOG_LEVEL", DEFAULT_LOG_LEVEL),
            log_format: env_var_or_default_str("LOG_FORMAT", DEFAULT_LOG_FORMAT),
            log_enable_color: env_var_or_default_bool("LOG_ENABLE_COLOR", DEFAULT_LOG_ENABLE_COLOR),
            enable_metrics: env_var_or_default_bool("ENABLE_METRICS", DEFAULT_ENABLE_METRICS),
            helm_secret_prefix: env_var_or_default_str(
                "HELM_SECRET_PREFIX",
                DEFAULT_HELM_SECRET_PREFIX,
            ),
        }
    }

    /// Whether logs should be emitted as JSON lines
    #[must_use]
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

/// Read environment variable as boolean or return default
fn env_var_or_default_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| parse_bool(&v))
        .unwrap_or(default)
}

fn parse_bool(value: &str) -> bool {
    let v_lower = value.to_lowercase();
    v_lower == "true" || v_lower == "1" || v_lower == "yes" || v_lower == "on"
}

/// Read environment variable as string or return default
fn env_var_or_default_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
