//! # Constants
//!
//! Shared defaults used throughout the controller.
//!
//! These values represent reasonable defaults and can be overridden via
//! environment variables where applicable.

/// Default log level when neither `RUST_LOG` nor `LOG_LEVEL` is set
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Default log format (json, text)
pub const DEFAULT_LOG_FORMAT: &str = "json";

pub const DEFAULT_LOG_ENABLE_COLOR: bool = false;

pub const DEFAULT_ENABLE_METRICS: bool = true;

/// Default prefix for secret names referenced from helm values
pub const DEFAULT_HELM_SECRET_PREFIX: &str = "";

/// Crate-level tracing target used for the default log filter
pub const LOG_TARGET: &str = "gitlab_bucket_controller";
