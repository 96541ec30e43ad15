//! # Metrics
//!
//! Prometheus metrics for monitoring the controller.
//!
//! ## Metrics Exposed
//!
//! - `gitlab_controller_reconciliations_total` - Total number of claim reconciliations
//! - `gitlab_controller_reconciliation_errors_total` - Reconciliation errors by error kind
//! - `gitlab_controller_reconciliation_duration_seconds` - Duration of claim reconciliations
//! - `gitlab_controller_claims_created_total` - Total number of claims created
//! - `gitlab_controller_secret_transforms_total` - Derived secrets written, by provider
//! - `gitlab_controller_secret_transform_errors_total` - Secret transform failures, by provider

use anyhow::Result;
use prometheus::{Encoder, Histogram, IntCounter, IntCounterVec, Registry, TextEncoder};
use std::sync::LazyLock;

// Metrics
pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static RECONCILIATIONS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "gitlab_controller_reconciliations_total",
        "Total number of claim reconciliations",
    )
    .expect("Failed to create RECONCILIATIONS_TOTAL metric - this should never happen")
});

static RECONCILIATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "gitlab_controller_reconciliation_errors_total",
            "Total number of reconciliation errors by error kind",
        ),
        &["kind"],
    )
    .expect("Failed to create RECONCILIATION_ERRORS_TOTAL metric - this should never happen")
});

static RECONCILIATION_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "gitlab_controller_reconciliation_duration_seconds",
            "Duration of claim reconciliation in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
    )
    .expect("Failed to create RECONCILIATION_DURATION metric - this should never happen")
});

static CLAIMS_CREATED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "gitlab_controller_claims_created_total",
        "Total number of resource claims created",
    )
    .expect("Failed to create CLAIMS_CREATED_TOTAL metric - this should never happen")
});

// Provider-specific metrics with provider label
static SECRET_TRANSFORMS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "gitlab_controller_secret_transforms_total",
            "Total number of derived connection secrets written by provider",
        ),
        &["provider"],
    )
    .expect("Failed to create SECRET_TRANSFORMS_TOTAL metric - this should never happen")
});

pub(crate) static SECRET_TRANSFORM_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "gitlab_controller_secret_transform_errors_total",
            "Total number of secret transform failures by provider",
        ),
        &["provider"],
    )
    .expect("Failed to create SECRET_TRANSFORM_ERRORS_TOTAL metric - this should never happen")
});

#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(RECONCILIATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(CLAIMS_CREATED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SECRET_TRANSFORMS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SECRET_TRANSFORM_ERRORS_TOTAL.clone()))?;

    Ok(())
}

/// Render every registered metric in the Prometheus text format
#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn gather_metrics() -> Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

pub fn increment_reconciliations() {
    RECONCILIATIONS_TOTAL.inc();
}

pub fn increment_reconciliation_errors(kind: &str) {
    RECONCILIATION_ERRORS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn observe_reconciliation_duration(duration: f64) {
    RECONCILIATION_DURATION.observe(duration);
}

pub fn increment_claims_created() {
    CLAIMS_CREATED_TOTAL.inc();
}

pub fn increment_secret_transforms(provider: &str) {
    SECRET_TRANSFORMS_TOTAL.with_label_values(&[provider]).inc();
}

/// Increment secret transform errors counter
pub fn increment_secret_transform_errors(provider: &str) {
    SECRET_TRANSFORM_ERRORS_TOTAL
        .with_label_values(&[provider])
        .inc();
}
