//! # Reconcile Errors
//!
//! Every failure a claim reconcile or secret transform can surface. Each
//! variant keeps the underlying cause and enough identity to diagnose it
//! without re-deriving names from logs.

use crate::controller::store::{ObjectKey, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("cannot find resource class for claim type: {claim_kind}, provider: {provider}")]
    ClassResolution {
        claim_kind: String,
        provider: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to retrieve {claim_kind} instance: {key}")]
    ClaimFetch {
        claim_kind: String,
        key: ObjectKey,
        #[source]
        source: StoreError,
    },

    #[error("failed to create {claim_kind} instance: {key}")]
    ClaimCreate {
        claim_kind: String,
        key: ObjectKey,
        #[source]
        source: StoreError,
    },

    #[error("resource status is not found")]
    StatusNotFound,

    #[error("failed to retrieve connection secret: {key}")]
    SecretFetch {
        key: ObjectKey,
        #[source]
        source: StoreError,
    },

    #[error("provider is not supported: {provider:?}")]
    UnsupportedProvider { provider: String },

    #[error("failed to update connection secret data: {key}")]
    SecretDataUpdate {
        key: ObjectKey,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to update connection secret: {key}")]
    SecretPersist {
        key: ObjectKey,
        #[source]
        source: StoreError,
    },

    #[error("cannot merge helm values at {path}: existing value is not a map")]
    ValuesConflict { path: String },
}

impl ReconcileError {
    /// Short, stable label for metrics
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ClassResolution { .. } => "class_resolution",
            Self::ClaimFetch { .. } => "claim_fetch",
            Self::ClaimCreate { .. } => "claim_create",
            Self::StatusNotFound => "status_not_found",
            Self::SecretFetch { .. } => "secret_fetch",
            Self::UnsupportedProvider { .. } => "unsupported_provider",
            Self::SecretDataUpdate { .. } => "secret_data_update",
            Self::SecretPersist { .. } => "secret_persist",
            Self::ValuesConflict { .. } => "values_conflict",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_claim_create_message_and_source() {
        let key = ObjectKey::new("default", "gitlab-bucket-lfs");
        let err = ReconcileError::ClaimCreate {
            claim_kind: "bucket-lfs".to_string(),
            key: key.clone(),
            source: StoreError::AlreadyExists(key),
        };
        assert_eq!(
            err.to_string(),
            "failed to create bucket-lfs instance: default/gitlab-bucket-lfs"
        );
        let source = err.source().expect("cause is kept");
        assert_eq!(source.to_string(), "default/gitlab-bucket-lfs already exists");
    }

    #[test]
    fn test_unsupported_provider_names_discriminator() {
        let err = ReconcileError::UnsupportedProvider {
            provider: "alibaba".to_string(),
        };
        assert_eq!(err.to_string(), "provider is not supported: \"alibaba\"");
        assert_eq!(err.kind(), "unsupported_provider");
    }

    #[test]
    fn test_class_resolution_keeps_anyhow_source() {
        let err = ReconcileError::ClassResolution {
            claim_kind: "bucket-uploads".to_string(),
            provider: "gcp-provider".to_string(),
            source: anyhow::anyhow!("test-error"),
        };
        assert!(err.to_string().contains("bucket-uploads"));
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("test-error"));
    }
}
