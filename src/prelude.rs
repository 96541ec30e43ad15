//! # Prelude
//!
//! Re-exports commonly used types and traits for convenience.
//!
//! ## Usage
//!
//! ```rust
//! use gitlab_bucket_controller::prelude::*;
//! ```
//!
//! This brings into scope:
//! - All CRD types (GitLab, Bucket, ResourceClaimStatus, etc.)
//! - Collaborator traits (ObjectStore, ResourceClassResolver, SecretUpdater)
//! - Reconciler types (BucketReconciler, ReconcileError, etc.)
//! - Config types (ControllerConfig)

// CRD types - most commonly used
pub use crate::crd::*;

// Collaborator traits - needed for wiring and for test doubles
pub use crate::controller::class::{KubeResourceClassResolver, ResourceClassResolver};
pub use crate::controller::store::{KubeStore, ObjectKey, ObjectStore, StoreError};
pub use crate::provider::{SecretUpdater, SecretUpdaters};

// Reconciler types - core controller functionality
pub use crate::controller::helm_values::{HelmValuesFn, Values};
pub use crate::controller::reconciler::{
    bucket_reconcilers, BucketReconciler, GitLabSecretTransformer, ReconcileError,
    SecretTransformer,
};

// Config types - for configuration management
pub use crate::config::ControllerConfig;
