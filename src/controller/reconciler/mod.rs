//! # Reconciler
//!
//! Claim reconciliation for the object storage a `GitLab` needs.
//!
//! For every GitLab bucket the reconciler:
//! - Resolves the provisioning class for the owner's provider
//! - Creates the `Bucket` claim if it does not exist yet
//! - Records the claim status reported by the provisioner
//! - Derives the GitLab connection secret once the claim is Ready
//! - Projects the connection into helm values on demand
//!
//! ## Default buckets
//!
//! | Bucket          | Helm values                         |
//! |-----------------|-------------------------------------|
//! | `artifacts`     | `global.appConfig.artifacts`        |
//! | `lfs`           | `global.appConfig.lfs`              |
//! | `packages`      | `global.appConfig.packages`         |
//! | `pseudonymizer` | `global.appConfig.pseudonymizer`    |
//! | `uploads`       | `global.appConfig.uploads`          |
//! | `backups`       | backup target and task runner config |
//! | `backups-tmp`   | `global.appConfig.backups.tmpBucket` |

pub mod bucket;
pub mod error;
pub mod naming;
pub mod transform;

pub use bucket::BucketReconciler;
pub use error::ReconcileError;
pub use transform::{GitLabSecretTransformer, SecretTransformer};

use crate::controller::class::ResourceClassResolver;
use crate::controller::helm_values::{
    bucket_backups_helm_values, bucket_backups_temp_helm_values, bucket_connection_helm_values,
    HelmValuesFn,
};
use crate::controller::store::ObjectStore;
use crate::crd::GitLab;
use crate::provider::SecretUpdaters;
use std::sync::Arc;

/// GitLab buckets and the projectors that expose each one to the chart
pub const DEFAULT_BUCKETS: [(&str, HelmValuesFn); 7] = [
    ("artifacts", bucket_connection_helm_values),
    ("lfs", bucket_connection_helm_values),
    ("packages", bucket_connection_helm_values),
    ("pseudonymizer", bucket_connection_helm_values),
    ("uploads", bucket_connection_helm_values),
    ("backups", bucket_backups_helm_values),
    ("backups-tmp", bucket_backups_temp_helm_values),
];

/// One reconciler per default bucket of `owner`
#[must_use]
pub fn bucket_reconcilers(
    owner: &Arc<GitLab>,
    store: &Arc<dyn ObjectStore>,
    resolver: &Arc<dyn ResourceClassResolver>,
    updaters: &Arc<SecretUpdaters>,
) -> Vec<BucketReconciler> {
    DEFAULT_BUCKETS
        .iter()
        .map(|(name, helm_values_fn)| {
            BucketReconciler::new(
                Arc::clone(owner),
                Arc::clone(store),
                Arc::clone(resolver),
                Arc::clone(updaters),
                *name,
                vec![*helm_values_fn],
            )
        })
        .collect()
}
