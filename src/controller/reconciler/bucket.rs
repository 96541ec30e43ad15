//! # Bucket Claim Reconciler
//!
//! Ensures one `Bucket` claim exists for one GitLab object-storage bucket,
//! records the claim's status and, once the claim is Ready, hands the status
//! to the [`SecretTransformer`]. Helm values are projected from the same
//! status on demand.

use super::error::ReconcileError;
use super::naming;
use super::transform::{GitLabSecretTransformer, SecretTransformer};
use crate::controller::class::ResourceClassResolver;
use crate::controller::helm_values::{HelmValuesFn, Values};
use crate::controller::store::{ObjectKey, ObjectStore};
use crate::crd::{Bucket, BucketSpec, GitLab, ObjectReference, ResourceClaimStatus};
use crate::observability::metrics;
use crate::provider::SecretUpdaters;
use k8s_openapi::api::core::v1::Secret;
use kube::api::ObjectMeta;
use kube::{Resource, ResourceExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, Instrument};

/// Reconciler for a single bucket claim of a `GitLab`
pub struct BucketReconciler {
    owner: Arc<GitLab>,
    store: Arc<dyn ObjectStore>,
    resolver: Arc<dyn ResourceClassResolver>,
    transformer: Arc<dyn SecretTransformer>,
    bucket_name: String,
    helm_values_fns: Vec<HelmValuesFn>,
    status: Option<ResourceClaimStatus>,
}

impl std::fmt::Debug for BucketReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketReconciler")
            .field("owner", &self.owner.name_any())
            .field("bucket_name", &self.bucket_name)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl BucketReconciler {
    /// Reconciler wired with a [`GitLabSecretTransformer`] for the same bucket
    pub fn new(
        owner: Arc<GitLab>,
        store: Arc<dyn ObjectStore>,
        resolver: Arc<dyn ResourceClassResolver>,
        updaters: Arc<SecretUpdaters>,
        bucket_name: impl Into<String>,
        helm_values_fns: Vec<HelmValuesFn>,
    ) -> Self {
        let bucket_name = bucket_name.into();
        let transformer = Arc::new(GitLabSecretTransformer::new(
            Arc::clone(&owner),
            Arc::clone(&store),
            updaters,
            bucket_name.clone(),
        ));
        Self {
            owner,
            store,
            resolver,
            transformer,
            bucket_name,
            helm_values_fns,
            status: None,
        }
    }

    /// Replace the secret transformer
    #[must_use]
    pub fn with_transformer(mut self, transformer: Arc<dyn SecretTransformer>) -> Self {
        self.transformer = transformer;
        self
    }

    /// GitLab bucket this reconciler manages, e.g. `lfs`
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Type identity of the claim, e.g. `bucket-lfs`
    #[must_use]
    pub fn claim_kind(&self) -> String {
        naming::claim_kind(naming::BUCKET_CLAIM_KIND, &self.bucket_name)
    }

    /// Namespaced key of the claim object
    #[must_use]
    pub fn claim_key(&self) -> ObjectKey {
        naming::claim_key(&self.owner, naming::BUCKET_CLAIM_KIND, &self.bucket_name)
    }

    /// Status observed by the last reconcile; `None` until a claim has been fetched
    #[must_use]
    pub fn status(&self) -> Option<&ResourceClaimStatus> {
        self.status.as_ref()
    }

    /// Claim object to create when none exists yet
    #[must_use]
    pub fn new_claim(&self, class_reference: Option<ObjectReference>) -> Bucket {
        let key = self.claim_key();
        Bucket {
            metadata: ObjectMeta {
                name: Some(key.name),
                namespace: Some(key.namespace),
                labels: Some(naming::owner_labels(&self.owner, &self.bucket_name)),
                owner_references: self.owner.controller_owner_ref(&()).map(|r| vec![r]),
                ..Default::default()
            },
            spec: BucketSpec {
                class_reference,
                name: Some(naming::provider_name_template(
                    &self.owner,
                    naming::BUCKET_CLAIM_KIND,
                    &self.bucket_name,
                )),
                ..Default::default()
            },
            status: None,
        }
    }

    /// Make sure the claim exists and act on its status
    ///
    /// A freshly created claim has no status yet. A claim that exists but is
    /// not Ready leaves the derived secret untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::ClassResolution`], [`ReconcileError::ClaimFetch`]
    /// or [`ReconcileError::ClaimCreate`] when the claim cannot be resolved,
    /// read or created, and whatever the secret transformer returns for a
    /// Ready claim.
    pub async fn reconcile(&mut self) -> Result<(), ReconcileError> {
        let claim_kind = self.claim_kind();
        let key = self.claim_key();
        let span = info_span!(
            "gitlab.bucket.reconcile",
            owner.name = %self.owner.name_any(),
            claim.kind = %claim_kind,
            claim.key = %key
        );

        let start = Instant::now();
        metrics::increment_reconciliations();
        let result = self
            .reconcile_claim(claim_kind, key)
            .instrument(span)
            .await;
        metrics::observe_reconciliation_duration(start.elapsed().as_secs_f64());
        if let Err(e) = &result {
            metrics::increment_reconciliation_errors(e.kind());
        }
        result
    }

    async fn reconcile_claim(
        &mut self,
        claim_kind: String,
        key: ObjectKey,
    ) -> Result<(), ReconcileError> {
        let provider = self.owner.provider_ref();
        let class_reference = self
            .resolver
            .find(provider, naming::BUCKET_RESOURCE_TYPE)
            .await
            .map_err(|source| ReconcileError::ClassResolution {
                claim_kind: claim_kind.clone(),
                provider: provider.to_string(),
                source,
            })?;

        let bucket = match self.store.get_bucket(&key).await {
            Ok(bucket) => bucket,
            Err(e) if e.is_not_found() => {
                let claim = self.new_claim(class_reference);
                match self.store.create_bucket(&claim).await {
                    Ok(()) => {
                        metrics::increment_claims_created();
                        info!("Created {} claim {}", claim_kind, key);
                    }
                    Err(e) if e.is_already_exists() => {
                        debug!("{} claim {} was created concurrently", claim_kind, key);
                    }
                    Err(source) => {
                        return Err(ReconcileError::ClaimCreate {
                            claim_kind,
                            key,
                            source,
                        });
                    }
                }
                // The provisioner has not had a chance to report anything yet
                self.status = None;
                return Ok(());
            }
            Err(source) => {
                return Err(ReconcileError::ClaimFetch {
                    claim_kind,
                    key,
                    source,
                });
            }
        };

        self.status = bucket.status;
        match &self.status {
            Some(status) if status.is_ready() => {
                debug!("{} claim {} is ready, deriving connection secret", claim_kind, key);
                self.transformer.transform(status).await
            }
            _ => {
                debug!("{} claim {} is not ready yet", claim_kind, key);
                Ok(())
            }
        }
    }

    /// Merge this bucket's helm values into `values`
    ///
    /// Needs a status carrying a credentials secret reference. Projectors see
    /// the credentials under the derived secret's name and run in order; the
    /// first failure stops the rest.
    ///
    /// # Errors
    ///
    /// [`ReconcileError::StatusNotFound`] without a credentials reference,
    /// [`ReconcileError::SecretFetch`] when the credentials secret cannot be
    /// read, or the first projector error.
    pub async fn get_helm_values(
        &self,
        values: &mut Values,
        secret_prefix: &str,
    ) -> Result<(), ReconcileError> {
        let secret_name = self
            .status
            .as_ref()
            .and_then(ResourceClaimStatus::credentials_secret_name)
            .ok_or(ReconcileError::StatusNotFound)?;
        let key = ObjectKey::new(self.owner.namespace().unwrap_or_default(), secret_name);

        let credentials = self
            .store
            .get_secret(&key)
            .await
            .map_err(|source| ReconcileError::SecretFetch {
                key: key.clone(),
                source,
            })?;

        let derived =
            naming::derived_secret_key(&self.owner, naming::BUCKET_CLAIM_KIND, &self.bucket_name);
        let view = Secret {
            metadata: ObjectMeta {
                name: Some(derived.name),
                namespace: Some(derived.namespace),
                ..Default::default()
            },
            data: credentials.data,
            ..Default::default()
        };

        for helm_values_fn in &self.helm_values_fns {
            helm_values_fn(values, &view, &self.bucket_name, secret_prefix)?;
        }
        Ok(())
    }
}
