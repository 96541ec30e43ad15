//! # Secret Transformation
//!
//! Once a claim is Ready, derive the GitLab connection secret from the
//! provider-issued credentials and upsert it next to the owner.

use super::error::ReconcileError;
use super::naming;
use crate::controller::store::{ObjectKey, ObjectStore};
use crate::crd::{GitLab, ResourceClaimStatus};
use crate::observability::metrics;
use crate::provider::common::ENDPOINT_KEY;
use crate::provider::SecretUpdaters;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::ObjectMeta;
use kube::{Resource, ResourceExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, info_span, Instrument};

/// Runs the provider-specific credential derivation for a Ready claim
#[async_trait]
pub trait SecretTransformer: Send + Sync {
    /// # Errors
    ///
    /// Any [`ReconcileError`] raised while deriving or persisting the secret
    async fn transform(&self, status: &ResourceClaimStatus) -> Result<(), ReconcileError>;
}

/// [`SecretTransformer`] for one bucket of one `GitLab`
pub struct GitLabSecretTransformer {
    owner: Arc<GitLab>,
    store: Arc<dyn ObjectStore>,
    updaters: Arc<SecretUpdaters>,
    resource: String,
}

impl std::fmt::Debug for GitLabSecretTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLabSecretTransformer")
            .field("owner", &self.owner.name_any())
            .field("resource", &self.resource)
            .field("updaters", &self.updaters)
            .finish_non_exhaustive()
    }
}

impl GitLabSecretTransformer {
    pub fn new(
        owner: Arc<GitLab>,
        store: Arc<dyn ObjectStore>,
        updaters: Arc<SecretUpdaters>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            owner,
            store,
            updaters,
            resource: resource.into(),
        }
    }

    /// Key the derived secret is written under
    #[must_use]
    pub fn derived_secret_key(&self) -> ObjectKey {
        naming::derived_secret_key(&self.owner, naming::BUCKET_CLAIM_KIND, &self.resource)
    }

    /// Derived secret with naming and ownership metadata but no data
    #[must_use]
    pub fn derived_secret(&self) -> Secret {
        let key = self.derived_secret_key();
        Secret {
            metadata: ObjectMeta {
                name: Some(key.name),
                namespace: Some(key.namespace),
                labels: Some(naming::owner_labels(&self.owner, &self.resource)),
                owner_references: self.owner.controller_owner_ref(&()).map(|r| vec![r]),
                ..Default::default()
            },
            type_: Some("Opaque".to_string()),
            ..Default::default()
        }
    }

    /// Create-or-update; update first since the secret usually exists already
    async fn upsert(&self, secret: &Secret) -> Result<(), ReconcileError> {
        let key = ObjectKey::of(secret);
        match self.store.update_secret(secret).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                debug!("Derived secret {} does not exist yet, creating it", key);
                self.store
                    .create_secret(secret)
                    .await
                    .map_err(|source| ReconcileError::SecretPersist { key, source })
            }
            Err(source) => Err(ReconcileError::SecretPersist { key, source }),
        }
    }
}

/// Copy the credential endpoint so the derived secret is self-contained
fn copy_endpoint(credentials: &Secret, secret: &mut Secret) {
    if let Some(endpoint) = credentials
        .data
        .as_ref()
        .and_then(|data| data.get(ENDPOINT_KEY))
    {
        secret
            .data
            .get_or_insert_with(BTreeMap::new)
            .insert(ENDPOINT_KEY.to_string(), endpoint.clone());
    }
}

impl GitLabSecretTransformer {
    async fn derive_and_upsert(
        &self,
        status: &ResourceClaimStatus,
        provider: &str,
    ) -> Result<(), ReconcileError> {
        let secret_name = status
            .credentials_secret_name()
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

        let updater =
            self.updaters
                .get(provider)
                .ok_or_else(|| ReconcileError::UnsupportedProvider {
                    provider: provider.to_string(),
                })?;

        let mut derived = self.derived_secret();
        updater
            .update(&credentials, &mut derived)
            .map_err(|source| ReconcileError::SecretDataUpdate {
                key: key.clone(),
                source,
            })?;
        copy_endpoint(&credentials, &mut derived);

        self.upsert(&derived).await?;
        info!(
            "Derived connection secret {} from {}",
            ObjectKey::of(&derived),
            key
        );
        Ok(())
    }
}

#[async_trait]
impl SecretTransformer for GitLabSecretTransformer {
    async fn transform(&self, status: &ResourceClaimStatus) -> Result<(), ReconcileError> {
        let provider = self.owner.provider_name().to_string();
        let span = info_span!(
            "gitlab.secret.transform",
            owner.name = %self.owner.name_any(),
            resource = %self.resource,
            provider = %provider
        );

        let result = self
            .derive_and_upsert(status, &provider)
            .instrument(span)
            .await;
        match &result {
            Ok(()) => metrics::increment_secret_transforms(&provider),
            Err(_) => metrics::increment_secret_transform_errors(&provider),
        }
        result
    }
}
