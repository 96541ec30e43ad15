//! # Object Store
//!
//! Get/create/update access to the objects the reconciler touches, keyed by
//! namespaced name. `KubeStore` talks to the API server; tests substitute
//! their own implementation.

use crate::crd::{Bucket, GitLab};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::{Api, PostParams};
use kube::{Client, ResourceExt};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Namespaced name of an object
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Key of an existing object, taken from its metadata
    pub fn of<K: ResourceExt>(obj: &K) -> Self {
        Self {
            namespace: obj.namespace().unwrap_or_default(),
            name: obj.name_any(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Errors returned by an [`ObjectStore`]
///
/// `NotFound` and `AlreadyExists` are distinguishable so callers can treat
/// them as control flow rather than failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(ObjectKey),
    #[error("{0} already exists")]
    AlreadyExists(ObjectKey),
    #[error("invalid object {0}: {1}")]
    Invalid(ObjectKey, String),
    #[error(transparent)]
    Kube(#[from] kube::Error),
}

impl StoreError {
    /// Classify an API error for the object at `key`
    pub fn from_kube(err: kube::Error, key: &ObjectKey) -> Self {
        match err {
            kube::Error::Api(api_err) if api_err.code == 404 => Self::NotFound(key.clone()),
            kube::Error::Api(api_err) if api_err.code == 409 => Self::AlreadyExists(key.clone()),
            other => Self::Kube(other),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }
}

/// Object store client consumed by the reconciler
///
/// Every call is a single remote operation. Implementations must not retry;
/// the outer scheduler owns retry and backoff.
#[allow(
    clippy::missing_errors_doc,
    reason = "Every method fails with the StoreError of its single remote call"
)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_gitlab(&self, key: &ObjectKey) -> Result<GitLab, StoreError>;

    async fn get_bucket(&self, key: &ObjectKey) -> Result<Bucket, StoreError>;

    async fn create_bucket(&self, bucket: &Bucket) -> Result<(), StoreError>;

    async fn get_secret(&self, key: &ObjectKey) -> Result<Secret, StoreError>;

    async fn create_secret(&self, secret: &Secret) -> Result<(), StoreError>;

    async fn update_secret(&self, secret: &Secret) -> Result<(), StoreError>;
}

/// [`ObjectStore`] backed by the Kubernetes API server
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl fmt::Debug for KubeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeStore").finish_non_exhaustive()
    }
}

impl KubeStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api<K>(&self, namespace: &str) -> Api<K>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope, DynamicType = ()>,
    {
        Api::namespaced(self.client.clone(), namespace)
    }
}

/// Key of an object about to be written; the namespace must be set
fn write_key<K: ResourceExt>(obj: &K) -> Result<ObjectKey, StoreError> {
    let key = ObjectKey::of(obj);
    if key.namespace.is_empty() {
        return Err(StoreError::Invalid(key, "metadata.namespace is not set".to_string()));
    }
    Ok(key)
}

#[async_trait]
impl ObjectStore for KubeStore {
    async fn get_gitlab(&self, key: &ObjectKey) -> Result<GitLab, StoreError> {
        self.api::<GitLab>(&key.namespace)
            .get(&key.name)
            .await
            .map_err(|e| StoreError::from_kube(e, key))
    }

    async fn get_bucket(&self, key: &ObjectKey) -> Result<Bucket, StoreError> {
        self.api::<Bucket>(&key.namespace)
            .get(&key.name)
            .await
            .map_err(|e| StoreError::from_kube(e, key))
    }

    async fn create_bucket(&self, bucket: &Bucket) -> Result<(), StoreError> {
        let key = write_key(bucket)?;
        self.api::<Bucket>(&key.namespace)
            .create(&PostParams::default(), bucket)
            .await
            .map_err(|e| StoreError::from_kube(e, &key))?;
        debug!("Created Bucket {}", key);
        Ok(())
    }

    async fn get_secret(&self, key: &ObjectKey) -> Result<Secret, StoreError> {
        self.api::<Secret>(&key.namespace)
            .get(&key.name)
            .await
            .map_err(|e| StoreError::from_kube(e, key))
    }

    async fn create_secret(&self, secret: &Secret) -> Result<(), StoreError> {
        let key = write_key(secret)?;
        self.api::<Secret>(&key.namespace)
            .create(&PostParams::default(), secret)
            .await
            .map_err(|e| StoreError::from_kube(e, &key))?;
        debug!("Created Secret {}", key);
        Ok(())
    }

    async fn update_secret(&self, secret: &Secret) -> Result<(), StoreError> {
        let key = write_key(secret)?;
        // Secrets accept unconditional updates, so no resourceVersion is required
        self.api::<Secret>(&key.namespace)
            .replace(&key.name, &PostParams::default(), secret)
            .await
            .map_err(|e| StoreError::from_kube(e, &key))?;
        debug!("Updated Secret {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::api::ObjectMeta;

    #[test]
    fn test_object_key_display() {
        assert_eq!(ObjectKey::new("default", "gitlab").to_string(), "default/gitlab");
    }

    #[test]
    fn test_object_key_of_secret() {
        let secret = Secret {
            metadata: ObjectMeta {
                name: Some("creds".to_string()),
                namespace: Some("gitlab-system".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(ObjectKey::of(&secret), ObjectKey::new("gitlab-system", "creds"));
    }

    #[test]
    fn test_write_key_requires_namespace() {
        let secret = Secret {
            metadata: ObjectMeta {
                name: Some("creds".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = write_key(&secret).expect_err("namespace is required");
        assert!(matches!(err, StoreError::Invalid(_, _)));
    }

    #[test]
    fn test_error_kinds() {
        let key = ObjectKey::new("ns", "name");
        assert!(StoreError::NotFound(key.clone()).is_not_found());
        assert!(!StoreError::NotFound(key.clone()).is_already_exists());
        assert!(StoreError::AlreadyExists(key.clone()).is_already_exists());
        assert_eq!(StoreError::NotFound(key).to_string(), "ns/name not found");
    }

    fn api_error(code: u16) -> kube::Error {
        kube::Error::Api(kube::error::ErrorResponse {
            status: "Failure".to_string(),
            message: "boom".to_string(),
            reason: "Test".to_string(),
            code,
        })
    }

    #[test]
    fn test_from_kube_maps_status_codes() {
        let key = ObjectKey::new("ns", "name");
        assert!(StoreError::from_kube(api_error(404), &key).is_not_found());
        assert!(StoreError::from_kube(api_error(409), &key).is_already_exists());
        assert!(matches!(
            StoreError::from_kube(api_error(500), &key),
            StoreError::Kube(_)
        ));
    }
}
