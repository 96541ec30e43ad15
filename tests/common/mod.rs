//! Common test utilities for reconciler integration tests
//!
//! Closure-driven doubles for the object store and the reconciler's
//! collaborators, plus builders for owners and claim statuses.

#![allow(dead_code, reason = "Each test binary uses a different subset of these helpers")]

use async_trait::async_trait;
use gitlab_bucket_controller::prelude::*;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub const TEST_NAMESPACE: &str = "test-namespace";
pub const TEST_NAME: &str = "test-name";
pub const TEST_BUCKET: &str = "test-bucket";
pub const TEST_SECRET: &str = "test-secret";

pub type GetFn<T> = Box<dyn Fn(&ObjectKey) -> Result<T, StoreError> + Send + Sync>;
type WriteFn<T> = Box<dyn Fn(&T) -> Result<(), StoreError> + Send + Sync>;

/// Object store whose every call is answered by a closure
///
/// Defaults: gets return `NotFound`, writes succeed. Every write is recorded.
pub struct MockStore {
    pub mock_get_gitlab: GetFn<GitLab>,
    pub mock_get_bucket: GetFn<Bucket>,
    pub mock_create_bucket: WriteFn<Bucket>,
    pub mock_get_secret: GetFn<Secret>,
    pub mock_create_secret: WriteFn<Secret>,
    pub mock_update_secret: WriteFn<Secret>,
    pub bucket_gets: Mutex<Vec<ObjectKey>>,
    pub secret_gets: Mutex<Vec<ObjectKey>>,
    pub created_buckets: Mutex<Vec<Bucket>>,
    pub created_secrets: Mutex<Vec<Secret>>,
    pub updated_secrets: Mutex<Vec<Secret>>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self {
            mock_get_gitlab: Box::new(|key| Err(StoreError::NotFound(key.clone()))),
            mock_get_bucket: Box::new(|key| Err(StoreError::NotFound(key.clone()))),
            mock_create_bucket: Box::new(|_| Ok(())),
            mock_get_secret: Box::new(|key| Err(StoreError::NotFound(key.clone()))),
            mock_create_secret: Box::new(|_| Ok(())),
            mock_update_secret: Box::new(|_| Ok(())),
            bucket_gets: Mutex::default(),
            secret_gets: Mutex::default(),
            created_buckets: Mutex::default(),
            created_secrets: Mutex::default(),
            updated_secrets: Mutex::default(),
        }
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn get_gitlab(&self, key: &ObjectKey) -> Result<GitLab, StoreError> {
        (self.mock_get_gitlab)(key)
    }

    async fn get_bucket(&self, key: &ObjectKey) -> Result<Bucket, StoreError> {
        self.bucket_gets.lock().unwrap().push(key.clone());
        (self.mock_get_bucket)(key)
    }

    async fn create_bucket(&self, bucket: &Bucket) -> Result<(), StoreError> {
        self.created_buckets.lock().unwrap().push(bucket.clone());
        (self.mock_create_bucket)(bucket)
    }

    async fn get_secret(&self, key: &ObjectKey) -> Result<Secret, StoreError> {
        self.secret_gets.lock().unwrap().push(key.clone());
        (self.mock_get_secret)(key)
    }

    async fn create_secret(&self, secret: &Secret) -> Result<(), StoreError> {
        self.created_secrets.lock().unwrap().push(secret.clone());
        (self.mock_create_secret)(secret)
    }

    async fn update_secret(&self, secret: &Secret) -> Result<(), StoreError> {
        self.updated_secrets.lock().unwrap().push(secret.clone());
        (self.mock_update_secret)(secret)
    }
}

type FindFn = Box<
    dyn Fn(&ObjectReference, &str) -> anyhow::Result<Option<ObjectReference>> + Send + Sync,
>;

pub struct MockResolver {
    pub mock_find: FindFn,
}

impl MockResolver {
    /// Resolver that finds no class
    pub fn none() -> Self {
        Self {
            mock_find: Box::new(|_, _| Ok(None)),
        }
    }

    pub fn failing(message: &'static str) -> Self {
        Self {
            mock_find: Box::new(move |_, _| Err(anyhow::anyhow!(message))),
        }
    }
}

#[async_trait]
impl ResourceClassResolver for MockResolver {
    async fn find(
        &self,
        provider: &ObjectReference,
        resource: &str,
    ) -> anyhow::Result<Option<ObjectReference>> {
        (self.mock_find)(provider, resource)
    }
}

type TransformFn =
    Box<dyn Fn(&ResourceClaimStatus) -> Result<(), ReconcileError> + Send + Sync>;

/// Transformer that records the statuses it was handed
pub struct MockTransformer {
    pub mock_transform: TransformFn,
    pub calls: Mutex<Vec<ResourceClaimStatus>>,
}

impl MockTransformer {
    pub fn ok() -> Self {
        Self {
            mock_transform: Box::new(|_| Ok(())),
            calls: Mutex::default(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SecretTransformer for MockTransformer {
    async fn transform(&self, status: &ResourceClaimStatus) -> Result<(), ReconcileError> {
        self.calls.lock().unwrap().push(status.clone());
        (self.mock_transform)(status)
    }
}

/// Updater answered by a closure
pub struct MockUpdater {
    pub mock_update: Box<dyn Fn(&Secret, &mut Secret) -> anyhow::Result<()> + Send + Sync>,
}

impl MockUpdater {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            mock_update: Box::new(|_, _| Ok(())),
        })
    }

    pub fn failing(message: &'static str) -> Arc<Self> {
        Arc::new(Self {
            mock_update: Box::new(move |_, _| Err(anyhow::anyhow!(message))),
        })
    }
}

impl SecretUpdater for MockUpdater {
    fn update(&self, credentials: &Secret, secret: &mut Secret) -> anyhow::Result<()> {
        (self.mock_update)(credentials, secret)
    }
}

/// Builder for `GitLab` owners
pub struct GitLabBuilder {
    gitlab: GitLab,
}

impl GitLabBuilder {
    pub fn new() -> Self {
        Self {
            gitlab: GitLab::new("", GitLabSpec::default()),
        }
    }

    pub fn with_meta(mut self, namespace: &str, name: &str) -> Self {
        self.gitlab.metadata.namespace = Some(namespace.to_string());
        self.gitlab.metadata.name = Some(name.to_string());
        self.gitlab.metadata.uid = Some(format!("{name}-uid"));
        self
    }

    pub fn with_provider(mut self, api_version: &str, name: &str) -> Self {
        self.gitlab.spec.provider_ref = ObjectReference {
            api_version: Some(api_version.to_string()),
            kind: Some("Provider".to_string()),
            name: Some(name.to_string()),
            namespace: Some("crossplane-system".to_string()),
            uid: None,
        };
        self
    }

    pub fn build(self) -> Arc<GitLab> {
        Arc::new(self.gitlab)
    }
}

/// Owner used by most tests: `test-namespace/test-name`, no provider
pub fn test_gitlab() -> Arc<GitLab> {
    GitLabBuilder::new().with_meta(TEST_NAMESPACE, TEST_NAME).build()
}

/// Bucket claim with the given status, as the provisioner would report it
pub fn bucket_with_status(key: &ObjectKey, status: ResourceClaimStatus) -> Bucket {
    let mut bucket = Bucket::new(&key.name, BucketSpec::default());
    bucket.metadata.namespace = Some(key.namespace.clone());
    bucket.status = Some(status);
    bucket
}

/// `True` condition of the given type, as the provisioner writes it
pub fn active_condition(condition_type: &str) -> Condition {
    Condition {
        r#type: condition_type.to_string(),
        status: CONDITION_STATUS_TRUE.to_string(),
        last_transition_time: Some("2024-01-01T00:00:00Z".to_string()),
        reason: None,
        message: None,
    }
}

/// Status of a claim the provisioner is still creating
pub fn creating_status() -> ResourceClaimStatus {
    ResourceClaimStatus {
        conditions: vec![active_condition(CONDITION_CREATING)],
        ..Default::default()
    }
}

/// Status of a provisioned claim whose credentials live in `credentials_secret`
pub fn ready_status(credentials_secret: &str) -> ResourceClaimStatus {
    ResourceClaimStatus {
        conditions: vec![active_condition(CONDITION_READY)],
        binding_phase: Some("Bound".to_string()),
        credentials_secret_ref: Some(LocalObjectReference {
            name: credentials_secret.to_string(),
        }),
    }
}

pub fn has_condition(status: &ResourceClaimStatus, condition_type: &str) -> bool {
    status
        .conditions
        .iter()
        .any(|c| c.r#type == condition_type && c.status == CONDITION_STATUS_TRUE)
}

/// `mock_get_bucket` answer: the requested claim, carrying `status`
pub fn serve_bucket(status: ResourceClaimStatus) -> GetFn<Bucket> {
    Box::new(move |key| Ok(bucket_with_status(key, status.clone())))
}

/// Secret with string data
pub fn secret_with_data(pairs: &[(&str, &str)]) -> Secret {
    Secret {
        data: Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), ByteString(v.as_bytes().to_vec())))
                .collect::<BTreeMap<_, _>>(),
        ),
        ..Default::default()
    }
}

pub fn data_str(secret: &Secret, key: &str) -> Option<String> {
    secret
        .data
        .as_ref()
        .and_then(|data| data.get(key))
        .map(|v| String::from_utf8_lossy(&v.0).into_owned())
}

/// `kube::Error::Api` with the given HTTP status code
pub fn api_error(code: u16) -> kube::Error {
    kube::Error::Api(kube::error::ErrorResponse {
        status: "Failure".to_string(),
        message: "test-error".to_string(),
        reason: "InternalError".to_string(),
        code,
    })
}
