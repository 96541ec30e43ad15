//! # Resource Class Resolution
//!
//! Maps an owner's provider reference and a resource type to the provisioning
//! class a new claim should use.

use crate::crd::{ObjectReference, ResourceClass};
use anyhow::{Context, Result};
use async_trait::async_trait;
use kube::api::{Api, ListParams};
use kube::{Client, Resource, ResourceExt};
use tracing::debug;

/// Resolves provisioning classes for claims
#[async_trait]
pub trait ResourceClassResolver: Send + Sync {
    /// Find the class provisioning `resource` (e.g. `bucket.storage`) for `provider`
    ///
    /// `Ok(None)` means no specific class is needed and the claim is created
    /// without a class reference.
    ///
    /// # Errors
    ///
    /// Fails when the candidate classes cannot be listed.
    async fn find(
        &self,
        provider: &ObjectReference,
        resource: &str,
    ) -> Result<Option<ObjectReference>>;
}

/// Looks up `ResourceClass` objects in the provider's namespace
#[derive(Clone)]
pub struct KubeResourceClassResolver {
    client: Client,
}

impl std::fmt::Debug for KubeResourceClassResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeResourceClassResolver")
            .finish_non_exhaustive()
    }
}

impl KubeResourceClassResolver {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceClassResolver for KubeResourceClassResolver {
    async fn find(
        &self,
        provider: &ObjectReference,
        resource: &str,
    ) -> Result<Option<ObjectReference>> {
        let namespace = provider.namespace.as_deref().unwrap_or("default");
        let api: Api<ResourceClass> = Api::namespaced(self.client.clone(), namespace);
        let classes = api
            .list(&ListParams::default())
            .await
            .context(format!(
                "Failed to list ResourceClasses in namespace {namespace}"
            ))?;

        let found = select_resource_class(&classes.items, provider, resource);
        match &found {
            Some(class) => debug!(
                "Resolved {} for provider {} to class {}",
                resource,
                provider,
                class.name.as_deref().unwrap_or_default()
            ),
            None => debug!(
                "No ResourceClass for {} and provider {}, using provisioner default",
                resource, provider
            ),
        }
        Ok(found)
    }
}

/// Pick the first class provisioning `resource` for `provider` and return a reference to it
#[must_use]
pub fn select_resource_class(
    classes: &[ResourceClass],
    provider: &ObjectReference,
    resource: &str,
) -> Option<ObjectReference> {
    let provider_name = provider.name.as_deref().unwrap_or_default();
    classes
        .iter()
        .find(|class| class.provisions(provider_name, resource))
        .map(|class| ObjectReference {
            api_version: Some(ResourceClass::api_version(&()).into_owned()),
            kind: Some(ResourceClass::kind(&()).into_owned()),
            name: Some(class.name_any()),
            namespace: class.namespace(),
            uid: class.uid(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{LocalObjectReference, ResourceClassSpec};

    fn class(name: &str, provisioner: &str, provider: &str) -> ResourceClass {
        let mut class = ResourceClass::new(
            name,
            ResourceClassSpec {
                provisioner: provisioner.to_string(),
                provider_ref: LocalObjectReference {
                    name: provider.to_string(),
                },
                ..Default::default()
            },
        );
        class.metadata.namespace = Some("crossplane-system".to_string());
        class
    }

    fn provider(name: &str) -> ObjectReference {
        ObjectReference {
            api_version: Some("gcp.crossplane.io/v1alpha1".to_string()),
            kind: Some("Provider".to_string()),
            name: Some(name.to_string()),
            namespace: Some("crossplane-system".to_string()),
            uid: None,
        }
    }

    #[test]
    fn test_select_matching_class() {
        let classes = vec![
            class("mysql", "cloudsqlinstance.database.gcp.crossplane.io", "gcp"),
            class("standard-bucket", "bucket.storage.gcp.crossplane.io", "gcp"),
        ];
        let found = select_resource_class(&classes, &provider("gcp"), "bucket.storage")
            .expect("class should be found");
        assert_eq!(found.name.as_deref(), Some("standard-bucket"));
        assert_eq!(found.kind.as_deref(), Some("ResourceClass"));
        assert_eq!(found.api_version.as_deref(), Some("core.crossplane.io/v1alpha1"));
        assert_eq!(found.namespace.as_deref(), Some("crossplane-system"));
    }

    #[test]
    fn test_select_none_for_other_provider() {
        let classes = vec![class("standard-bucket", "bucket.storage.gcp.crossplane.io", "gcp")];
        assert_eq!(
            select_resource_class(&classes, &provider("aws"), "bucket.storage"),
            None
        );
    }

    #[test]
    fn test_select_none_without_classes() {
        assert_eq!(select_resource_class(&[], &provider("gcp"), "bucket.storage"), None);
    }
}
