//! # GitLab
//!
//! The owner resource. A `GitLab` asks for a GitLab deployment backed by
//! provider-managed object storage; the controller only reads it.

use super::reference::ObjectReference;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// GitLab Custom Resource Definition
///
/// # Example
///
/// ```yaml
/// apiVersion: controller.gitlab.com/v1alpha1
/// kind: GitLab
/// metadata:
///   name: gitlab-demo
///   namespace: default
/// spec:
///   domain: example.com
///   email: admin@example.com
///   providerRef:
///     apiVersion: gcp.crossplane.io/v1alpha1
///     kind: Provider
///     name: gcp-provider
///     namespace: crossplane-system
/// ```
#[derive(CustomResource, Debug, Clone, Default, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "GitLab",
    group = "controller.gitlab.com",
    version = "v1alpha1",
    namespaced,
    shortname = "gl",
    printcolumn = r#"{"name":"Domain", "type":"string", "jsonPath":".spec.domain"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct GitLabSpec {
    /// Domain GitLab is served under
    #[serde(default)]
    pub domain: String,
    /// Optional suffix appended to every GitLab host name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_suffix: Option<String>,
    /// Protocol used for external URLs (http or https)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Administrator email address
    #[serde(default)]
    pub email: String,
    /// Reference to the cloud provider whose credentials back every claim
    #[serde(default)]
    pub provider_ref: ObjectReference,
}

impl GitLab {
    /// The owner's provider reference
    #[must_use]
    pub fn provider_ref(&self) -> &ObjectReference {
        &self.spec.provider_ref
    }

    /// Short provider discriminator, e.g. `gcp` for `gcp.crossplane.io/v1alpha1`
    ///
    /// Empty when the provider reference carries no API group.
    #[must_use]
    pub fn provider_name(&self) -> &str {
        let group = self.spec.provider_ref.api_group();
        group.split('.').next().unwrap_or_default()
    }
}
