//! # Resource Class
//!
//! Provisioning policy referenced by claims. Classes are matched to a claim by
//! provider and provisioner prefix.

use super::reference::LocalObjectReference;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(CustomResource, Debug, Clone, Default, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "ResourceClass",
    group = "core.crossplane.io",
    version = "v1alpha1",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ResourceClassSpec {
    /// Provisioner responsible for this class
    /// Format: `<resource>.<group>.<provider>.crossplane.io`,
    /// e.g. `bucket.storage.gcp.crossplane.io`
    pub provisioner: String,
    /// Provider whose credentials the provisioner uses
    pub provider_ref: LocalObjectReference,
    /// Provisioner-specific parameters
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    /// What happens to provisioned resources when their claim is deleted (Retain, Delete)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reclaim_policy: Option<String>,
}

impl ResourceClass {
    /// Whether this class provisions `resource` (e.g. `bucket.storage`) for the named provider
    #[must_use]
    pub fn provisions(&self, provider_name: &str, resource: &str) -> bool {
        self.spec.provider_ref.name == provider_name
            && self
                .spec
                .provisioner
                .strip_prefix(resource)
                .is_some_and(|rest| rest.starts_with('.'))
    }
}
