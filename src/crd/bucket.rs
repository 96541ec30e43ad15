//! # Bucket Claim
//!
//! A `Bucket` is a declarative request for provider-managed object storage.
//! The controller creates it; the external provisioner owns its status.

use super::reference::{LocalObjectReference, ObjectReference};
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Condition type set while the provisioner is creating the resource
pub const CONDITION_CREATING: &str = "Creating";
/// Condition type set once the resource and its credentials are available
pub const CONDITION_READY: &str = "Ready";
pub const CONDITION_STATUS_TRUE: &str = "True";

/// Bucket claim specification
#[derive(
    CustomResource, Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema,
)]
#[kube(
    kind = "Bucket",
    group = "storage.crossplane.io",
    version = "v1alpha1",
    namespaced,
    status = "ResourceClaimStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct BucketSpec {
    /// Provisioning class; absent means the provisioner's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_reference: Option<ObjectReference>,
    /// Provider-side bucket name template
    /// A `%s` placeholder is left for the provisioner to fill in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        rename = "predefinedACL",
        skip_serializing_if = "Option::is_none"
    )]
    pub predefined_acl: Option<String>,
    /// Permission granted to the connecting application (Read, Write, ReadWrite)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_permission: Option<String>,
}

/// Status of a resource claim, written by the external provisioner
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceClaimStatus {
    /// Conditions represent the latest available observations
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Binding phase of the claim (Unbound, Bound)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_phase: Option<String>,
    /// Secret holding the provider-issued connection credentials
    /// Only populated once the claim is Ready
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_secret_ref: Option<LocalObjectReference>,
}

/// Condition represents a condition of a resource
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition (Creating, Ready, ...)
    pub r#type: String,
    /// Status of the condition (True, False, Unknown)
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResourceClaimStatus {
    fn has_active(&self, condition_type: &str) -> bool {
        self.conditions
            .iter()
            .any(|c| c.r#type == condition_type && c.status == CONDITION_STATUS_TRUE)
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.has_active(CONDITION_READY)
    }

    /// Name of the credentials secret, if the provisioner has published one
    #[must_use]
    pub fn credentials_secret_name(&self) -> Option<&str> {
        self.credentials_secret_ref
            .as_ref()
            .map(|r| r.name.as_str())
            .filter(|name| !name.is_empty())
    }
}
