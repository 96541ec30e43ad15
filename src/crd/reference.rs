//! # Object References
//!
//! Reference types shared by the GitLab, Bucket and ResourceClass resources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to another Kubernetes object, possibly in a different namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    /// API version of the referent (e.g., "gcp.crossplane.io/v1alpha1")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    /// Kind of the referent (e.g., "Provider")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Name of the referent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Namespace of the referent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl ObjectReference {
    /// API group of the referent, without the version
    ///
    /// `gcp.crossplane.io/v1alpha1` yields `gcp.crossplane.io`; core-group
    /// references such as `v1` yield an empty group.
    #[must_use]
    pub fn api_group(&self) -> &str {
        match self.api_version.as_deref() {
            Some(api_version) => match api_version.split_once('/') {
                Some((group, _version)) => group,
                None => "",
            },
            None => "",
        }
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Kind={}, {}/{}",
            self.api_version.as_deref().unwrap_or_default(),
            self.kind.as_deref().unwrap_or_default(),
            self.namespace.as_deref().unwrap_or_default(),
            self.name.as_deref().unwrap_or_default()
        )
    }
}

/// Reference to an object in the same namespace as the referrer
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocalObjectReference {
    pub name: String,
}
