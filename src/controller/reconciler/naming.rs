//! # Claim Naming
//!
//! Deterministic names for claims and derived secrets. Re-running a reconcile
//! for the same owner and resource always targets the same objects.

use crate::controller::store::ObjectKey;
use crate::crd::GitLab;
use kube::ResourceExt;

/// Claim kind for object-storage buckets
pub const BUCKET_CLAIM_KIND: &str = "bucket";

/// Resource type passed to the class resolver for buckets
pub const BUCKET_RESOURCE_TYPE: &str = "bucket.storage";

/// Separates the claim name from the provisioner-filled suffix
pub const BUCKET_NAME_DELIMITER: &str = "-";

/// Placeholder the provisioner replaces when it names the provider-side bucket
pub const BUCKET_NAME_PLACEHOLDER: &str = "%s";

/// Suffix of the derived secret's name
pub const CONNECTION_SECRET_SUFFIX: &str = "connection";

/// Owner kind recorded on every object the controller creates
pub const OWNER_KIND_LABEL_VALUE: &str = "gitlab";

pub const LABEL_OWNER_KIND: &str = "controller.gitlab.com/owner-kind";
pub const LABEL_OWNER_NAME: &str = "controller.gitlab.com/owner";
pub const LABEL_RESOURCE: &str = "controller.gitlab.com/resource";

/// Type identity of a claim, e.g. `bucket-lfs`
#[must_use]
pub fn claim_kind(kind: &str, resource: &str) -> String {
    format!("{kind}-{resource}")
}

/// Object name of the claim, e.g. `gitlab-demo-bucket-lfs`
#[must_use]
pub fn claim_name(owner: &GitLab, kind: &str, resource: &str) -> String {
    format!("{}-{}", owner.name_any(), claim_kind(kind, resource))
}

/// Namespaced key of the claim; claims live next to their owner
#[must_use]
pub fn claim_key(owner: &GitLab, kind: &str, resource: &str) -> ObjectKey {
    ObjectKey::new(
        owner.namespace().unwrap_or_default(),
        claim_name(owner, kind, resource),
    )
}

/// Provider-side name template, e.g. `gitlab-demo-bucket-lfs-%s`
#[must_use]
pub fn provider_name_template(owner: &GitLab, kind: &str, resource: &str) -> String {
    format!(
        "{}{BUCKET_NAME_DELIMITER}{BUCKET_NAME_PLACEHOLDER}",
        claim_name(owner, kind, resource)
    )
}

/// Key of the secret derived from the claim's credentials
#[must_use]
pub fn derived_secret_key(owner: &GitLab, kind: &str, resource: &str) -> ObjectKey {
    ObjectKey::new(
        owner.namespace().unwrap_or_default(),
        format!(
            "{}-{CONNECTION_SECRET_SUFFIX}",
            claim_name(owner, kind, resource)
        ),
    )
}

/// Labels stamped on claims and derived secrets
#[must_use]
pub fn owner_labels(
    owner: &GitLab,
    resource: &str,
) -> std::collections::BTreeMap<String, String> {
    [
        (LABEL_OWNER_KIND, OWNER_KIND_LABEL_VALUE.to_string()),
        (LABEL_OWNER_NAME, owner.name_any()),
        (LABEL_RESOURCE, resource.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::GitLabSpec;

    fn owner() -> GitLab {
        let mut gitlab = GitLab::new("test-name", GitLabSpec::default());
        gitlab.metadata.namespace = Some("test-namespace".to_string());
        gitlab
    }

    #[test]
    fn test_claim_kind() {
        assert_eq!(claim_kind(BUCKET_CLAIM_KIND, "test-bucket"), "bucket-test-bucket");
    }

    #[test]
    fn test_claim_key_is_deterministic() {
        let first = claim_key(&owner(), BUCKET_CLAIM_KIND, "test-bucket");
        let second = claim_key(&owner(), BUCKET_CLAIM_KIND, "test-bucket");
        assert_eq!(first, second);
        assert_eq!(first.to_string(), "test-namespace/test-name-bucket-test-bucket");
    }

    #[test]
    fn test_provider_name_template_keeps_placeholder() {
        assert_eq!(
            provider_name_template(&owner(), BUCKET_CLAIM_KIND, "test-bucket"),
            "test-name-bucket-test-bucket-%s"
        );
    }

    #[test]
    fn test_derived_secret_key() {
        assert_eq!(
            derived_secret_key(&owner(), BUCKET_CLAIM_KIND, "lfs").to_string(),
            "test-namespace/test-name-bucket-lfs-connection"
        );
    }

    #[test]
    fn test_owner_labels() {
        let labels = owner_labels(&owner(), "uploads");
        assert_eq!(labels.get(LABEL_OWNER_KIND).map(String::as_str), Some("gitlab"));
        assert_eq!(labels.get(LABEL_OWNER_NAME).map(String::as_str), Some("test-name"));
        assert_eq!(labels.get(LABEL_RESOURCE).map(String::as_str), Some("uploads"));
    }
}
