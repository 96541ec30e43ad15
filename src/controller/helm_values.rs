//! # Helm Values
//!
//! Projects a bucket's connection secret into the nested values tree consumed
//! by the GitLab chart. Each projector merges a fixed subtree into the caller's
//! accumulator key by key, so projectors compose without clobbering each other.

use crate::controller::reconciler::ReconcileError;
use crate::provider::common::{field, CONNECTION_KEY, ENDPOINT_KEY};
use k8s_openapi::api::core::v1::Secret;
use serde_json::{json, Map, Value};

/// Helm values tree
pub type Values = Map<String, Value>;

/// A projector: `(values, secret, resource name, secret name prefix)`
pub type HelmValuesFn = fn(&mut Values, &Secret, &str, &str) -> Result<(), ReconcileError>;

pub const VALUES_KEY_GLOBAL: &str = "global";
pub const VALUES_KEY_APP_CONFIG: &str = "appConfig";
pub const VALUES_KEY_GITLAB: &str = "gitlab";

/// Connection reference: the key inside the secret and the secret's prefixed name
fn connection_ref(secret: &Secret, secret_prefix: &str) -> Value {
    json!({
        "key": CONNECTION_KEY,
        "secret": format!(
            "{secret_prefix}{}",
            secret.metadata.name.as_deref().unwrap_or_default()
        ),
    })
}

/// `global.appConfig.<name>`: bucket endpoint and connection secret reference
#[allow(
    clippy::missing_errors_doc,
    reason = "Projectors only fail with the ValuesConflict of merge_at"
)]
pub fn bucket_connection_helm_values(
    values: &mut Values,
    secret: &Secret,
    name: &str,
    secret_prefix: &str,
) -> Result<(), ReconcileError> {
    merge_at(
        values,
        &[VALUES_KEY_GLOBAL, VALUES_KEY_APP_CONFIG, name],
        json!({
            "bucket": field(secret, ENDPOINT_KEY),
            "connection": connection_ref(secret, secret_prefix),
        }),
    )
}

/// Backup target: `global.appConfig.<name>.bucket` plus the task runner's
/// object storage connection
#[allow(
    clippy::missing_errors_doc,
    reason = "Projectors only fail with the ValuesConflict of merge_at"
)]
pub fn bucket_backups_helm_values(
    values: &mut Values,
    secret: &Secret,
    name: &str,
    secret_prefix: &str,
) -> Result<(), ReconcileError> {
    merge_at(
        values,
        &[VALUES_KEY_GLOBAL, VALUES_KEY_APP_CONFIG, name],
        json!({ "bucket": field(secret, ENDPOINT_KEY) }),
    )?;
    merge_at(
        values,
        &[VALUES_KEY_GITLAB, "task-runner", "backups", "objectStorage", "config"],
        connection_ref(secret, secret_prefix),
    )
}

/// `global.appConfig.backups.tmpBucket`; only the resource name is used
#[allow(
    clippy::missing_errors_doc,
    reason = "Projectors only fail with the ValuesConflict of merge_at"
)]
pub fn bucket_backups_temp_helm_values(
    values: &mut Values,
    _secret: &Secret,
    name: &str,
    _secret_prefix: &str,
) -> Result<(), ReconcileError> {
    merge_at(
        values,
        &[VALUES_KEY_GLOBAL, VALUES_KEY_APP_CONFIG, "backups", "tmpBucket"],
        Value::String(name.to_string()),
    )
}

fn conflict(path: impl Into<String>) -> ReconcileError {
    ReconcileError::ValuesConflict { path: path.into() }
}

/// Merge `value` into `values` at `path`, creating intermediate maps as needed
///
/// # Errors
///
/// [`ReconcileError::ValuesConflict`] when a non-map value sits where a map
/// is needed.
pub fn merge_at(values: &mut Values, path: &[&str], value: Value) -> Result<(), ReconcileError> {
    let Some((last, parents)) = path.split_last() else {
        return Ok(());
    };

    let mut node: &mut Values = values;
    for (depth, key) in parents.iter().enumerate() {
        node = node
            .entry((*key).to_string())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| conflict(path[..=depth].join(".")))?;
    }

    match node.get_mut(*last) {
        Some(existing) => merge_value(existing, value, &path.join(".")),
        None => {
            node.insert((*last).to_string(), value);
            Ok(())
        }
    }
}

/// Key-wise merge; maps merge recursively, scalars replace scalars, and a map
/// never replaces a scalar or vice versa
fn merge_value(existing: &mut Value, incoming: Value, path: &str) -> Result<(), ReconcileError> {
    match (existing, incoming) {
        (Value::Object(dst), Value::Object(src)) => {
            for (key, value) in src {
                match dst.get_mut(&key) {
                    Some(slot) => merge_value(slot, value, &format!("{path}.{key}"))?,
                    None => {
                        dst.insert(key, value);
                    }
                }
            }
            Ok(())
        }
        (Value::Object(_), _) | (_, Value::Object(_)) => Err(conflict(path)),
        (slot, value) => {
            *slot = value;
            Ok(())
        }
    }
}
