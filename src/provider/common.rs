//! # Common Provider Utilities
//!
//! Credential field access and connection-document helpers shared by every
//! provider's secret updater.

use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use serde::Serialize;
use std::collections::BTreeMap;

/// Key holding the provider endpoint or bucket location
pub const ENDPOINT_KEY: &str = "endpoint";
pub const USERNAME_KEY: &str = "username";
pub const PASSWORD_KEY: &str = "password";
/// Key holding an opaque provider token (e.g. a GCP service account JSON key)
pub const TOKEN_KEY: &str = "token";
pub const REGION_KEY: &str = "region";

/// Key of the GitLab object-storage connection document in the derived secret
pub const CONNECTION_KEY: &str = "connection";

/// Read a credential field as UTF-8, degrading to an empty string when missing
#[must_use]
pub fn field(secret: &Secret, key: &str) -> String {
    secret
        .data
        .as_ref()
        .and_then(|data| data.get(key))
        .map(|value| String::from_utf8_lossy(&value.0).into_owned())
        .unwrap_or_default()
}

/// Read a credential field that must be present
///
/// # Errors
///
/// Fails when `key` is absent or not valid UTF-8.
pub fn required_field(secret: &Secret, key: &str) -> Result<String> {
    let value = secret
        .data
        .as_ref()
        .and_then(|data| data.get(key))
        .with_context(|| format!("credentials secret has no '{key}' key"))?;
    String::from_utf8(value.0.clone()).with_context(|| format!("'{key}' is not valid UTF-8"))
}

/// Serialize a connection document and store it under [`CONNECTION_KEY`]
///
/// # Errors
///
/// Fails when `connection` cannot be serialized to YAML.
pub fn write_connection<T: Serialize>(secret: &mut Secret, connection: &T) -> Result<()> {
    let document =
        serde_yaml::to_string(connection).context("Failed to serialize connection document")?;
    secret
        .data
        .get_or_insert_with(BTreeMap::new)
        .insert(CONNECTION_KEY.to_string(), ByteString(document.into_bytes()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(entries: &[(&str, &[u8])]) -> Secret {
        Secret {
            data: Some(
                entries
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), ByteString(v.to_vec())))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn test_field_missing_is_empty() {
        assert_eq!(field(&Secret::default(), ENDPOINT_KEY), "");
        assert_eq!(field(&secret(&[]), ENDPOINT_KEY), "");
    }

    #[test]
    fn test_field_reads_value() {
        let s = secret(&[(ENDPOINT_KEY, b"gcs://bucket")]);
        assert_eq!(field(&s, ENDPOINT_KEY), "gcs://bucket");
    }

    #[test]
    fn test_required_field_errors_when_missing() {
        let err = required_field(&secret(&[]), TOKEN_KEY).expect_err("token is missing");
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn test_required_field_rejects_invalid_utf8() {
        assert!(required_field(&secret(&[(TOKEN_KEY, &[0xff, 0xfe])]), TOKEN_KEY).is_err());
    }

    #[test]
    fn test_write_connection_inserts_yaml() {
        #[derive(Serialize)]
        struct Doc {
            provider: &'static str,
        }
        let mut s = Secret::default();
        write_connection(&mut s, &Doc { provider: "AWS" }).expect("serializes");
        assert_eq!(field(&s, CONNECTION_KEY), "provider: AWS\n");
    }
}
