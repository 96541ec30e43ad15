//! # Azure Connection
//!
//! Repackages a storage account name and access key as GitLab's `AzureRM`
//! object-storage connection.

use super::common::{field, write_connection, ENDPOINT_KEY, PASSWORD_KEY, USERNAME_KEY};
use anyhow::Result;
use k8s_openapi::api::core::v1::Secret;
use serde::Serialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Serialize, Zeroize, ZeroizeOnDrop)]
struct AzureConnection {
    provider: String,
    azure_storage_account_name: String,
    azure_storage_access_key: String,
    azure_storage_domain: String,
}

/// Storage domain of a blob endpoint
///
/// `https://account.blob.core.windows.net/` yields `blob.core.windows.net`.
fn storage_domain(endpoint: &str) -> String {
    let without_scheme = endpoint
        .split_once("://")
        .map_or(endpoint, |(_scheme, rest)| rest);
    let host = without_scheme.split('/').next().unwrap_or_default();
    host.split_once('.')
        .map(|(_account, domain)| domain.to_string())
        .unwrap_or_default()
}

/// Write the `AzureRM` connection document from the `username`/`password` pair
#[allow(
    clippy::missing_errors_doc,
    reason = "Errors are documented on SecretUpdater::update"
)]
pub fn update(credentials: &Secret, secret: &mut Secret) -> Result<()> {
    let connection = AzureConnection {
        provider: "AzureRM".to_string(),
        azure_storage_account_name: field(credentials, USERNAME_KEY),
        azure_storage_access_key: field(credentials, PASSWORD_KEY),
        azure_storage_domain: storage_domain(&field(credentials, ENDPOINT_KEY)),
    };
    write_connection(secret, &connection)
}
