//! # GCP Connection
//!
//! Turns a Google Cloud service account key into GitLab's `Google`
//! object-storage connection.

use super::common::{required_field, write_connection, TOKEN_KEY};
use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::Secret;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// The fields of a service account JSON key GitLab needs
#[derive(Debug, Default, Deserialize)]
struct ServiceAccountKey {
    #[serde(default)]
    project_id: String,
    #[serde(default)]
    client_email: String,
}

#[derive(Serialize, Zeroize, ZeroizeOnDrop)]
struct GoogleConnection {
    provider: String,
    google_project: String,
    google_client_email: String,
    google_json_key_string: String,
}

/// Write the `Google` connection document derived from the service account key in `token`
#[allow(
    clippy::missing_errors_doc,
    reason = "Errors are documented on SecretUpdater::update"
)]
pub fn update(credentials: &Secret, secret: &mut Secret) -> Result<()> {
    let key = Zeroizing::new(required_field(credentials, TOKEN_KEY)?);
    let account: ServiceAccountKey =
        serde_json::from_str(&key).context("Failed to parse service account key")?;

    let connection = GoogleConnection {
        provider: "Google".to_string(),
        google_project: account.project_id,
        google_client_email: account.client_email,
        google_json_key_string: (*key).clone(),
    };
    write_connection(secret, &connection)
}
