//! # AWS Connection
//!
//! Repackages an S3 access key pair as GitLab's `AWS` object-storage connection.

use super::common::{field, write_connection, PASSWORD_KEY, REGION_KEY, USERNAME_KEY};
use anyhow::Result;
use k8s_openapi::api::core::v1::Secret;
use serde::Serialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Serialize, Zeroize, ZeroizeOnDrop)]
struct AwsConnection {
    provider: String,
    region: String,
    aws_access_key_id: String,
    aws_secret_access_key: String,
}

/// Write the `AWS` connection document from the `username`/`password` key pair
#[allow(
    clippy::missing_errors_doc,
    reason = "Errors are documented on SecretUpdater::update"
)]
pub fn update(credentials: &Secret, secret: &mut Secret) -> Result<()> {
    let connection = AwsConnection {
        provider: "AWS".to_string(),
        region: field(credentials, REGION_KEY),
        aws_access_key_id: field(credentials, USERNAME_KEY),
        aws_secret_access_key: field(credentials, PASSWORD_KEY),
    };
    write_connection(secret, &connection)
}
