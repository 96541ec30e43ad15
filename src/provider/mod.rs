//! # Provider Secret Updaters
//!
//! Provider-specific derivation of the GitLab connection secret from a
//! claim's credentials secret.
//!
//! Each supported provider is a variant of [`ProviderSecretUpdater`]; the
//! reconciler only sees the [`SecretUpdater`] capability and picks one from a
//! [`SecretUpdaters`] registry by provider discriminator (`gcp`, `aws`, `azure`).

use anyhow::Result;
use k8s_openapi::api::core::v1::Secret;
use std::collections::HashMap;
use std::sync::Arc;

// Common utilities shared across providers
pub mod common;

// Provider implementations
pub mod aws;
pub mod azure;
pub mod gcp;

/// Derives connection data for the derived secret
pub trait SecretUpdater: Send + Sync {
    /// Write derived key/value pairs into `secret`
    ///
    /// `credentials` is the provider-issued secret and is never modified.
    /// Implementations must be pure: the same credentials always produce the
    /// same data.
    ///
    /// # Errors
    ///
    /// Fails when a required credential is missing or malformed.
    fn update(&self, credentials: &Secret, secret: &mut Secret) -> Result<()>;
}

/// The built-in providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderSecretUpdater {
    Gcp,
    Aws,
    Azure,
}

impl ProviderSecretUpdater {
    pub const ALL: [Self; 3] = [Self::Gcp, Self::Aws, Self::Azure];

    /// Discriminator this updater is registered under
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gcp => "gcp",
            Self::Aws => "aws",
            Self::Azure => "azure",
        }
    }
}

impl SecretUpdater for ProviderSecretUpdater {
    fn update(&self, credentials: &Secret, secret: &mut Secret) -> Result<()> {
        match self {
            Self::Gcp => gcp::update(credentials, secret),
            Self::Aws => aws::update(credentials, secret),
            Self::Azure => azure::update(credentials, secret),
        }
    }
}

/// Registry of secret updaters keyed by provider discriminator
///
/// Built once at startup and read-only afterwards.
#[derive(Clone, Default)]
pub struct SecretUpdaters {
    updaters: HashMap<String, Arc<dyn SecretUpdater>>,
}

impl std::fmt::Debug for SecretUpdaters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut providers: Vec<&str> = self.updaters.keys().map(String::as_str).collect();
        providers.sort_unstable();
        f.debug_struct("SecretUpdaters")
            .field("providers", &providers)
            .finish()
    }
}

impl SecretUpdaters {
    /// Registry with no providers
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with every built-in provider
    #[must_use]
    pub fn with_defaults() -> Self {
        ProviderSecretUpdater::ALL
            .into_iter()
            .fold(Self::empty(), |registry, provider| {
                registry.with(provider.as_str(), Arc::new(provider))
            })
    }

    /// Register `updater` under `provider`, replacing any previous entry
    #[must_use]
    pub fn with(mut self, provider: &str, updater: Arc<dyn SecretUpdater>) -> Self {
        self.updaters.insert(provider.to_string(), updater);
        self
    }

    #[must_use]
    pub fn get(&self, provider: &str) -> Option<&Arc<dyn SecretUpdater>> {
        self.updaters.get(provider)
    }
}
