//! Credential access port.
//!
//! The pipeline reads the access token at the moment of use and never
//! caches or mutates it. Surfaces inject a provider instead of reaching
//! into ambient global auth state.

use async_trait::async_trait;

use crate::error::UploadError;

/// Read-only access to the bearer credential for authenticated calls.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Current access token. A missing or empty token is a terminal
    /// `Unauthorized` for the attempt.
    async fn access_token(&self) -> Result<String, UploadError>;
}

/// Fixed-token provider, for surfaces that hold a session token in
/// memory and for tests.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    token: String,
}

impl StaticCredentialProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn access_token(&self) -> Result<String, UploadError> {
        if self.token.is_empty() {
            return Err(UploadError::missing_credential("no access token configured"));
        }
        Ok(self.token.clone())
    }
}

/// Provider backed by an environment variable, read on every call so a
/// refreshed token is picked up without rebuilding the client.
#[derive(Debug, Clone)]
pub struct EnvCredentialProvider {
    var: String,
}

impl EnvCredentialProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredentialProvider {
    fn default() -> Self {
        Self::new("SNAPKEEP_ACCESS_TOKEN")
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn access_token(&self) -> Result<String, UploadError> {
        match std::env::var(&self.var) {
            Ok(token) if !token.is_empty() => Ok(token),
            _ => Err(UploadError::missing_credential(format!(
                "set {} to authenticate",
                self.var
            ))),
        }
    }
}
