//! Client configuration.
//!
//! The base API URL and upload cap are injected from the environment;
//! the pipeline owns no persisted configuration of its own.

use std::env;

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the remote content service.
    pub api_base_url: String,
    /// Upper bound enforced by the content validator.
    pub max_upload_bytes: usize,
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Read configuration from SNAPKEEP_API_URL and
    /// SNAPKEEP_MAX_UPLOAD_BYTES, with defaults for both.
    pub fn from_env() -> Self {
        let api_base_url =
            env::var("SNAPKEEP_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let max_upload_bytes = env::var("SNAPKEEP_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Self {
            api_base_url,
            max_upload_bytes,
        }
    }
}
