//! HTTP client for the Snapkeep content service.
//!
//! Provides a minimal client with injected bearer credentials, generic
//! request helpers, and the four pipeline calls (upload-URL issuance,
//! direct blob write, file registration, enrichment trigger). Every
//! surface talks to the service through this client.

pub mod api;

use std::sync::Arc;

use reqwest::Client;
use serde::de::DeserializeOwned;

use snapkeep_core::{
    ClientConfig, CredentialProvider, EnvCredentialProvider, UploadError, UploadStage,
};

/// HTTP client for the content service. Cheap to clone; the credential
/// provider is consulted on every authenticated call, never cached.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialProvider>) -> Self {
        // Upload stages carry no client-enforced timeout; the transport
        // defaults apply.
        let client = Client::new();
        let base_url = base_url.into();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Client from the environment: SNAPKEEP_API_URL for the base URL,
    /// SNAPKEEP_ACCESS_TOKEN for the credential.
    pub fn from_env() -> Self {
        let config = ClientConfig::from_env();
        Self::new(
            config.api_base_url,
            Arc::new(EnvCredentialProvider::default()),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Bearer token for an authenticated call, read at the moment of
    /// use. A credential failure is attributed to the calling stage.
    async fn bearer(&self, stage: UploadStage) -> Result<String, UploadError> {
        let token = self
            .credentials
            .access_token()
            .await
            .map_err(|e| e.at_stage(stage))?;
        Ok(format!("Bearer {}", token))
    }

    /// Map a transport failure at the given stage.
    fn transport_error(stage: UploadStage, err: reqwest::Error) -> UploadError {
        UploadError::Network {
            stage,
            message: err.to_string(),
        }
    }

    /// Turn a non-2xx response into the stage-appropriate error. A 401
    /// from the API server is an authentication failure; everything
    /// else is a server error carrying the response body.
    async fn check_status(
        stage: UploadStage,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, UploadError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(UploadError::Unauthorized {
                stage,
                message: "access token rejected by the server".to_string(),
            });
        }

        Err(UploadError::Server {
            stage,
            status: status.as_u16(),
            message: body,
        })
    }

    /// Authenticated GET, deserializing the JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        stage: UploadStage,
        path: &str,
    ) -> Result<T, UploadError> {
        let bearer = self.bearer(stage).await?;
        let response = self
            .client
            .get(self.build_url(path))
            .header(reqwest::header::AUTHORIZATION, bearer)
            .send()
            .await
            .map_err(|e| Self::transport_error(stage, e))?;

        let response = Self::check_status(stage, response).await?;
        let status = response.status().as_u16();
        response.json().await.map_err(|e| UploadError::Server {
            stage,
            status,
            message: format!("invalid response body: {}", e),
        })
    }

    /// Authenticated POST with a JSON body, deserializing the response.
    async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        stage: UploadStage,
        path: &str,
        body: &B,
    ) -> Result<T, UploadError> {
        let bearer = self.bearer(stage).await?;
        let response = self
            .client
            .post(self.build_url(path))
            .header(reqwest::header::AUTHORIZATION, bearer)
            .json(body)
            .send()
            .await
            .map_err(|e| Self::transport_error(stage, e))?;

        let response = Self::check_status(stage, response).await?;
        let status = response.status().as_u16();
        response.json().await.map_err(|e| UploadError::Server {
            stage,
            status,
            message: format!("invalid response body: {}", e),
        })
    }

    /// Authenticated POST with no body, ignoring the response body.
    async fn post_empty(&self, stage: UploadStage, path: &str) -> Result<(), UploadError> {
        let bearer = self.bearer(stage).await?;
        let response = self
            .client
            .post(self.build_url(path))
            .header(reqwest::header::AUTHORIZATION, bearer)
            .send()
            .await
            .map_err(|e| Self::transport_error(stage, e))?;

        Self::check_status(stage, response).await?;
        Ok(())
    }

    /// Raw client for requests outside the API base URL (the direct
    /// blob write). No auth is applied.
    fn raw(&self) -> &Client {
        &self.client
    }
}
