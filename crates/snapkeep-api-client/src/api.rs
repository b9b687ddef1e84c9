//! Pipeline calls against the content service.
//!
//! Wire shapes come from `snapkeep_core::models`; every response is
//! wrapped in the service's `{ "data": ... }` envelope.

use bytes::Bytes;
use tracing::debug;

use snapkeep_core::{ApiEnvelope, FileRecord, PresignedUpload, RegisterFile, UploadError, UploadStage};

use crate::ApiClient;

impl ApiClient {
    /// Ask the service for a one-time write location for `file_name`.
    ///
    /// Returns the time-bounded write URL and the durable storage key
    /// the service will later bind to a file record.
    pub async fn get_upload_url(&self, file_name: &str) -> Result<PresignedUpload, UploadError> {
        let path = format!(
            "/s3/presigned/upload?fileName={}",
            urlencoding::encode(file_name)
        );

        let envelope: ApiEnvelope<PresignedUpload> =
            self.get_json(UploadStage::RequestingUrl, &path).await?;

        debug!(key = %envelope.data.key, "Received presigned upload location");
        Ok(envelope.data)
    }

    /// Write the payload directly to the presigned location.
    ///
    /// Goes straight to blob storage, not through the API server: no
    /// auth header, the exact media type as `Content-Type`, and the
    /// payload as a single unit. Any failure abandons the storage key.
    pub async fn upload_blob(
        &self,
        write_url: &str,
        payload: Bytes,
        media_type: &str,
    ) -> Result<(), UploadError> {
        let response = self
            .raw()
            .put(write_url)
            .header(reqwest::header::CONTENT_TYPE, media_type)
            .body(payload)
            .send()
            .await
            .map_err(|e| UploadError::Network {
                stage: UploadStage::Uploading,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Server {
                stage: UploadStage::Uploading,
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(())
    }

    /// Register the written blob as a file record. The returned id is
    /// the only handle the client retains afterward.
    pub async fn complete_upload(&self, request: &RegisterFile) -> Result<FileRecord, UploadError> {
        let envelope: ApiEnvelope<FileRecord> = self
            .post_json(UploadStage::Registering, "/files/complete", request)
            .await?;

        debug!(file_id = envelope.data.id, "File registered");
        Ok(envelope.data)
    }

    /// Ask the service to enrich (tag/classify) a registered file.
    /// The response body is ignored by the caller.
    pub async fn post_process(&self, file_id: i64) -> Result<(), UploadError> {
        self.post_empty(
            UploadStage::PostProcessing,
            &format!("/files/{}/post-process", file_id),
        )
        .await
    }
}
