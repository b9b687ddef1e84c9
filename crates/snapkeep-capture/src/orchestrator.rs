//! Upload orchestrator: one capture, one session, one best-effort pass
//! through validate → request URL → write blob → register → enrich.
//!
//! The first failure halts every later stage and is reported exactly
//! once. An already-written blob is never cleaned up on a registration
//! failure; orphan handling belongs to the remote service.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use snapkeep_api_client::ApiClient;
use snapkeep_core::{
    CaptureRequest, ClientConfig, ContentValidator, ErrorReport, LogLevel, RegisterFile,
    UploadError, UploadStage,
};

use crate::progress::{ProgressEvent, ProgressSink};

/// What the client retains after a successful pipeline: the file id is
/// the only authoritative handle.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReceipt {
    pub file_id: i64,
    pub storage_key: String,
    pub file_name: String,
    /// Write URL with the presigned query stripped, as registered.
    pub origin_url: String,
}

/// Per-attempt pipeline state. Owned by a single orchestrator
/// invocation; never shared across concurrent captures.
#[derive(Debug)]
struct UploadSession {
    stage: UploadStage,
    /// Storage key reserved by the presigned issuance, once known.
    /// Abandoned as-is when a later stage fails.
    storage_key: Option<String>,
}

impl UploadSession {
    fn new() -> Self {
        Self {
            stage: UploadStage::Idle,
            storage_key: None,
        }
    }

    /// Sessions only ever move forward; a stage is never re-entered.
    fn advance(&mut self, next: UploadStage) {
        debug_assert!(
            next > self.stage,
            "upload session must progress forward (at {:?}, got {:?})",
            self.stage,
            next
        );
        self.stage = next;
    }
}

/// Drives captures through the upload pipeline and reports progress.
///
/// Cheap to clone; concurrent captures get independent sessions and
/// share no mutable state.
#[derive(Clone)]
pub struct UploadOrchestrator {
    api: ApiClient,
    validator: ContentValidator,
    progress: Arc<dyn ProgressSink>,
}

impl UploadOrchestrator {
    pub fn new(api: ApiClient, config: &ClientConfig, progress: Arc<dyn ProgressSink>) -> Self {
        Self {
            api,
            validator: ContentValidator::new(config.max_upload_bytes),
            progress,
        }
    }

    /// Run one capture to its terminal state.
    ///
    /// `Done` is reported as soon as registration succeeds; the
    /// enrichment trigger runs on a detached task and its outcome never
    /// changes the returned result.
    pub async fn upload(&self, request: CaptureRequest) -> Result<UploadReceipt, UploadError> {
        let mut session = UploadSession::new();

        match self.run(&mut session, request).await {
            Ok(receipt) => {
                self.progress.report(ProgressEvent::Done {
                    file_id: receipt.file_id,
                });
                info!(
                    file_id = receipt.file_id,
                    file_name = %receipt.file_name,
                    "Capture upload complete"
                );
                Ok(receipt)
            }
            Err(err) => {
                if let Some(key) = &session.storage_key {
                    debug!(storage_key = %key, "Abandoning reserved storage key");
                }
                match err.log_level() {
                    LogLevel::Debug => debug!(stage = %err.stage(), error = %err, "Capture rejected"),
                    LogLevel::Warn => warn!(stage = %err.stage(), error = %err, "Capture aborted"),
                    LogLevel::Error => error!(stage = %err.stage(), error = %err, "Capture failed"),
                }
                self.progress.report(ProgressEvent::Failed {
                    stage: err.stage(),
                    message: err.user_message(),
                });
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        session: &mut UploadSession,
        request: CaptureRequest,
    ) -> Result<UploadReceipt, UploadError> {
        session.advance(UploadStage::Validating);
        self.progress.report(ProgressEvent::Validating);

        let payload_size = request.payload.len();
        self.validator
            .validate(request.kind, &request.declared_media_type, payload_size)?;

        let file_name = request.suggested_file_name.clone();
        debug!(
            file_name = %file_name,
            media_type = %request.declared_media_type,
            payload_size,
            origin = %request.origin_url,
            "Capture validated"
        );

        session.advance(UploadStage::RequestingUrl);
        let presigned = self.api.get_upload_url(&file_name).await?;
        session.storage_key = Some(presigned.key.clone());

        session.advance(UploadStage::Uploading);
        self.progress.report(ProgressEvent::Uploading);
        self.api
            .upload_blob(
                &presigned.url,
                request.payload.into_bytes(),
                &request.declared_media_type,
            )
            .await?;

        session.advance(UploadStage::Registering);
        // The presigned query grants one-time access and must not be
        // persisted as the origin URL.
        let origin_url = presigned
            .url
            .split('?')
            .next()
            .unwrap_or(&presigned.url)
            .to_string();

        let record = self
            .api
            .complete_upload(&RegisterFile {
                key: presigned.key.clone(),
                media_type: request.declared_media_type.clone(),
                file_size: payload_size as u64,
                origin_url: origin_url.clone(),
                platform: request.platform,
            })
            .await?;

        self.trigger_post_process(record.id);

        session.advance(UploadStage::Done);
        Ok(UploadReceipt {
            file_id: record.id,
            storage_key: presigned.key,
            file_name,
            origin_url,
        })
    }

    /// Fire the enrichment request on a detached task. At most one
    /// dispatch per successful registration; failure is logged only and
    /// never reaches the progress sink.
    fn trigger_post_process(&self, file_id: i64) {
        let api = self.api.clone();
        tokio::spawn(async move {
            match api.post_process(file_id).await {
                Ok(()) => debug!(file_id, "Enrichment triggered"),
                Err(err) => warn!(
                    error = %err,
                    file_id,
                    "Enrichment trigger failed; upload outcome unaffected"
                ),
            }
        });
    }
}
