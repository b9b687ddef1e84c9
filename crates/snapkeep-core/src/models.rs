//! Domain models for the capture-to-storage pipeline.
//!
//! Wire-facing structs use the remote service's camelCase field names;
//! everything else follows Rust naming.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Pipeline stage, used both for session tracking and for naming the
/// failing step in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UploadStage {
    Idle,
    Validating,
    RequestingUrl,
    Uploading,
    Registering,
    PostProcessing,
    Done,
}

impl UploadStage {
    /// Human-readable purpose of the stage, in user terms.
    pub fn purpose(&self) -> &'static str {
        match self {
            UploadStage::Idle => "idle",
            UploadStage::Validating => "content validation",
            UploadStage::RequestingUrl => "upload URL generation",
            UploadStage::Uploading => "storage write",
            UploadStage::Registering => "file registration",
            UploadStage::PostProcessing => "post-processing",
            UploadStage::Done => "done",
        }
    }
}

impl std::fmt::Display for UploadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.purpose())
    }
}

/// Client surface that produced a capture. Wire values match the remote
/// service's `platform` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Web,
    App,
    Extension,
}

/// What kind of content a capture carries. Determines the generated
/// file-name category and which validation allow-list applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// Area-selection screenshot.
    Screenshot,
    /// Dragged, right-clicked, or picked image.
    Image,
    /// Selected or pasted text.
    Text,
}

impl CaptureKind {
    /// File-name category prefix.
    pub fn category(&self) -> &'static str {
        match self {
            CaptureKind::Screenshot => "capture",
            CaptureKind::Image => "image",
            CaptureKind::Text => "text",
        }
    }
}

/// Raw captured content. Text is UTF-8 by construction; callers must
/// normalize foreign encodings before building a payload.
#[derive(Debug, Clone)]
pub enum CapturePayload {
    Bytes(Bytes),
    Text(String),
}

impl CapturePayload {
    pub fn len(&self) -> usize {
        match self {
            CapturePayload::Bytes(b) => b.len(),
            CapturePayload::Text(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The payload as the exact bytes that will be written to storage.
    pub fn into_bytes(self) -> Bytes {
        match self {
            CapturePayload::Bytes(b) => b,
            CapturePayload::Text(t) => Bytes::from(t.into_bytes()),
        }
    }
}

/// A single user-initiated capture, ready for the upload pipeline.
///
/// Immutable once built; consumed by exactly one orchestrator invocation
/// and discarded when the pipeline terminates.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    pub kind: CaptureKind,
    pub payload: CapturePayload,
    pub declared_media_type: String,
    pub suggested_file_name: String,
    /// Page or app location the content was captured from. Capture
    /// context only; the registered `originUrl` is derived from the
    /// presigned write URL, not from this field.
    pub origin_url: String,
    pub origin_title: String,
    pub platform: Platform,
}

/// One-time write location issued by the remote service.
#[derive(Debug, Clone, Deserialize)]
pub struct PresignedUpload {
    /// Time-bounded URL authorizing a single direct blob write.
    pub url: String,
    /// Durable storage key the service later binds to a file record.
    pub key: String,
}

/// Registration request binding a written blob to a file record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterFile {
    pub key: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub file_size: u64,
    /// Write URL with the presigned query component stripped. The
    /// one-time-access parameters must never be persisted.
    pub origin_url: String,
    pub platform: Platform,
}

/// The client-side mirror of a registered file record. Only the id is
/// authoritative on this side.
#[derive(Debug, Clone, Deserialize)]
pub struct FileRecord {
    pub id: i64,
}

/// The remote service wraps every JSON response in `{ "data": ... }`.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}
