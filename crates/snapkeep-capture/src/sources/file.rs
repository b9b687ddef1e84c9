//! Picked-file and clipboard capture: the user supplies a file handle
//! (or pasted file) whose bytes and declared type are read directly.

use bytes::Bytes;
use tracing::debug;

use snapkeep_core::{
    generated_file_name, CaptureKind, CapturePayload, CaptureRequest, UploadError,
};

use crate::fetch::detected_media_type;

use super::CaptureContext;

/// A file handle already read by the surface (picker dialog, paste).
#[derive(Debug, Clone)]
pub struct PickedFile {
    /// Original file name, kept for logging only; the upload name is
    /// always generated.
    pub file_name: String,
    pub bytes: Bytes,
    /// Type declared by the picker/clipboard, if any.
    pub declared_media_type: Option<String>,
}

pub struct FileCaptureSource;

impl FileCaptureSource {
    /// Build a capture from a picked file.
    ///
    /// Declared `text/plain` content is normalized to UTF-8 (lossy for
    /// foreign encodings) and uploaded as a text capture. Anything else
    /// is treated as an image capture whose type is sniffed from the
    /// bytes; the validator decides downstream whether it is allowed.
    pub fn capture(
        file: PickedFile,
        context: &CaptureContext,
    ) -> Result<CaptureRequest, UploadError> {
        if file.bytes.is_empty() {
            return Err(UploadError::InvalidCapture(format!(
                "file {} is empty",
                file.file_name
            )));
        }

        let declared = file
            .declared_media_type
            .as_deref()
            .and_then(|t| t.split(';').next())
            .map(|t| t.trim().to_ascii_lowercase());

        if declared.as_deref() == Some("text/plain") {
            let text = String::from_utf8_lossy(&file.bytes).into_owned();
            debug!(file_name = %file.file_name, bytes = text.len(), "Picked file read as text");

            return Ok(CaptureRequest {
                kind: CaptureKind::Text,
                suggested_file_name: generated_file_name(CaptureKind::Text, "text/plain"),
                payload: CapturePayload::Text(text),
                declared_media_type: "text/plain".to_string(),
                origin_url: context.origin_url.clone(),
                origin_title: context.origin_title.clone(),
                platform: context.platform,
            });
        }

        let media_type = detected_media_type(&file.bytes, declared.as_deref());
        debug!(
            file_name = %file.file_name,
            media_type = %media_type,
            bytes = file.bytes.len(),
            "Picked file read as binary"
        );

        Ok(CaptureRequest {
            kind: CaptureKind::Image,
            suggested_file_name: generated_file_name(CaptureKind::Image, &media_type),
            payload: CapturePayload::Bytes(file.bytes),
            declared_media_type: media_type,
            origin_url: context.origin_url.clone(),
            origin_title: context.origin_title.clone(),
            platform: context.platform,
        })
    }
}
