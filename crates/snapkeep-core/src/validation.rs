//! Content validation and file naming.
//!
//! Pure decision functions: a rejected capture never reaches the
//! network, and the caller is responsible for surfacing the rejection.

use chrono::Utc;

use crate::error::UploadError;
use crate::models::CaptureKind;

/// Media types accepted for image and screenshot captures.
const IMAGE_ALLOW_LIST: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

/// User-facing rendering of the image allow-list.
const IMAGE_ALLOWED_DISPLAY: &str = "PNG, JPEG";

/// Normalize a MIME type by stripping parameters
/// (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
fn normalize_media_type(media_type: &str) -> &str {
    media_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(media_type)
}

/// User-facing short name for a media type ("image/gif" -> "GIF").
fn display_type(media_type: &str) -> String {
    normalize_media_type(media_type)
        .rsplit('/')
        .next()
        .unwrap_or(media_type)
        .to_uppercase()
}

/// Accepts or rejects captured content before any network call.
#[derive(Debug, Clone)]
pub struct ContentValidator {
    max_upload_bytes: usize,
}

impl ContentValidator {
    pub fn new(max_upload_bytes: usize) -> Self {
        Self { max_upload_bytes }
    }

    /// Validate a capture's declared media type and payload size.
    ///
    /// Image and screenshot captures are gated by the image allow-list
    /// (case-insensitive, MIME parameters ignored). Text captures are
    /// always accepted as `text/plain`; the caller must have normalized
    /// the text to UTF-8 beforehand.
    pub fn validate(
        &self,
        kind: CaptureKind,
        declared_media_type: &str,
        payload_size: usize,
    ) -> Result<(), UploadError> {
        if payload_size == 0 {
            return Err(UploadError::InvalidCapture(
                "captured content is empty".to_string(),
            ));
        }
        if payload_size > self.max_upload_bytes {
            return Err(UploadError::TooLarge {
                size: payload_size,
                max: self.max_upload_bytes,
            });
        }

        match kind {
            CaptureKind::Image | CaptureKind::Screenshot => {
                let normalized = normalize_media_type(declared_media_type).to_lowercase();
                if !IMAGE_ALLOW_LIST.contains(&normalized.as_str()) {
                    return Err(UploadError::Validation {
                        detected: display_type(declared_media_type),
                        allowed: IMAGE_ALLOWED_DISPLAY.to_string(),
                    });
                }
                Ok(())
            }
            CaptureKind::Text => Ok(()),
        }
    }
}

/// File extension for a capture, derived from its media type.
///
/// Unrecognized image subtypes default to `png` (the original clients
/// re-encode screenshots as PNG).
fn extension_for(kind: CaptureKind, media_type: &str) -> &'static str {
    match kind {
        CaptureKind::Text => "txt",
        CaptureKind::Image | CaptureKind::Screenshot => {
            match normalize_media_type(media_type).to_lowercase().as_str() {
                "image/jpeg" | "image/jpg" => "jpg",
                _ => "png",
            }
        }
    }
}

/// Generate the upload file name: `{category}_{unix_millis}.{ext}`.
pub fn generated_file_name(kind: CaptureKind, media_type: &str) -> String {
    format!(
        "{}_{}.{}",
        kind.category(),
        Utc::now().timestamp_millis(),
        extension_for(kind, media_type)
    )
}
