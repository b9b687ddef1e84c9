//! Byte fetching and content sniffing for URL-based captures.

use async_trait::async_trait;
use bytes::Bytes;

use snapkeep_core::UploadError;

/// Bytes fetched from a source URL plus the transport's declared type.
#[derive(Debug, Clone)]
pub struct FetchedContent {
    pub bytes: Bytes,
    /// `Content-Type` reported by the transport, if any. A fallback
    /// only; sniffed types take precedence.
    pub media_type: Option<String>,
}

/// Fetches raw bytes for drag-and-drop and context-menu image captures.
#[async_trait]
pub trait ByteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedContent, UploadError>;
}

/// Plain HTTP fetcher. Image sources are third-party URLs, so failures
/// are capture problems (the user can pick other content), not pipeline
/// stage failures.
#[derive(Clone, Default)]
pub struct HttpByteFetcher {
    client: reqwest::Client,
}

impl HttpByteFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ByteFetcher for HttpByteFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedContent, UploadError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            UploadError::InvalidCapture(format!("could not fetch content from {}: {}", url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::InvalidCapture(format!(
                "source returned status {} for {}",
                status, url
            )));
        }

        let media_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await.map_err(|e| {
            UploadError::InvalidCapture(format!("could not read content from {}: {}", url, e))
        })?;

        Ok(FetchedContent { bytes, media_type })
    }
}

/// Determine the media type from the actual content, never from the URL
/// path. Magic-byte sniffing wins; the transport's `Content-Type` is
/// the fallback (with MIME parameters stripped), then octet-stream,
/// which the validator rejects for image captures.
pub fn detected_media_type(bytes: &[u8], transport_type: Option<&str>) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }

    transport_type
        .and_then(|t| t.split(';').next())
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n rest-of-image";
    const JPEG_MAGIC: &[u8] = b"\xff\xd8\xff\xe0 rest-of-image";

    #[test]
    fn sniffed_type_wins_over_transport_header() {
        // Server lies with text/html; the bytes are a PNG.
        assert_eq!(
            detected_media_type(PNG_MAGIC, Some("text/html")),
            "image/png"
        );
        assert_eq!(detected_media_type(JPEG_MAGIC, None), "image/jpeg");
    }

    #[test]
    fn unsniffable_bytes_fall_back_to_transport_type() {
        assert_eq!(
            detected_media_type(b"plain words", Some("text/plain; charset=utf-8")),
            "text/plain"
        );
        assert_eq!(
            detected_media_type(b"plain words", None),
            "application/octet-stream"
        );
    }
}
