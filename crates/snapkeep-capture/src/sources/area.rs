//! Area-selection capture: full-viewport screenshot, cropped to the
//! user's rectangle by a rendering collaborator, decoded from its data
//! URL into PNG bytes.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

use snapkeep_core::{
    generated_file_name, CaptureKind, CapturePayload, CaptureRequest, UploadError,
};

use super::CaptureContext;

/// User-selected rectangle, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Takes the full-viewport screenshot, returned as a PNG data URL.
#[async_trait]
pub trait ViewportScreenshot: Send + Sync {
    async fn capture_viewport(&self) -> Result<String, UploadError>;
}

/// Rendering collaborator that crops a screenshot data URL to a region
/// and returns the cropped image as a data URL.
#[async_trait]
pub trait RegionCropper: Send + Sync {
    async fn crop(&self, image_data_url: &str, region: Region) -> Result<String, UploadError>;
}

pub struct AreaCaptureSource {
    screenshot: Arc<dyn ViewportScreenshot>,
    cropper: Arc<dyn RegionCropper>,
}

impl AreaCaptureSource {
    pub fn new(screenshot: Arc<dyn ViewportScreenshot>, cropper: Arc<dyn RegionCropper>) -> Self {
        Self { screenshot, cropper }
    }

    pub async fn capture(
        &self,
        region: Region,
        context: &CaptureContext,
    ) -> Result<CaptureRequest, UploadError> {
        if region.width == 0 || region.height == 0 {
            return Err(UploadError::InvalidCapture(
                "selected region is empty".to_string(),
            ));
        }

        let full = self.screenshot.capture_viewport().await?;
        let cropped = self.cropper.crop(&full, region).await?;
        let (media_type, bytes) = decode_data_url(&cropped)?;

        debug!(
            width = region.width,
            height = region.height,
            media_type = %media_type,
            bytes = bytes.len(),
            "Area capture decoded"
        );

        Ok(CaptureRequest {
            kind: CaptureKind::Screenshot,
            suggested_file_name: generated_file_name(CaptureKind::Screenshot, &media_type),
            payload: CapturePayload::Bytes(bytes),
            declared_media_type: media_type,
            origin_url: context.origin_url.clone(),
            origin_title: context.origin_title.clone(),
            platform: context.platform,
        })
    }
}

/// Decode a `data:{type};base64,{payload}` URL into its media type and
/// raw bytes.
pub(crate) fn decode_data_url(data_url: &str) -> Result<(String, Bytes), UploadError> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| UploadError::InvalidCapture("cropped image is not a data URL".to_string()))?;

    let (meta, encoded) = rest.split_once(',').ok_or_else(|| {
        UploadError::InvalidCapture("data URL is missing its payload".to_string())
    })?;

    let media_type = meta.strip_suffix(";base64").ok_or_else(|| {
        UploadError::InvalidCapture("data URL is not base64-encoded".to_string())
    })?;

    let bytes = STANDARD.decode(encoded).map_err(|e| {
        UploadError::InvalidCapture(format!("data URL payload is not valid base64: {}", e))
    })?;

    Ok((media_type.to_string(), Bytes::from(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapkeep_core::Platform;

    struct FixedScreenshot(String);

    #[async_trait]
    impl ViewportScreenshot for FixedScreenshot {
        async fn capture_viewport(&self) -> Result<String, UploadError> {
            Ok(self.0.clone())
        }
    }

    /// Cropper that hands back a fixed data URL regardless of input.
    struct FixedCropper(String);

    #[async_trait]
    impl RegionCropper for FixedCropper {
        async fn crop(&self, _image: &str, _region: Region) -> Result<String, UploadError> {
            Ok(self.0.clone())
        }
    }

    fn png_data_url(bytes: &[u8]) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(bytes))
    }

    fn context() -> CaptureContext {
        CaptureContext::new("https://example.com/page", "Example", Platform::Extension)
    }

    #[test]
    fn decodes_data_url_type_and_bytes() {
        let (media_type, bytes) = decode_data_url(&png_data_url(b"PNGBYTES")).unwrap();
        assert_eq!(media_type, "image/png");
        assert_eq!(bytes.as_ref(), b"PNGBYTES");
    }

    #[test]
    fn rejects_malformed_data_urls() {
        for bad in [
            "https://example.com/not-a-data-url",
            "data:image/png;base64",
            "data:image/png,plain-not-base64-marker",
            "data:image/png;base64,@@@not-base64@@@",
        ] {
            assert!(
                matches!(decode_data_url(bad), Err(UploadError::InvalidCapture(_))),
                "{bad}"
            );
        }
    }

    #[tokio::test]
    async fn area_capture_declares_png_and_generates_capture_name() {
        let source = AreaCaptureSource::new(
            Arc::new(FixedScreenshot(png_data_url(b"FULL_VIEWPORT"))),
            Arc::new(FixedCropper(png_data_url(b"CROPPED"))),
        );
        let region = Region {
            x: 10,
            y: 20,
            width: 100,
            height: 50,
        };

        let request = source.capture(region, &context()).await.unwrap();

        assert_eq!(request.kind, CaptureKind::Screenshot);
        assert_eq!(request.declared_media_type, "image/png");
        assert!(request.suggested_file_name.starts_with("capture_"));
        assert!(request.suggested_file_name.ends_with(".png"));
        assert_eq!(request.payload.len(), b"CROPPED".len());
        assert_eq!(request.platform, Platform::Extension);
    }

    #[tokio::test]
    async fn empty_region_is_rejected_before_any_screenshot() {
        let source = AreaCaptureSource::new(
            Arc::new(FixedScreenshot(png_data_url(b"FULL"))),
            Arc::new(FixedCropper(png_data_url(b"CROP"))),
        );
        let region = Region {
            x: 0,
            y: 0,
            width: 0,
            height: 10,
        };

        let err = source.capture(region, &context()).await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidCapture(_)));
    }
}
