//! Image-by-URL capture: drag-and-drop of an image element and the
//! context-menu "save this image" action both resolve to fetching the
//! image's source URL and sniffing its real type from the bytes.

use std::sync::Arc;

use tracing::debug;

use snapkeep_core::{
    generated_file_name, CaptureKind, CapturePayload, CaptureRequest, UploadError,
};

use crate::fetch::{detected_media_type, ByteFetcher};

use super::CaptureContext;

pub struct ImageUrlCaptureSource {
    fetcher: Arc<dyn ByteFetcher>,
}

impl ImageUrlCaptureSource {
    pub fn new(fetcher: Arc<dyn ByteFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch the image bytes from their source URL. The declared type
    /// comes from the content itself, never from the URL path; a
    /// non-image type simply fails validation downstream.
    pub async fn capture(
        &self,
        image_src_url: &str,
        context: &CaptureContext,
    ) -> Result<CaptureRequest, UploadError> {
        let fetched = self.fetcher.fetch(image_src_url).await?;
        let media_type = detected_media_type(&fetched.bytes, fetched.media_type.as_deref());

        debug!(
            src = %image_src_url,
            media_type = %media_type,
            bytes = fetched.bytes.len(),
            "Image capture fetched"
        );

        Ok(CaptureRequest {
            kind: CaptureKind::Image,
            suggested_file_name: generated_file_name(CaptureKind::Image, &media_type),
            payload: CapturePayload::Bytes(fetched.bytes),
            declared_media_type: media_type,
            origin_url: context.origin_url.clone(),
            origin_title: context.origin_title.clone(),
            platform: context.platform,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchedContent;
    use async_trait::async_trait;
    use bytes::Bytes;
    use snapkeep_core::Platform;

    struct FakeFetcher {
        content: FetchedContent,
    }

    #[async_trait]
    impl ByteFetcher for FakeFetcher {
        async fn fetch(&self, _url: &str) -> Result<FetchedContent, UploadError> {
            Ok(self.content.clone())
        }
    }

    fn context() -> CaptureContext {
        CaptureContext::new("https://example.com", "Example", Platform::Web)
    }

    #[tokio::test]
    async fn sniffs_jpeg_despite_misleading_url_and_header() {
        let source = ImageUrlCaptureSource::new(Arc::new(FakeFetcher {
            content: FetchedContent {
                bytes: Bytes::from_static(b"\xff\xd8\xff\xe0 jpeg-body"),
                media_type: Some("application/octet-stream".into()),
            },
        }));

        let request = source
            .capture("https://cdn.example.com/picture.png", &context())
            .await
            .unwrap();

        assert_eq!(request.declared_media_type, "image/jpeg");
        assert_eq!(request.kind, CaptureKind::Image);
        assert!(request.suggested_file_name.starts_with("image_"));
        assert!(request.suggested_file_name.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn gif_content_is_detected_as_gif() {
        // The validator will reject this downstream; the source's job
        // is only to report what the bytes actually are.
        let source = ImageUrlCaptureSource::new(Arc::new(FakeFetcher {
            content: FetchedContent {
                bytes: Bytes::from_static(b"GIF89a gif-body"),
                media_type: Some("image/png".into()),
            },
        }));

        let request = source
            .capture("https://cdn.example.com/anim", &context())
            .await
            .unwrap();

        assert_eq!(request.declared_media_type, "image/gif");
    }
}
