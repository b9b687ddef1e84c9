//! Selected-text capture: a non-empty selection becomes a UTF-8
//! `text/plain` payload.

use snapkeep_core::{
    generated_file_name, CaptureKind, CapturePayload, CaptureRequest, UploadError,
};

use super::CaptureContext;

pub struct TextCaptureSource;

impl TextCaptureSource {
    /// Build a text capture from the active selection. Requires a
    /// non-empty selection at drag start; whitespace-only selections
    /// count as empty.
    pub fn capture(
        selection: &str,
        context: &CaptureContext,
    ) -> Result<CaptureRequest, UploadError> {
        if selection.trim().is_empty() {
            return Err(UploadError::InvalidCapture(
                "text selection is empty".to_string(),
            ));
        }

        Ok(CaptureRequest {
            kind: CaptureKind::Text,
            suggested_file_name: generated_file_name(CaptureKind::Text, "text/plain"),
            payload: CapturePayload::Text(selection.to_string()),
            declared_media_type: "text/plain".to_string(),
            origin_url: context.origin_url.clone(),
            origin_title: context.origin_title.clone(),
            platform: context.platform,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapkeep_core::Platform;

    fn context() -> CaptureContext {
        CaptureContext::new("https://example.com/article", "Article", Platform::Web)
    }

    #[test]
    fn selection_becomes_utf8_text_plain_payload() {
        let request = TextCaptureSource::capture("Hello world", &context()).unwrap();

        assert_eq!(request.kind, CaptureKind::Text);
        assert_eq!(request.declared_media_type, "text/plain");
        assert_eq!(request.payload.len(), 11);

        let rest = request
            .suggested_file_name
            .strip_prefix("text_")
            .expect("text_ prefix");
        let (millis, ext) = rest.split_once('.').expect("extension");
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(ext, "txt");
    }

    #[test]
    fn multibyte_selection_length_is_in_bytes() {
        let request = TextCaptureSource::capture("안녕하세요", &context()).unwrap();
        assert_eq!(request.payload.len(), 15);
    }

    #[test]
    fn empty_or_whitespace_selection_is_rejected() {
        assert!(TextCaptureSource::capture("", &context()).is_err());
        assert!(TextCaptureSource::capture("   \n\t", &context()).is_err());
    }
}
