//! Capture sources: each variant turns a user action into a well-formed
//! `CaptureRequest` ready for the orchestrator.

pub mod area;
pub mod file;
pub mod image_url;
pub mod text;

use snapkeep_core::Platform;

/// Where a capture happened. Supplied by the surface alongside the
/// user action.
#[derive(Debug, Clone)]
pub struct CaptureContext {
    /// Page or app location the content came from.
    pub origin_url: String,
    pub origin_title: String,
    pub platform: Platform,
}

impl CaptureContext {
    pub fn new(
        origin_url: impl Into<String>,
        origin_title: impl Into<String>,
        platform: Platform,
    ) -> Self {
        Self {
            origin_url: origin_url.into(),
            origin_title: origin_title.into(),
            platform,
        }
    }
}
