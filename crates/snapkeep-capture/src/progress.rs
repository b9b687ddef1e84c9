//! Progress reporting port.
//!
//! The orchestrator reports through this trait; how the events are
//! presented (dialog, toast, notification, stderr) is the surface's
//! concern. Registration and post-processing are internal stages and
//! are not separately observable.

use snapkeep_core::UploadStage;
use tracing::{debug, info, warn};

/// Observable pipeline signal for the user-facing surface.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Capture accepted for processing; validation is starting.
    Validating,
    /// Bytes are being written to storage ("uploading…" feedback).
    Uploading,
    /// Registration succeeded. Enrichment may still be in flight.
    Done { file_id: i64 },
    /// The pipeline stopped at `stage`; `message` is in user terms and
    /// suitable for a transient, auto-dismissed notification.
    Failed { stage: UploadStage, message: String },
}

/// Where progress goes. Implementations must tolerate events after the
/// user dismissed the surface; a dismissed presenter just drops them.
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Default sink: log-only, for surfaces without visible progress UI.
#[derive(Debug, Default)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Validating => debug!("Validating capture"),
            ProgressEvent::Uploading => debug!("Uploading capture to storage"),
            ProgressEvent::Done { file_id } => info!(file_id, "Capture saved"),
            ProgressEvent::Failed { stage, message } => {
                warn!(stage = %stage, message = %message, "Capture failed")
            }
        }
    }
}
