//! Snapkeep Capture Library
//!
//! The shared half of every Snapkeep surface: capture sources turn user
//! actions into `CaptureRequest`s, and the upload orchestrator drives
//! each request through validation, presigned-URL issuance, the direct
//! blob write, file registration, and the detached enrichment trigger.
//!
//! Surfaces plug in through small collaborator traits (`ProgressSink`,
//! `ByteFetcher`, `ViewportScreenshot`, `RegionCropper`) and, for
//! browser-style integrations, the async request/response bridge.

pub mod bridge;
pub mod fetch;
pub mod orchestrator;
pub mod progress;
pub mod sources;

// Re-export commonly used types
pub use fetch::{ByteFetcher, FetchedContent, HttpByteFetcher};
pub use orchestrator::{UploadOrchestrator, UploadReceipt};
pub use progress::{ProgressEvent, ProgressSink, TracingProgressSink};
pub use sources::CaptureContext;
