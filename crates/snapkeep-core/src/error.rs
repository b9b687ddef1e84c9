//! Error types module
//!
//! All pipeline failures are unified under the `UploadError` enum. The
//! first failing stage aborts the attempt; there are no automatic
//! retries and no compensating cleanup of already-written blobs.

use crate::models::UploadStage;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Presentation metadata for errors. Lets a surface render a transient
/// notification without matching on variants.
pub trait ErrorReport {
    /// Pipeline stage the failure belongs to.
    fn stage(&self) -> UploadStage;

    /// User-facing message for the failure notification.
    fn user_message(&self) -> String;

    /// Whether the user can recover by changing their input
    /// (as opposed to re-authenticating or waiting out an outage).
    fn is_recoverable(&self) -> bool;

    /// Log level for this error.
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Content rejected before any network call.
    #[error("unsupported content type {detected}: allowed types are {allowed}")]
    Validation { detected: String, allowed: String },

    /// Missing or rejected credential at the named stage. Terminal for
    /// the attempt.
    #[error("authentication required during {stage}: {message}")]
    Unauthorized { stage: UploadStage, message: String },

    /// Transport-level failure at a network stage. Terminal, not retried.
    #[error("network error during {stage}: {message}")]
    Network { stage: UploadStage, message: String },

    /// Non-2xx response from the remote service. Terminal.
    #[error("{stage} failed with status {status}: {message}")]
    Server {
        stage: UploadStage,
        status: u16,
        message: String,
    },

    /// Payload exceeds the configured upload cap.
    #[error("payload of {size} bytes exceeds maximum of {max} bytes")]
    TooLarge { size: usize, max: usize },

    /// Malformed capture input (bad data URL, empty selection,
    /// unreadable file) detected by a capture source.
    #[error("invalid capture: {0}")]
    InvalidCapture(String),
}

impl UploadError {
    /// Credential failure raised by a provider, before any stage context
    /// is known. Attributed to the first authenticated call until the
    /// caller re-attributes it with [`UploadError::at_stage`].
    pub fn missing_credential(message: impl Into<String>) -> Self {
        UploadError::Unauthorized {
            stage: UploadStage::RequestingUrl,
            message: message.into(),
        }
    }

    /// Re-attribute a credential failure to the stage that actually hit
    /// it. Other variants already carry their stage and pass through.
    pub fn at_stage(self, stage: UploadStage) -> Self {
        match self {
            UploadError::Unauthorized { message, .. } => {
                UploadError::Unauthorized { stage, message }
            }
            other => other,
        }
    }
}

impl ErrorReport for UploadError {
    fn stage(&self) -> UploadStage {
        match self {
            UploadError::Validation { .. }
            | UploadError::TooLarge { .. }
            | UploadError::InvalidCapture(_) => UploadStage::Validating,
            UploadError::Unauthorized { stage, .. }
            | UploadError::Network { stage, .. }
            | UploadError::Server { stage, .. } => *stage,
        }
    }

    fn user_message(&self) -> String {
        match self {
            UploadError::Validation { detected, allowed } => format!(
                "This content type ({detected}) is not supported. Allowed: {allowed}."
            ),
            UploadError::Unauthorized { .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            UploadError::Network { stage, .. } => {
                format!("Could not reach the server ({stage} failed). Check your connection.")
            }
            UploadError::Server { stage, .. } => format!("{stage} failed. Please try again."),
            UploadError::TooLarge { max, .. } => format!(
                "This file is too large. The maximum size is {} MB.",
                max / 1024 / 1024
            ),
            UploadError::InvalidCapture(reason) => format!("Could not capture content: {reason}"),
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            UploadError::Validation { .. }
                | UploadError::TooLarge { .. }
                | UploadError::InvalidCapture(_)
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploadError::Validation { .. }
            | UploadError::TooLarge { .. }
            | UploadError::InvalidCapture(_) => LogLevel::Debug,
            UploadError::Unauthorized { .. } => LogLevel::Warn,
            UploadError::Network { .. } | UploadError::Server { .. } => LogLevel::Error,
        }
    }
}
