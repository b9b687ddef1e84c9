//! Snapkeep Core Library
//!
//! This crate provides the domain models, content validation, error types,
//! credential port, and client configuration shared by all Snapkeep
//! components. It performs no network I/O of its own.

pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::ClientConfig;
pub use credentials::{CredentialProvider, EnvCredentialProvider, StaticCredentialProvider};
pub use error::{ErrorReport, LogLevel, UploadError};
pub use models::{
    ApiEnvelope, CaptureKind, CapturePayload, CaptureRequest, FileRecord, Platform,
    PresignedUpload, RegisterFile, UploadStage,
};
pub use validation::{generated_file_name, ContentValidator};
