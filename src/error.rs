//! Error types for ingestion, tree merging, and generation.
//!
//! Per-entry failures (`ContentError`, `EntryError`) never abort an import;
//! they are turned into sentinel content or a skipped entry. `ApiError`
//! ends the current attempt and is reported to the user once.

use thiserror::Error;

/// Failure to load a single file's content.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContentError {
    #[error("file too large: {size} bytes")]
    TooLarge { size: u64 },

    #[error("failed to read file: {0}")]
    ReadFailure(String),
}

/// Failure raised by a directory or file handle.
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("failed to enumerate directory: {0}")]
    Enumeration(String),

    #[error("failed to read entry {name}: {reason}")]
    Read { name: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Attempt-level failures surfaced to the user.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Folder access is not supported in this environment")]
    UnsupportedEnvironment,

    #[error("An ingestion is already in progress")]
    IngestionInProgress,

    #[error("Mount path not found: {0}")]
    MountPathNotFound(String),

    #[error("Folder selection failed: {0}")]
    Acquisition(String),

    #[error("Failed to read folder: {0}")]
    DirectoryRead(String),

    #[error("A README generation is already in progress")]
    GenerationInProgress,

    #[error("Generation request failed: {0}")]
    GenerationRequestFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<EntryError> for ApiError {
    fn from(err: EntryError) -> Self {
        ApiError::Acquisition(err.to_string())
    }
}
