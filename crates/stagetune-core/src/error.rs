//! Tuning session errors

use thiserror::Error;

/// Errors that can occur while staging, editing or exporting a tune
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("Invalid value for '{name}': {value} is not a finite number")]
    InvalidValue { name: String, value: f64 },

    #[error("Parameter index {index} out of range (store holds {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("Unknown parameter: '{0}'")]
    UnknownParameter(String),

    #[error("Duplicate parameter name: '{0}'")]
    DuplicateParameter(String),

    #[error("No ECU file loaded")]
    NoFileLoaded,

    #[error("An upload is already in progress")]
    UploadInProgress,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unknown stage profile: '{0}'")]
    UnknownStage(String),

    #[error("Unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Uploaded file '{0}' is empty")]
    EmptyPayload(String),

    #[error("Upload cancelled")]
    UploadCancelled,

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Corrupt export payload: {0}")]
    CorruptExport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, TuningError>;
