//! Error types for the review-trends library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the pipeline.

use thiserror::Error;

/// Errors that can occur while running the review pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// No usable product-name or rating column in the source dataset.
    /// Fatal to the whole pipeline run.
    #[error("Schema error: {0}")]
    Schema(String),

    /// No local dataset file present and no fetch mechanism configured.
    #[error("Dataset unavailable: {0}")]
    SourceUnavailable(String),

    /// Ad hoc single-item prediction failed. Local to that call only;
    /// does not invalidate the trained model or the batch result.
    #[error("Inference error: {0}")]
    Inference(String),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Binary serialization errors
    #[error("Binary serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Cache errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with PipelineError
pub type Result<T> = std::result::Result<T, PipelineError>;

impl From<anyhow::Error> for PipelineError {
    fn from(err: anyhow::Error) -> Self {
        PipelineError::Other(err.to_string())
    }
}

impl From<sled::Error> for PipelineError {
    fn from(err: sled::Error) -> Self {
        PipelineError::Cache(err.to_string())
    }
}
