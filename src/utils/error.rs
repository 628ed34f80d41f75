//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! The tree engine itself never fails; only ingestion and file output do.

use thiserror::Error;

/// Errors that can occur while ingesting a trace dump
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid trace format: {0}")]
    InvalidFormat(String),

    #[error("Failed to read trace file: {0}")]
    ReadFailed(#[from] std::io::Error),
}

/// Errors that can occur while writing or reading back view documents
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Invalid view document: {0}")]
    InvalidDocument(#[source] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
