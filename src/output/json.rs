//! JSON view output writer.
//!
//! Writes ViewDocument structs to JSON files with proper formatting.

use super::document::ViewDocument;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Write a view document to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_view(document: &ViewDocument, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing view to: {}", output_path.display());

    validate_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, document).map_err(OutputError::SerializationFailed)?;

    info!(
        "View written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Read a view document from a JSON file
///
/// **Public** - useful for validation and testing
///
/// # Errors
/// * `OutputError::ReadFailed` - File missing or unreadable
/// * `OutputError::InvalidDocument` - Contents are not a view document
pub fn read_view(input_path: impl AsRef<Path>) -> Result<ViewDocument, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading view from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::ReadFailed)?;
    let document: ViewDocument =
        serde_json::from_reader(BufReader::new(file)).map_err(OutputError::InvalidDocument)?;

    debug!(
        "View loaded: version {}, session {}",
        document.version, document.summary.session_id
    );

    Ok(document)
}

/// Validate that output path is writable
///
/// **Public** - also used by commands before doing any work
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
