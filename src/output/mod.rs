//! Output writers for view data.
//!
//! This module handles:
//! - The versioned view document schema
//! - JSON documents on disk
//! - Text renderings for the terminal

pub mod document;
pub mod json;
pub mod text;

// Re-export main functions
pub use document::{to_document, Layout, ViewDocument};
pub use json::{read_view, validate_path, write_view};
pub use text::{render_slowest_calls, render_tree};
