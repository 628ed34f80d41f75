//! Trace ingestion and record schema.
//!
//! This module handles:
//! - Defining the record schema (camelCase wire format)
//! - Parsing raw JSON trace dumps
//! - Splitting multi-session dumps

pub mod schema;
pub mod session;
pub mod trace;

// Re-export main types
pub use schema::{ErrorInfo, MethodType, Record, RecordId};
pub use session::{split_sessions, Session};
pub use trace::{parse_records, read_records};
