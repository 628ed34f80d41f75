//! TraceFlow
//!
//! Reconstructs the call hierarchy encoded in a flat list of captured
//! method invocations, optionally collapses repeated sibling calls into
//! aggregate nodes, and re-flattens the result for renderers.
//!
//! ## Getting Started
//!
//! ```ignore
//! use traceflow::parser::read_records;
//! use traceflow::tree::{prepare_tree, ViewConfig};
//!
//! let records = read_records("trace.json")?;
//! let root = prepare_tree(records, &ViewConfig::new().with_merge(true));
//! ```
//!
//! The `traceflow` CLI wraps the same pipeline:
//!
//! ```bash
//! traceflow view --input trace.json --merge --summary
//! ```

pub mod commands;
pub mod output;
pub mod parser;
pub mod tree;
pub mod utils;
