//! Call-tree reconstruction and duplicate merging.
//!
//! This module transforms a flat list of records into:
//! - A rooted call hierarchy (`builder`)
//! - The same hierarchy with repeated siblings collapsed (`merge`)
//! - A flat, re-linked list for renderers (`flatten`)
//! - Accessor-filtered views (`filter`, `pipeline`)
//! - Tree and session statistics (`metrics`)
//!
//! All functions take ownership of their input and hold no state between calls.

pub mod builder;
pub mod filter;
pub mod flatten;
pub mod merge;
pub mod metrics;
pub mod node;
pub mod pipeline;

// Re-export main types and functions
pub use builder::{build_forest, build_tree, root_candidates};
pub use filter::{filter_accessors, FilterStats};
pub use flatten::{flatten, linked_records};
pub use merge::{merge_siblings, merge_tree};
pub use metrics::{
    calculate_slowest_calls, calculate_tree_stats, count_nodes, summarize_session,
    SessionSummary, SlowCall, TreeStats,
};
pub use node::{FlatRecord, MergeKey, Node, TreeItem};
pub use pipeline::{merge_records, prepare_flat, prepare_tree, prepare_view, View, ViewConfig};
