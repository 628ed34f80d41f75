//! View document written to disk.
//!
//! Schema is versioned to allow future evolution.

use crate::tree::{
    build_tree, calculate_slowest_calls, calculate_tree_stats, linked_records, FilterStats,
    FlatRecord, Node, SessionSummary, SlowCall, TreeStats, View, ViewConfig,
};
use crate::utils::config::SCHEMA_VERSION;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Shape of the prepared view in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// `tree` for hierarchical renderers, restored as a `Node` on read
    #[default]
    Tree,

    /// Re-linked `records` list, suitable for re-feeding the tree builder
    Flat,
}

/// Top-level view document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDocument {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the view was generated
    pub generated_at: String,

    pub config: ViewConfig,
    pub summary: SessionSummary,
    pub filter_stats: FilterStats,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<TreeStats>,

    #[serde(default)]
    pub slowest_calls: Vec<SlowCall>,

    /// Stored as re-linked records so depth never limits reading it back
    #[serde(default, skip_serializing_if = "Option::is_none", with = "linked_tree")]
    pub tree: Option<Node>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<FlatRecord>>,
}

/// Assemble a document from a prepared view
///
/// **Public** - used by the view command
pub fn to_document(
    summary: SessionSummary,
    view: View,
    config: ViewConfig,
    layout: Layout,
    top_calls: usize,
) -> ViewDocument {
    let stats = view.root.as_ref().map(calculate_tree_stats);
    let filter_stats = view.filter_stats;

    let flat: Vec<FlatRecord> = view.root.as_ref().map(linked_records).unwrap_or_default();
    let slowest_calls = calculate_slowest_calls(&flat, top_calls);

    let (tree, records) = match layout {
        Layout::Tree => (view.root, None),
        Layout::Flat => (None, Some(flat)),
    };

    ViewDocument {
        version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        config,
        summary,
        filter_stats,
        stats,
        slowest_calls,
        tree,
        records,
    }
}

/// Serde adapter writing a hierarchy as its flat, re-linked records
mod linked_tree {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(tree: &Option<Node>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        tree.as_ref().map(linked_records).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Node>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let records: Option<Vec<FlatRecord>> = Option::deserialize(deserializer)?;
        Ok(records.and_then(build_tree))
    }
}
