//! End-to-end view preparation: build, merge, flatten, filter.
//!
//! Merging always happens before accessor filtering. Filtering first would
//! change which records end up as siblings (or as root) and so change the
//! merge counts a view reports.

use super::builder::build_tree;
use super::filter::{filter_accessors, FilterStats};
use super::flatten::flatten;
use super::merge::merge_tree;
use super::metrics::count_nodes;
use super::node::{FlatRecord, Node};
use crate::parser::schema::Record;
use log::debug;
use serde::{Deserialize, Serialize};

/// Options a collaborator may set on a view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewConfig {
    /// Keep getter/setter records in the view
    pub include_accessors: bool,

    /// Collapse repeated sibling invocations
    pub merge_duplicates: bool,
}

impl ViewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accessors(mut self, include: bool) -> Self {
        self.include_accessors = include;
        self
    }

    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge_duplicates = merge;
        self
    }
}

/// Result of preparing one session for display
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub root: Option<Node>,
    pub filter_stats: FilterStats,
}

impl View {
    /// Flat, re-linked form of the view
    pub fn into_flat(self) -> Vec<FlatRecord> {
        self.root.map(|root| flatten(root, None)).unwrap_or_default()
    }
}

/// Run the full pipeline over one session's records
///
/// **Public** - main entry point for collaborators
pub fn prepare_view(records: Vec<Record>, config: &ViewConfig) -> View {
    let total = records.len();
    let accessors = records.iter().filter(|r| r.is_accessor()).count();

    let mut root = build_tree(records);

    if config.merge_duplicates {
        root = root.map(merge_tree);
    }

    if !config.include_accessors {
        root = root.and_then(|r| {
            let visible = filter_accessors(flatten(r, None), false);
            build_tree(visible)
        });
    }

    let showing = root.as_ref().map(count_nodes).unwrap_or(0);

    debug!(
        "Prepared view: {} of {} records visible (merge={}, accessors={})",
        showing, total, config.merge_duplicates, config.include_accessors
    );

    View {
        root,
        filter_stats: FilterStats {
            showing,
            total,
            accessors,
        },
    }
}

/// Hierarchical form of the view
pub fn prepare_tree(records: Vec<Record>, config: &ViewConfig) -> Option<Node> {
    prepare_view(records, config).root
}

/// Flat form of the view
pub fn prepare_flat(records: Vec<Record>, config: &ViewConfig) -> Vec<FlatRecord> {
    prepare_view(records, config).into_flat()
}

/// Build, merge and flatten without any filtering
pub fn merge_records(records: Vec<Record>) -> Vec<FlatRecord> {
    build_tree(records)
        .map(|root| flatten(merge_tree(root), None))
        .unwrap_or_default()
}
