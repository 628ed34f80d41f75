//! Statistics over sessions, trees and flattened views.
//!
//! Slow calls are the invocations (or aggregates) with the largest total
//! duration. These are the first places to look when a request is slow.

use super::builder::root_candidates;
use super::node::{FlatRecord, Node};
use crate::parser::schema::{MethodType, Record};
use crate::utils::config::UNKNOWN_ENTRY_LABEL;
use log::debug;
use serde::{Deserialize, Serialize};

/// Number of nodes in the hierarchy rooted at `node`
pub fn count_nodes(node: &Node) -> usize {
    let mut count = 0;
    let mut pending = vec![node];

    while let Some(node) = pending.pop() {
        count += 1;
        pending.extend(&node.children);
    }

    count
}

/// Shape statistics of a (possibly merged) tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeStats {
    /// Visible nodes
    pub node_count: usize,

    /// Depth of the deepest node (root = 1)
    pub max_depth: usize,

    /// Nodes standing for more than one record
    pub merged_nodes: usize,

    /// Records represented, counting every absorbed id
    pub absorbed_records: usize,

    /// Nodes whose template record raised an error
    pub error_nodes: usize,

    pub root_duration: i64,
}

/// Calculate shape statistics for a tree
///
/// **Public** - included in view documents and summaries
pub fn calculate_tree_stats(root: &Node) -> TreeStats {
    let mut stats = TreeStats {
        root_duration: root.total_duration(),
        ..TreeStats::default()
    };

    // Explicit stack keeps deep traces off the call stack
    let mut pending: Vec<(&Node, usize)> = vec![(root, 1)];
    while let Some((node, depth)) = pending.pop() {
        stats.node_count += 1;
        stats.max_depth = stats.max_depth.max(depth);
        stats.absorbed_records += node.merge_count();
        if node.is_merged() {
            stats.merged_nodes += 1;
        }
        if node.record.has_error() {
            stats.error_nodes += 1;
        }

        pending.extend(node.children.iter().map(|child| (child, depth + 1)));
    }

    debug!(
        "Tree stats: {} nodes, depth {}, {} aggregates",
        stats.node_count, stats.max_depth, stats.merged_nodes
    );

    stats
}

/// One line of a session list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,

    /// `SimpleClassName.method` of the entry point
    pub entry_method: String,

    pub record_count: usize,
    pub accessor_count: usize,
    pub error_count: usize,

    /// Records with no resolvable parent; all but the first are dropped
    #[serde(default)]
    pub root_count: usize,
}

/// Summarize one session's raw records
pub fn summarize_session(session_id: &str, records: &[Record]) -> SessionSummary {
    let entry_method = records
        .iter()
        .find(|r| r.method_type == MethodType::EntryPoint)
        .map(Record::short_label)
        .unwrap_or_else(|| UNKNOWN_ENTRY_LABEL.to_string());

    SessionSummary {
        session_id: session_id.to_string(),
        entry_method,
        record_count: records.len(),
        accessor_count: records.iter().filter(|r| r.is_accessor()).count(),
        error_count: records.iter().filter(|r| r.has_error()).count(),
        root_count: root_candidates(records).len(),
    }
}

/// A slow invocation (or aggregate of invocations)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlowCall {
    pub id: String,

    /// `SimpleClassName.method`
    pub label: String,

    pub duration: i64,
    pub merged_count: usize,

    /// Share of the root's duration
    pub percentage: f64,
}

/// Rank flattened records by total duration
///
/// The first record of `flat` is taken as the root for percentages.
/// Ties keep input order.
pub fn calculate_slowest_calls(flat: &[FlatRecord], top_n: usize) -> Vec<SlowCall> {
    let root_duration = flat.first().map(|r| r.total_duration).unwrap_or(0);

    let mut ranked: Vec<&FlatRecord> = flat.iter().collect();
    ranked.sort_by(|a, b| b.total_duration.cmp(&a.total_duration));

    ranked
        .into_iter()
        .take(top_n)
        .map(|r| create_slow_call(r, root_duration))
        .collect()
}

fn create_slow_call(flat: &FlatRecord, root_duration: i64) -> SlowCall {
    let percentage = if root_duration > 0 {
        (flat.total_duration as f64 / root_duration as f64) * 100.0
    } else {
        0.0
    };

    SlowCall {
        id: flat.record.id.clone(),
        label: flat.record.short_label(),
        duration: flat.total_duration,
        merged_count: flat.merged_count,
        percentage,
    }
}
