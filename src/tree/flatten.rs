//! Serialize a hierarchy back into a flat, re-linked record list.

use super::node::{FlatRecord, Node};
use crate::parser::schema::RecordId;

/// Pre-order flattening with recomputed parent links
///
/// **Public** - produces the canonical form consumed by renderers
///
/// The node itself comes first with `parent_id` rewritten to `parent_id`,
/// followed by each child's subtree, every child pointing at this node's id.
/// Ids absorbed by a merge stay reachable through `merged_ids` only.
pub fn flatten(node: Node, parent_id: Option<RecordId>) -> Vec<FlatRecord> {
    let mut out = Vec::new();
    let mut pending = vec![(node, parent_id)];

    while let Some((mut node, parent_id)) = pending.pop() {
        let own_id = node.record.id.clone();

        // Reversed so the first child is emitted first
        let children = std::mem::take(&mut node.children);
        pending.extend(
            children
                .into_iter()
                .rev()
                .map(|child| (child, Some(own_id.clone()))),
        );

        out.push(node.into_flat(parent_id));
    }

    out
}

/// Flat, re-linked copy of a hierarchy that stays in place
///
/// Same order and links as `flatten(root.clone(), None)`.
pub fn linked_records(root: &Node) -> Vec<FlatRecord> {
    let mut out = Vec::new();
    let mut pending: Vec<(&Node, Option<&str>)> = vec![(root, None)];

    while let Some((node, parent_id)) = pending.pop() {
        pending.extend(
            node.children
                .iter()
                .rev()
                .map(|child| (child, Some(node.id()))),
        );

        let mut record = node.record.clone();
        record.parent_id = parent_id.map(str::to_string);

        out.push(FlatRecord {
            merged_ids: node.merged_ids.clone(),
            merged_count: node.merge_count(),
            total_duration: record.duration,
            record,
        });
    }

    out
}
