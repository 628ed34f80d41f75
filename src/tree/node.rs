//! Working structures of the tree engine.

use crate::parser::schema::{Record, RecordId};
use serde::{Deserialize, Serialize};

/// A record placed in the call hierarchy
///
/// Every node is an aggregate of at least one record: a node that was
/// never merged absorbs only its own id. `record.duration` always holds
/// the total over absorbed records, so renderers can read it directly.
///
/// Traces of recursive code can be hundreds of thousands of levels deep,
/// so `Clone`, `PartialEq` and `Drop` walk the hierarchy with a heap stack.
/// On disk a hierarchy is stored in its flat, re-linked form.
#[derive(Debug)]
pub struct Node {
    pub record: Record,

    /// Identifiers of every record collapsed into this node, in encounter order
    pub merged_ids: Vec<RecordId>,

    pub children: Vec<Node>,
}

/// Grouping key for duplicate siblings: (class name, method name)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MergeKey {
    pub class_name: String,
    pub method_name: String,
}

impl Node {
    /// Leaf node wrapping a single record
    pub fn leaf(record: Record) -> Self {
        let merged_ids = vec![record.id.clone()];
        Self {
            record,
            merged_ids,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// Number of records this node stands for
    pub fn merge_count(&self) -> usize {
        self.merged_ids.len()
    }

    pub fn total_duration(&self) -> i64 {
        self.record.duration
    }

    pub fn is_merged(&self) -> bool {
        self.merge_count() > 1
    }

    pub fn merge_key(&self) -> MergeKey {
        MergeKey {
            class_name: self.record.class_name.clone(),
            method_name: self.record.method_name.clone(),
        }
    }

    /// Fold another node of the same group into this one
    ///
    /// Children are appended as-is; they are not re-grouped against the
    /// children already present.
    pub(crate) fn absorb(&mut self, mut other: Node) {
        self.record.duration = self.record.duration.saturating_add(other.record.duration);
        self.merged_ids.append(&mut other.merged_ids);
        self.children.append(&mut other.children);
    }

    /// Turn this node (without its children) into a flat record under `parent_id`
    pub(crate) fn into_flat(mut self, parent_id: Option<RecordId>) -> FlatRecord {
        let mut record = std::mem::take(&mut self.record);
        record.parent_id = parent_id;
        let merged_ids = std::mem::take(&mut self.merged_ids);

        FlatRecord {
            merged_count: merged_ids.len(),
            total_duration: record.duration,
            merged_ids,
            record,
        }
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        // Post-order: a node is copied once all of its children are
        let mut pending: Vec<(&Node, bool)> =
            self.children.iter().rev().map(|child| (child, false)).collect();
        let mut copied: Vec<Node> = Vec::with_capacity(self.children.len());

        while let Some((node, expanded)) = pending.pop() {
            if expanded {
                let children = copied.split_off(copied.len() - node.children.len());
                copied.push(Node {
                    record: node.record.clone(),
                    merged_ids: node.merged_ids.clone(),
                    children,
                });
            } else {
                pending.push((node, true));
                pending.extend(node.children.iter().rev().map(|child| (child, false)));
            }
        }

        Node {
            record: self.record.clone(),
            merged_ids: self.merged_ids.clone(),
            children: copied,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];

        while let Some((a, b)) = pending.pop() {
            if a.record != b.record
                || a.merged_ids != b.merged_ids
                || a.children.len() != b.children.len()
            {
                return false;
            }
            pending.extend(a.children.iter().zip(&b.children));
        }

        true
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl From<Record> for Node {
    fn from(record: Record) -> Self {
        Node::leaf(record)
    }
}

impl From<FlatRecord> for Node {
    fn from(flat: FlatRecord) -> Self {
        // Flat output of an older pass keeps its absorbed ids
        let FlatRecord {
            record, merged_ids, ..
        } = flat;

        let merged_ids = if merged_ids.is_empty() {
            vec![record.id.clone()]
        } else {
            merged_ids
        };

        Self {
            record,
            merged_ids,
            children: Vec::new(),
        }
    }
}

/// Flat, re-linked form of a node handed to renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRecord {
    #[serde(flatten)]
    pub record: Record,

    #[serde(default)]
    pub merged_ids: Vec<RecordId>,

    #[serde(default)]
    pub merged_count: usize,

    #[serde(default)]
    pub total_duration: i64,
}

impl FlatRecord {
    pub fn id(&self) -> &str {
        &self.record.id
    }
}

/// Anything the tree builder can place in a hierarchy
pub trait TreeItem: Into<Node> {
    fn item_id(&self) -> &str;
    fn item_parent_id(&self) -> Option<&str>;
}

impl TreeItem for Record {
    fn item_id(&self) -> &str {
        &self.id
    }

    fn item_parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }
}

impl TreeItem for FlatRecord {
    fn item_id(&self) -> &str {
        &self.record.id
    }

    fn item_parent_id(&self) -> Option<&str> {
        self.record.parent_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_absorbs_only_itself() {
        let node = Node::leaf(Record::new("1", None, "Foo", "bar", 5));
        assert_eq!(node.merged_ids, vec!["1".to_string()]);
        assert_eq!(node.merge_count(), 1);
        assert_eq!(node.total_duration(), 5);
        assert!(!node.is_merged());
    }

    #[test]
    fn test_absorb_accumulates() {
        let mut a = Node::leaf(Record::new("1", None, "Foo", "bar", 5));
        let b = Node::leaf(Record::new("2", None, "Foo", "bar", 7));
        a.absorb(b);

        assert_eq!(a.id(), "1");
        assert_eq!(a.merged_ids, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(a.total_duration(), 12);
    }

    #[test]
    fn test_absorb_saturates() {
        let mut a = Node::leaf(Record::new("1", None, "Foo", "bar", i64::MAX));
        a.absorb(Node::leaf(Record::new("2", None, "Foo", "bar", 1)));
        assert_eq!(a.total_duration(), i64::MAX);
    }

    fn chain(depth: usize) -> Node {
        let mut node = Node::leaf(Record::new(depth.to_string(), None, "Rec", "step", 1));
        for i in (0..depth).rev() {
            let mut parent = Node::leaf(Record::new(i.to_string(), None, "Rec", "step", 1));
            parent.children.push(node);
            node = parent;
        }
        node
    }

    #[test]
    fn test_deep_chain_clone_compare_drop() {
        let original = chain(200_000);
        let copy = original.clone();

        assert_eq!(copy.children[0].children[0].id(), "2");
        assert!(copy == original);

        let mut other = chain(200_000);
        other.children[0].children[0].record.duration = 5;
        assert!(other != original);
    }

    #[test]
    fn test_clone_keeps_sibling_order() {
        let mut root = Node::leaf(Record::new("r", None, "Root", "main", 0));
        let mut a = Node::leaf(Record::new("a", Some("r"), "A", "a", 1));
        a.children.push(Node::leaf(Record::new("a1", Some("a"), "A", "x", 1)));
        a.children.push(Node::leaf(Record::new("a2", Some("a"), "A", "y", 1)));
        root.children.push(a);
        root.children.push(Node::leaf(Record::new("b", Some("r"), "B", "b", 1)));

        let copy = root.clone();
        let ids: Vec<&str> = copy.children.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(copy.children[0].children[1].id(), "a2");
        assert_eq!(copy, root);
    }

    #[test]
    fn test_into_flat_relinks() {
        let mut node = Node::leaf(Record::new("1", Some("old"), "Foo", "bar", 5));
        node.absorb(Node::leaf(Record::new("2", None, "Foo", "bar", 3)));

        let flat = node.into_flat(Some("p".to_string()));
        assert_eq!(flat.record.parent_id.as_deref(), Some("p"));
        assert_eq!(flat.merged_count, 2);
        assert_eq!(flat.total_duration, 8);
    }

    #[test]
    fn test_flat_record_keeps_merged_ids() {
        let flat = FlatRecord {
            record: Record::new("1", None, "Foo", "bar", 9),
            merged_ids: vec!["1".to_string(), "4".to_string()],
            merged_count: 2,
            total_duration: 9,
        };

        let node = Node::from(flat);
        assert_eq!(node.merge_count(), 2);
    }

    #[test]
    fn test_flat_record_json_shape() {
        let flat = FlatRecord {
            record: Record::new("2", Some("1"), "A", "get", 7),
            merged_ids: vec!["2".to_string(), "3".to_string()],
            merged_count: 2,
            total_duration: 7,
        };

        let value = serde_json::to_value(&flat).unwrap();
        assert_eq!(value["id"], "2");
        assert_eq!(value["parentId"], "1");
        assert_eq!(value["mergedCount"], 2);
        assert_eq!(value["totalDuration"], 7);
        assert_eq!(value["mergedIds"][1], "3");

        let back: FlatRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, flat);
    }
}
