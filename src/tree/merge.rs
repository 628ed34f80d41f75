//! Collapse repeated sibling invocations into aggregate nodes.
//!
//! Siblings sharing a merge key (class name, method name) become one node.
//! The group's first member is the template: it keeps its own id and
//! fields, absorbs the ids and durations of the others, and gets their
//! children appended after its own.
//!
//! Children are merged before their parent's group is formed, so duplicate
//! detection runs independently under each parent. A method called twice
//! under A and twice under B yields one aggregate under each.
//!
//! Example:
//! ```text
//! root                      root
//! ├─ Repo.load (3)          ├─ Repo.load x2 (7)
//! ├─ Cache.get (1)    =>    └─ Cache.get (1)
//! └─ Repo.load (4)
//! ```

use super::node::{MergeKey, Node};
use log::debug;
use std::collections::HashMap;

/// Merge duplicates at every depth below (and including the children of) `node`
///
/// **Public** - main entry point for the merge engine
///
/// Walks the hierarchy with an explicit stack of open nodes. A node joins
/// its parent's sibling groups only after its own children are merged.
pub fn merge_tree(node: Node) -> Node {
    let mut open: Vec<OpenNode> = Vec::new();
    let mut current = OpenNode::new(node);

    loop {
        if let Some(child) = current.pending.next() {
            open.push(current);
            current = OpenNode::new(child);
            continue;
        }

        let finished = current.close();
        match open.pop() {
            Some(mut parent) => {
                parent.groups.add(finished);
                current = parent;
            }
            None => return finished,
        }
    }
}

/// Merge one list of siblings, merging below each sibling first
///
/// Output order follows the first occurrence of each merge key.
pub fn merge_siblings(siblings: Vec<Node>) -> Vec<Node> {
    let mut groups = SiblingGroups::with_capacity(siblings.len());

    for sibling in siblings {
        groups.add(merge_tree(sibling));
    }

    groups.finish()
}

/// A node whose children are still being merged
struct OpenNode {
    node: Node,
    pending: std::vec::IntoIter<Node>,
    groups: SiblingGroups,
}

impl OpenNode {
    fn new(mut node: Node) -> Self {
        let children = std::mem::take(&mut node.children);

        Self {
            groups: SiblingGroups::with_capacity(children.len()),
            pending: children.into_iter(),
            node,
        }
    }

    fn close(self) -> Node {
        let OpenNode {
            mut node, groups, ..
        } = self;

        node.children = groups.finish();
        node
    }
}

/// Already merged siblings grouped by merge key, first occurrence first
struct SiblingGroups {
    groups: Vec<Node>,
    positions: HashMap<MergeKey, usize>,
    input_len: usize,
}

impl SiblingGroups {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            groups: Vec::with_capacity(capacity),
            positions: HashMap::new(),
            input_len: 0,
        }
    }

    fn add(&mut self, sibling: Node) {
        self.input_len += 1;

        match self.positions.get(&sibling.merge_key()) {
            Some(&pos) => self.groups[pos].absorb(sibling),
            None => {
                self.positions.insert(sibling.merge_key(), self.groups.len());
                self.groups.push(sibling);
            }
        }
    }

    fn finish(self) -> Vec<Node> {
        if self.groups.len() < self.input_len {
            debug!(
                "Merged {} siblings into {} nodes",
                self.input_len,
                self.groups.len()
            );
        }

        self.groups
    }
}
