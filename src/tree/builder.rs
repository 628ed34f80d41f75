//! Rebuild the call hierarchy from a flat record list.
//!
//! Each record names its parent by id. Records whose parent is absent or
//! unknown are root candidates; the first candidate in input order becomes
//! the root and all other candidates are dropped. Records caught in a
//! parent cycle have a resolvable parent, so they are never candidates and
//! are unreachable from any root.

use super::node::{Node, TreeItem};
use log::debug;
use std::collections::HashMap;

/// Build the hierarchy rooted at the first root candidate
///
/// **Public** - main entry point for tree building
///
/// # Returns
/// `None` for empty input or when every record has a resolvable parent
pub fn build_tree<T: TreeItem>(items: Vec<T>) -> Option<Node> {
    let forest = build_forest(items);

    if forest.len() > 1 {
        debug!(
            "Dropping {} extra root candidates, keeping {}",
            forest.len() - 1,
            forest[0].id()
        );
    }

    forest.into_iter().next()
}

/// Build one hierarchy per root candidate, in input order
pub fn build_forest<T: TreeItem>(items: Vec<T>) -> Vec<Node> {
    let links = ParentLinks::resolve(&items);

    let mut slots: Vec<Option<Node>> = items.into_iter().map(|item| Some(item.into())).collect();

    links
        .roots
        .iter()
        .filter_map(|&root| attach(root, &mut slots, &links.children))
        .collect()
}

/// Identifiers of every root candidate, in input order
///
/// Lets callers see which candidates `build_tree` will drop.
pub fn root_candidates<T: TreeItem>(items: &[T]) -> Vec<&str> {
    let links = ParentLinks::resolve(items);
    links.roots.iter().map(|&idx| items[idx].item_id()).collect()
}

/// Index-based parent/child links for one input list
struct ParentLinks {
    /// children[i] = indices of records whose parent is record i, input order
    children: Vec<Vec<usize>>,

    /// Indices of root candidates, input order
    roots: Vec<usize>,
}

impl ParentLinks {
    fn resolve<T: TreeItem>(items: &[T]) -> Self {
        // First occurrence wins if an id is duplicated
        let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            by_id.entry(item.item_id()).or_insert(idx);
        }

        let mut children = vec![Vec::new(); items.len()];
        let mut roots = Vec::new();

        for (idx, item) in items.iter().enumerate() {
            match item.item_parent_id().and_then(|pid| by_id.get(pid)) {
                Some(&parent) => children[parent].push(idx),
                None => roots.push(idx),
            }
        }

        Self { children, roots }
    }
}

/// Move the node at `root` and its descendants out of `slots`
///
/// Depth-first with an explicit stack: a node is attached to its parent
/// once all of its own children are in place.
fn attach(root: usize, slots: &mut [Option<Node>], children: &[Vec<usize>]) -> Option<Node> {
    let node = slots[root].take()?;

    let mut open: Vec<(Node, std::slice::Iter<'_, usize>)> = Vec::new();
    let mut current = (node, children[root].iter());

    loop {
        match current.1.next() {
            Some(&child) => {
                if let Some(node) = slots[child].take() {
                    open.push(current);
                    current = (node, children[child].iter());
                }
            }
            None => {
                let (node, _) = current;
                match open.pop() {
                    Some((mut parent, rest)) => {
                        parent.children.push(node);
                        current = (parent, rest);
                    }
                    None => return Some(node),
                }
            }
        }
    }
}
