//! Canonical difference-tree construction from a mapping result.
//!
//! Replays the classified delta through the difference-tree mutators:
//! insertions first (in script order, so chains land correctly), then
//! replacements, then deletions. Edit targets are located by prototype
//! identity, which works because the difference tree mirrors the very nodes
//! the mapper saw.

use crate::diff_tree::{DiffNodeId, DiffTree, DiffTreeItem};
use crate::mapper::{Insertion, MappingResult};
use crate::node::{NodeRc, represents};
use crate::{debug, trace};

/// Builds a difference tree over a "before" tree by replaying an edit
/// script.
pub struct DiffTreeBuilder {
    tree: DiffTree,
}

impl DiffTreeBuilder {
    /// Mirrors the tree the mapping's left side was computed from.
    pub fn new(before: &NodeRc) -> Self {
        Self {
            tree: DiffTree::new(before.clone()),
        }
    }

    /// Replays the whole edit script. Returns `false` when any action could
    /// not be expressed — in particular a replacement of the root, which has
    /// no parent slot to carry the action.
    pub fn build(&mut self, mapping: &MappingResult) -> bool {
        let mut result = true;
        for insertion in mapping.inserted() {
            result &= self.insert(insertion);
        }
        for (before, after) in mapping.replaced() {
            result &= self.replace(before, after);
        }
        for deleted in mapping.deleted() {
            result &= self.delete(deleted);
        }
        debug!(complete = result, "edit script replayed");
        result
    }

    /// The finished difference tree.
    pub fn into_diff_tree(self) -> DiffTree {
        self.tree
    }

    fn insert(&mut self, insertion: &Insertion) -> bool {
        let Some(parent) = self.find_diff_node(&insertion.parent) else {
            trace!("insertion parent not found");
            return false;
        };
        self.tree
            .insert_node_after(parent, insertion.node.clone(), insertion.after.as_ref())
    }

    fn replace(&mut self, before: &NodeRc, after: &NodeRc) -> bool {
        let Some(target) = self.find_diff_node(before) else {
            return false;
        };
        let Some(parent) = self.tree.parent(target) else {
            // The root cannot be replaced through a child slot.
            return false;
        };
        self.tree.replace_node(parent, before, after.clone())
    }

    fn delete(&mut self, node: &NodeRc) -> bool {
        let Some(target) = self.find_diff_node(node) else {
            return false;
        };
        let Some(parent) = self.tree.parent(target) else {
            return false;
        };
        self.tree.delete_node(parent, node)
    }

    /// Depth-first search for the diff node mirroring `node`.
    fn find_diff_node(&self, node: &NodeRc) -> Option<DiffNodeId> {
        self.find_from(self.tree.root(), node)
    }

    fn find_from(&self, id: DiffNodeId, node: &NodeRc) -> Option<DiffNodeId> {
        if represents(self.tree.prototype(id), node) {
            return Some(id);
        }
        for index in 0..self.tree.child_count(id) {
            if let Some(DiffTreeItem::Node(child)) = self.tree.child(id, index) {
                if let Some(found) = self.find_from(*child, node) {
                    return Some(found);
                }
            }
        }
        None
    }
}
