//! Top-down mapping of two extended tree views.
//!
//! Compares root nodes first and then children in depth, producing the
//! mapping tables and an ordered edit script. Matching is purely structural,
//! by hash equality; see the crate docs for the descent rules.

use indextree::NodeId;
use rapidhash::{RapidHashMap as HashMap, RapidHashSet as HashSet};
use thiserror::Error;

use crate::ext_tree::ExtTree;
use crate::pair_finder::{PairKey, find_longest_run};
use crate::section::{Section, Unprocessed};
use crate::source::SourceNode;
use crate::{debug, trace};

/// A recorded insertion: `node` (right tree) appears under `parent` (left
/// tree), positioned after `after` (right tree), or at the head when `after`
/// is `None`.
#[derive(Debug, Clone, Copy)]
pub struct Insertion {
    /// The inserted node, in the right tree.
    pub node: NodeId,
    /// The parent receiving the insertion, in the left tree.
    pub parent: NodeId,
    /// The sibling the node lands after: either a matched right-tree node or
    /// a previously inserted one. `None` inserts at the head.
    pub after: Option<NodeId>,
}

/// The outcome of a mapping run.
///
/// Every node of the left tree is keyed exactly once in the left-to-right
/// table, every node of the right tree exactly once in the right-to-left
/// table; a `None` value means the node is acknowledged as unmatched rather
/// than not yet visited. Matched pairs form a bijection.
#[derive(Debug, Default)]
pub struct Mapping {
    ltr: HashMap<NodeId, Option<NodeId>>,
    rtl: HashMap<NodeId, Option<NodeId>>,
    inserted: Vec<Insertion>,
    replaced: HashMap<NodeId, NodeId>,
    deleted: HashSet<NodeId>,
}

impl Mapping {
    /// Left-to-right table over every left-tree node.
    pub fn left_to_right(&self) -> &HashMap<NodeId, Option<NodeId>> {
        &self.ltr
    }

    /// Right-to-left table over every right-tree node.
    pub fn right_to_left(&self) -> &HashMap<NodeId, Option<NodeId>> {
        &self.rtl
    }

    /// The right-tree counterpart of a matched left node.
    pub fn matched_right(&self, left: NodeId) -> Option<NodeId> {
        self.ltr.get(&left).copied().flatten()
    }

    /// The left-tree counterpart of a matched right node.
    pub fn matched_left(&self, right: NodeId) -> Option<NodeId> {
        self.rtl.get(&right).copied().flatten()
    }

    /// Recorded insertions, in sibling order.
    pub fn inserted(&self) -> &[Insertion] {
        &self.inserted
    }

    /// Replaced nodes: left-tree node to its right-tree replacement.
    pub fn replaced(&self) -> &HashMap<NodeId, NodeId> {
        &self.replaced
    }

    /// Tops of deleted left-tree subtrees.
    pub fn deleted(&self) -> &HashSet<NodeId> {
        &self.deleted
    }
}

/// The mapper stalled: a pair of sibling sections under parents with equal
/// local hashes contained no equal subtrees at all. Unreachable while the
/// cached hashes are consistent with the trees; hitting it means the hash
/// invariants were broken.
#[derive(Debug, Error)]
#[error(
    "sibling sections stalled under matching parents \
     ({left_pending} left and {right_pending} right nodes share no equal subtree); \
     the cached hashes are inconsistent"
)]
pub struct MapError {
    /// Left-tree nodes still pending in the stalled section.
    pub left_pending: usize,
    /// Right-tree nodes still pending in the stalled section.
    pub right_pending: usize,
}

/// Maps the left tree onto the right tree.
pub fn map_trees<N: SourceNode>(
    left: &ExtTree<N>,
    right: &ExtTree<N>,
) -> Result<Mapping, MapError> {
    debug!(
        left_nodes = left.node_count(),
        right_nodes = right.node_count(),
        "mapping start"
    );
    let mut mapper = Mapper {
        left,
        right,
        mapping: Mapping::default(),
    };
    mapper.execute()?;
    debug!(
        inserted = mapper.mapping.inserted.len(),
        deleted = mapper.mapping.deleted.len(),
        replaced = mapper.mapping.replaced.len(),
        "mapping done"
    );
    Ok(mapper.mapping)
}

struct Mapper<'a, N: SourceNode> {
    left: &'a ExtTree<N>,
    right: &'a ExtTree<N>,
    mapping: Mapping,
}

impl<N: SourceNode> Mapper<'_, N> {
    fn execute(&mut self) -> Result<(), MapError> {
        let left_root = self.left.root;
        let right_root = self.right.root;
        if !self.map_subtrees(left_root, right_root)? {
            self.mapping.replaced.insert(left_root, right_root);
            self.skip_left_subtree(left_root);
            self.skip_right_subtree(right_root);
        }
        Ok(())
    }

    /// Maps two subtrees; `false` means the roots cannot be paired at all.
    fn map_subtrees(&mut self, left: NodeId, right: NodeId) -> Result<bool, MapError> {
        if self.left.absolute_hash(left) == self.right.absolute_hash(right) {
            self.map_identical(left, right);
            Ok(true)
        } else if self.left.local_hash(left) == self.right.local_hash(right) {
            self.map_by_section(left, right)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Maps two subtrees with equal absolute hashes; the child counts agree
    /// by construction, so the pairing is positional all the way down.
    fn map_identical(&mut self, left: NodeId, right: NodeId) {
        self.mapping.ltr.insert(left, Some(right));
        self.mapping.rtl.insert(right, Some(left));
        let left_children = self.left.child_vec(left);
        let right_children = self.right.child_vec(right);
        for (left_child, right_child) in left_children.into_iter().zip(right_children) {
            self.map_identical(left_child, right_child);
        }
    }

    /// Maps two subtrees that agree locally, resolving their children
    /// section by section.
    fn map_by_section(&mut self, left: NodeId, right: NodeId) -> Result<(), MapError> {
        self.mapping.ltr.insert(left, Some(right));
        self.mapping.rtl.insert(right, Some(left));

        let mut unprocessed = Unprocessed::new(self.left, left, self.right, right);
        while let Some(section) = unprocessed.pop_first() {
            if section.left().is_empty() {
                self.insert_all(left, &section);
            } else if section.right().is_empty() {
                self.delete_all(&section);
            } else {
                let run =
                    find_longest_run(self.left, self.right, &section, PairKey::AbsoluteHash);
                if run.is_empty() {
                    return Err(MapError {
                        left_pending: section.left().len(),
                        right_pending: section.right().len(),
                    });
                }
                trace!(
                    count = run.count,
                    left_offset = run.left_offset,
                    right_offset = run.right_offset,
                    "section run matched"
                );
                for index in 0..run.count {
                    self.map_identical(
                        section.left()[run.left_offset + index],
                        section.right()[run.right_offset + index],
                    );
                }
                let (leading, trailing) =
                    section.split_around(run.left_offset, run.right_offset, run.count);
                unprocessed.restore(leading, trailing);
            }
        }
        Ok(())
    }

    /// Marks every right node of a left-empty section as inserted under the
    /// left parent. The first node anchors on its left sibling in the right
    /// tree (already matched, or absent at the head); the rest chain on the
    /// previously inserted node.
    fn insert_all(&mut self, parent: NodeId, section: &Section) {
        let mut after = self.right.left_sibling(section.right()[0]);
        for &node in section.right() {
            trace!(node = usize::from(node), "insert");
            self.mapping.inserted.push(Insertion {
                node,
                parent,
                after,
            });
            self.skip_right_subtree(node);
            after = Some(node);
        }
    }

    /// Marks every left node of a right-empty section as deleted.
    fn delete_all(&mut self, section: &Section) {
        for &node in section.left() {
            trace!(node = usize::from(node), "delete");
            self.mapping.deleted.insert(node);
            self.skip_left_subtree(node);
        }
    }

    /// Acknowledges a whole left subtree as unmatched.
    fn skip_left_subtree(&mut self, node: NodeId) {
        self.mapping.ltr.insert(node, None);
        for child in self.left.child_vec(node) {
            self.skip_left_subtree(child);
        }
    }

    /// Acknowledges a whole right subtree as unmatched.
    fn skip_right_subtree(&mut self, node: NodeId) {
        self.mapping.rtl.insert(node, None);
        for child in self.right.child_vec(node) {
            self.skip_right_subtree(child);
        }
    }
}
