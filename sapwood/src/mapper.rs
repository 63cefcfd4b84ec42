//! Node-space mapping facade.
//!
//! Wraps both trees in cambium's extended views, runs the top-down mapper
//! and translates the id-space result back into node handles. The result
//! tables are keyed by node identity; a `None` value means the node was
//! acknowledged as unmatched (inserted, deleted or replaced) rather than not
//! visited.

use cambium::indextree::NodeId;
use cambium::{ExtTree, MapError};
use rapidhash::RapidHashMap as HashMap;

use crate::node::{NodeKey, NodeRc};
use crate::{debug, trace};

/// A recorded insertion in node space.
#[derive(Clone)]
pub struct Insertion {
    /// The inserted node, from the right tree.
    pub node: NodeRc,
    /// The left-tree parent receiving the insertion.
    pub parent: NodeRc,
    /// The sibling the node lands after: a matched left-tree node, an
    /// earlier insertion from the right tree, or `None` at the head.
    pub after: Option<NodeRc>,
}

/// The classified delta between two trees.
pub struct MappingResult {
    ltr: HashMap<NodeKey, Option<NodeRc>>,
    rtl: HashMap<NodeKey, Option<NodeRc>>,
    inserted: Vec<Insertion>,
    replaced: Vec<(NodeRc, NodeRc)>,
    deleted: Vec<NodeRc>,
}

impl MappingResult {
    /// Left-to-right table over every node of the left tree.
    pub fn left_to_right(&self) -> &HashMap<NodeKey, Option<NodeRc>> {
        &self.ltr
    }

    /// Right-to-left table over every node of the right tree.
    pub fn right_to_left(&self) -> &HashMap<NodeKey, Option<NodeRc>> {
        &self.rtl
    }

    /// The right-tree counterpart of a matched left node.
    pub fn matched_right(&self, left: &NodeRc) -> Option<&NodeRc> {
        self.ltr.get(&NodeKey::new(left)).and_then(|v| v.as_ref())
    }

    /// The left-tree counterpart of a matched right node.
    pub fn matched_left(&self, right: &NodeRc) -> Option<&NodeRc> {
        self.rtl.get(&NodeKey::new(right)).and_then(|v| v.as_ref())
    }

    /// Insertions in sibling order.
    pub fn inserted(&self) -> &[Insertion] {
        &self.inserted
    }

    /// Replaced pairs (left node, right replacement) in document order.
    pub fn replaced(&self) -> &[(NodeRc, NodeRc)] {
        &self.replaced
    }

    /// Tops of deleted subtrees in document order.
    pub fn deleted(&self) -> &[NodeRc] {
        &self.deleted
    }
}

/// Maps the left tree onto the right tree and classifies the delta.
pub fn map(left: &NodeRc, right: &NodeRc) -> Result<MappingResult, MapError> {
    let left_view = ExtTree::build(left);
    let right_view = ExtTree::build(right);
    let mapping = cambium::map_trees(&left_view, &right_view)?;
    debug!(
        left_nodes = left_view.node_count(),
        right_nodes = right_view.node_count(),
        "translating mapping into node space"
    );

    let node_of_left = |id: NodeId| left_view.node(id).clone();
    let node_of_right = |id: NodeId| right_view.node(id).clone();

    let mut ltr = HashMap::default();
    for (&l, &r) in mapping.left_to_right() {
        ltr.insert(NodeKey::new(&node_of_left(l)), r.map(node_of_right));
    }
    let mut rtl = HashMap::default();
    for (&r, &l) in mapping.right_to_left() {
        rtl.insert(NodeKey::new(&node_of_right(r)), l.map(node_of_left));
    }

    let inserted = mapping
        .inserted()
        .iter()
        .map(|insertion| {
            // A matched anchor is reported as its left-tree counterpart so
            // it can be found among difference-tree prototypes; an anchor
            // that was itself inserted stays a right-tree node.
            let after = insertion.after.map(|anchor| {
                match mapping.matched_left(anchor) {
                    Some(left_anchor) => node_of_left(left_anchor),
                    None => node_of_right(anchor),
                }
            });
            trace!(anchored = after.is_some(), "insertion translated");
            Insertion {
                node: node_of_right(insertion.node),
                parent: node_of_left(insertion.parent),
                after,
            }
        })
        .collect();

    // Document order keeps the script deterministic.
    let mut replaced = Vec::new();
    let mut deleted = Vec::new();
    for id in left_view.root.descendants(&left_view.arena) {
        if let Some(&right_id) = mapping.replaced().get(&id) {
            replaced.push((node_of_left(id), node_of_right(right_id)));
        }
        if mapping.deleted().contains(&id) {
            deleted.push(node_of_left(id));
        }
    }

    Ok(MappingResult {
        ltr,
        rtl,
        inserted,
        replaced,
        deleted,
    })
}
