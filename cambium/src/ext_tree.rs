//! Extended node view over a source tree.
//!
//! An [`ExtTree`] decorates an immutable source tree with the links and
//! caches the mapper needs: parent and sibling pointers, the index among
//! siblings, and both hashes, all computed once in a single post-order pass.
//! The view is built per mapping run and discarded afterwards; it holds
//! handles into the caller's tree and must not outlive it.

use indextree::{Arena, NodeId};

use crate::hash::{NodeHash, combine_hashes, local_hash};
use crate::source::SourceNode;

/// Per-node payload of the extended view.
pub struct ExtNodeData<N> {
    node: N,
    local_hash: NodeHash,
    absolute_hash: NodeHash,
    index: usize,
}

impl<N> ExtNodeData<N> {
    /// The wrapped source node handle.
    pub fn node(&self) -> &N {
        &self.node
    }

    /// Hash of the node's type name and data.
    pub fn local_hash(&self) -> NodeHash {
        self.local_hash
    }

    /// Hash of the whole subtree rooted here.
    pub fn absolute_hash(&self) -> NodeHash {
        self.absolute_hash
    }

    /// Zero-based index among siblings; 0 for the root.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Arena-backed extended view of one source tree.
pub struct ExtTree<N: SourceNode> {
    /// Backing arena; exposed for iteration the way the ids are.
    pub arena: Arena<ExtNodeData<N>>,
    /// Root of the view; its parent is always `None`.
    pub root: NodeId,
}

impl<N: SourceNode> ExtTree<N> {
    /// Builds the view bottom-up from a source tree root.
    pub fn build(root: &N) -> Self {
        let mut arena = Arena::new();
        let root_id = build_node(&mut arena, root, 0);
        Self {
            arena,
            root: root_id,
        }
    }

    /// Payload of a node in the view.
    pub fn get(&self, id: NodeId) -> &ExtNodeData<N> {
        self.arena[id].get()
    }

    /// The wrapped source node handle.
    pub fn node(&self, id: NodeId) -> &N {
        self.get(id).node()
    }

    /// Cached local hash.
    pub fn local_hash(&self, id: NodeId) -> NodeHash {
        self.get(id).local_hash
    }

    /// Cached absolute hash.
    pub fn absolute_hash(&self, id: NodeId) -> NodeHash {
        self.get(id).absolute_hash
    }

    /// Parent link; `None` at the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    /// Sibling to the left; `None` at the first child and at the root.
    pub fn left_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].previous_sibling()
    }

    /// Sibling to the right; `None` at the last child and at the root.
    pub fn right_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].next_sibling()
    }

    /// Zero-based index among siblings.
    pub fn index(&self, id: NodeId) -> usize {
        self.get(id).index
    }

    /// Children in order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// Children collected into a vector, for indexed access.
    pub fn child_vec(&self, id: NodeId) -> Vec<NodeId> {
        id.children(&self.arena).collect()
    }

    /// Number of children.
    pub fn child_count(&self, id: NodeId) -> usize {
        id.children(&self.arena).count()
    }

    /// Total number of nodes in the view.
    pub fn node_count(&self) -> usize {
        self.arena.count()
    }
}

fn build_node<N: SourceNode>(
    arena: &mut Arena<ExtNodeData<N>>,
    node: &N,
    index: usize,
) -> NodeId {
    let count = node.child_count();
    let mut child_ids = Vec::with_capacity(count);
    let mut child_hashes = Vec::with_capacity(count);
    for child_index in 0..count {
        let child = node.child(child_index);
        let child_id = build_node(arena, &child, child_index);
        child_hashes.push(arena[child_id].get().absolute_hash);
        child_ids.push(child_id);
    }
    let local = local_hash(node.type_name(), node.data());
    let absolute = combine_hashes(local, &child_hashes);
    let id = arena.new_node(ExtNodeData {
        node: node.clone(),
        local_hash: local,
        absolute_hash: absolute,
        index,
    });
    for child_id in child_ids {
        id.append(child_id, arena);
    }
    id
}
