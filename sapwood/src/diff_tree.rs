//! Difference trees.
//!
//! A [`DiffTree`] mirrors an original tree node for node, with every child
//! slot holding a [`DiffTreeItem`]: either the recursively mirrored child
//! (the common case) or an edit action. The annotated structure projects two
//! consistent images — [`get_before`](DiffTree::get_before) reconstructs the
//! original tree, [`get_after`](DiffTree::get_after) the edited one — by
//! rebuilding nodes through their types' builders.
//!
//! Diff nodes live in a per-tree arena and are addressed by integer
//! handles; parent links are plain back-indices, a relation without any
//! ownership claim.

use crate::node::{DummyNode, Fragment, NodeRc, Properties, represents, same_node};
use crate::trace;

/// Handle of a diff node inside its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffNodeId(usize);

/// One child slot of a diff node.
pub enum DiffTreeItem {
    /// The recursively mirrored original child.
    Node(DiffNodeId),
    /// An inserted node; contributes to the *after* image only.
    Insert(NodeRc),
    /// A deleted original child; contributes to the *before* image only.
    Delete(NodeRc),
    /// An original child (first) replaced by a new node (second).
    Replace(NodeRc, NodeRc),
}

struct DiffNodeData {
    parent: Option<DiffNodeId>,
    prototype: NodeRc,
    children: Vec<DiffTreeItem>,
}

/// A tree mirror annotated with edit actions.
pub struct DiffTree {
    nodes: Vec<DiffNodeData>,
    root: DiffNodeId,
}

#[derive(Clone, Copy)]
enum Image {
    Before,
    After,
}

impl DiffTree {
    /// Mirrors a whole prototype tree; every slot starts as an unchanged
    /// [`DiffTreeItem::Node`].
    pub fn new(prototype: NodeRc) -> Self {
        let mut nodes = Vec::new();
        let root = wrap(&mut nodes, None, prototype);
        Self { nodes, root }
    }

    /// The root diff node.
    pub fn root(&self) -> DiffNodeId {
        self.root
    }

    /// The original node a diff node mirrors.
    pub fn prototype(&self, id: DiffNodeId) -> &NodeRc {
        &self.nodes[id.0].prototype
    }

    /// Parent relation; `None` at the root.
    pub fn parent(&self, id: DiffNodeId) -> Option<DiffNodeId> {
        self.nodes[id.0].parent
    }

    /// The prototype's type name.
    pub fn name(&self, id: DiffNodeId) -> &str {
        self.nodes[id.0].prototype.type_name()
    }

    /// The prototype's data payload.
    pub fn data(&self, id: DiffNodeId) -> &str {
        self.nodes[id.0].prototype.data()
    }

    /// The prototype's fragment.
    pub fn fragment(&self, id: DiffNodeId) -> Fragment {
        self.nodes[id.0].prototype.fragment()
    }

    /// The prototype's properties.
    pub fn properties(&self, id: DiffNodeId) -> Properties {
        self.nodes[id.0].prototype.properties()
    }

    /// Number of child slots.
    pub fn child_count(&self, id: DiffNodeId) -> usize {
        self.nodes[id.0].children.len()
    }

    /// Child slot by index.
    pub fn child(&self, id: DiffNodeId, index: usize) -> Option<&DiffTreeItem> {
        self.nodes[id.0].children.get(index)
    }

    /// Records the insertion of `node` under the diff node `id`.
    ///
    /// With no anchor the node is prepended. Otherwise the scan looks for
    /// the first slot whose mirrored prototype is the anchor, or whose
    /// inserted node is the anchor — the latter is what lets consecutive
    /// insertions chain — and places the new slot right after it. Returns
    /// `false` when no slot matches; nothing changes.
    pub fn insert_node_after(
        &mut self,
        id: DiffNodeId,
        node: NodeRc,
        after: Option<&NodeRc>,
    ) -> bool {
        let Some(anchor) = after else {
            self.nodes[id.0].children.insert(0, DiffTreeItem::Insert(node));
            return true;
        };
        let position = self.nodes[id.0].children.iter().position(|item| match item {
            DiffTreeItem::Node(child) => same_node(&self.nodes[child.0].prototype, anchor),
            DiffTreeItem::Insert(inserted) => same_node(inserted, anchor),
            _ => false,
        });
        let Some(position) = position else {
            return false;
        };
        self.nodes[id.0]
            .children
            .insert(position + 1, DiffTreeItem::Insert(node));
        true
    }

    /// Replaces the child slot at `index`, which must currently be an
    /// unchanged mirror, by `Replace(prototype, replacement)`.
    pub fn replace_node_at(
        &mut self,
        id: DiffNodeId,
        index: usize,
        replacement: NodeRc,
    ) -> bool {
        let Some(DiffTreeItem::Node(child)) = self.nodes[id.0].children.get(index) else {
            return false;
        };
        let prototype = self.nodes[child.0].prototype.clone();
        self.nodes[id.0].children[index] = DiffTreeItem::Replace(prototype, replacement);
        true
    }

    /// Replaces the child whose prototype chain reaches `node`.
    pub fn replace_node(&mut self, id: DiffNodeId, node: &NodeRc, replacement: NodeRc) -> bool {
        match self.find_child_index(id, node) {
            Some(index) => self.replace_node_at(id, index, replacement),
            None => false,
        }
    }

    /// Deletes the child slot at `index`, which must currently be an
    /// unchanged mirror.
    pub fn delete_node_at(&mut self, id: DiffNodeId, index: usize) -> bool {
        let Some(DiffTreeItem::Node(child)) = self.nodes[id.0].children.get(index) else {
            return false;
        };
        let prototype = self.nodes[child.0].prototype.clone();
        self.nodes[id.0].children[index] = DiffTreeItem::Delete(prototype);
        true
    }

    /// Deletes the child whose prototype chain reaches `node`.
    pub fn delete_node(&mut self, id: DiffNodeId, node: &NodeRc) -> bool {
        match self.find_child_index(id, node) {
            Some(index) => self.delete_node_at(id, index),
            None => false,
        }
    }

    /// The image of the whole tree before the recorded edits.
    pub fn get_before(&self) -> NodeRc {
        self.before(self.root)
    }

    /// The image of the whole tree after the recorded edits.
    pub fn get_after(&self) -> NodeRc {
        self.after(self.root)
    }

    /// The before image of one diff node.
    pub fn before(&self, id: DiffNodeId) -> NodeRc {
        self.project(id, Image::Before)
    }

    /// The after image of one diff node.
    pub fn after(&self, id: DiffNodeId) -> NodeRc {
        self.project(id, Image::After)
    }

    /// Index of the child slot whose mirrored prototype is `node`, chasing
    /// prototype chains; already deleted or replaced slots don't count.
    fn find_child_index(&self, id: DiffNodeId, node: &NodeRc) -> Option<usize> {
        self.nodes[id.0].children.iter().position(|item| {
            if let DiffTreeItem::Node(child) = item {
                represents(&self.nodes[child.0].prototype, node)
            } else {
                false
            }
        })
    }

    /// Rebuilds one image through the prototype's builder; any rejection
    /// along the pipeline degrades to the dummy node so a partial tree is
    /// never emitted.
    fn project(&self, id: DiffNodeId, image: Image) -> NodeRc {
        let data = &self.nodes[id.0];
        let mut builder = data.prototype.node_type().create_builder();
        builder.set_fragment(data.prototype.fragment());
        if !builder.set_data(data.prototype.data()) {
            trace!(name = data.prototype.type_name(), "projection: data rejected");
            return DummyNode::rc();
        }
        let mut children = Vec::with_capacity(data.children.len());
        for item in &data.children {
            let selected = match (item, image) {
                (DiffTreeItem::Node(child), _) => Some(self.project(*child, image)),
                (DiffTreeItem::Insert(node), Image::After) => Some(node.clone()),
                (DiffTreeItem::Insert(_), Image::Before) => None,
                (DiffTreeItem::Delete(node), Image::Before) => Some(node.clone()),
                (DiffTreeItem::Delete(_), Image::After) => None,
                (DiffTreeItem::Replace(before, _), Image::Before) => Some(before.clone()),
                (DiffTreeItem::Replace(_, after), Image::After) => Some(after.clone()),
            };
            if let Some(node) = selected {
                children.push(node);
            }
        }
        if !builder.set_children(children) {
            trace!(
                name = data.prototype.type_name(),
                "projection: children rejected"
            );
            return DummyNode::rc();
        }
        if !builder.is_valid() {
            return DummyNode::rc();
        }
        builder.create()
    }
}

fn wrap(
    nodes: &mut Vec<DiffNodeData>,
    parent: Option<DiffNodeId>,
    prototype: NodeRc,
) -> DiffNodeId {
    let id = DiffNodeId(nodes.len());
    nodes.push(DiffNodeData {
        parent,
        prototype: prototype.clone(),
        children: Vec::new(),
    });
    let count = prototype.child_count();
    let mut children = Vec::with_capacity(count);
    for index in 0..count {
        if let Some(child) = prototype.child(index) {
            children.push(DiffTreeItem::Node(wrap(nodes, Some(id), child)));
        }
    }
    nodes[id.0].children = children;
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::DraftNode;
    use crate::node::deep_compare;

    fn tree(text: &str) -> NodeRc {
        DraftNode::parse(text).unwrap()
    }

    #[test]
    fn empty_edit_projects_the_prototype_twice() {
        let prototype = tree("Stmt[Call(\"f\"),Return[Int(\"0\")]]");
        let diff = DiffTree::new(prototype.clone());
        assert!(deep_compare(diff.get_before().as_ref(), prototype.as_ref()));
        assert!(deep_compare(diff.get_after().as_ref(), prototype.as_ref()));
    }

    #[test]
    fn delete_keeps_before_and_shrinks_after() {
        let prototype = tree("Stmt[Call(\"f\"),Return[Int(\"0\")]]");
        let ret = prototype.child(1).unwrap();
        let mut diff = DiffTree::new(prototype.clone());
        assert!(diff.delete_node(diff.root(), &ret));

        assert!(deep_compare(diff.get_before().as_ref(), prototype.as_ref()));
        let expected = tree("Stmt[Call(\"f\")]");
        assert!(deep_compare(diff.get_after().as_ref(), expected.as_ref()));
    }

    #[test]
    fn insert_at_the_head_and_after_an_anchor() {
        let prototype = tree("List[A,C]");
        let mut diff = DiffTree::new(prototype.clone());

        let head = tree("H");
        assert!(diff.insert_node_after(diff.root(), head, None));
        let anchor = prototype.child(0).unwrap();
        let mid = tree("B");
        assert!(diff.insert_node_after(diff.root(), mid, Some(&anchor)));

        assert!(deep_compare(diff.get_before().as_ref(), prototype.as_ref()));
        let expected = tree("List[H,A,B,C]");
        assert!(deep_compare(diff.get_after().as_ref(), expected.as_ref()));
    }

    #[test]
    fn insertions_chain_on_the_previously_inserted_node() {
        let prototype = tree("List[A]");
        let mut diff = DiffTree::new(prototype.clone());

        let first = tree("B");
        let second = tree("C");
        let anchor = prototype.child(0).unwrap();
        assert!(diff.insert_node_after(diff.root(), first.clone(), Some(&anchor)));
        assert!(diff.insert_node_after(diff.root(), second, Some(&first)));

        let expected = tree("List[A,B,C]");
        assert!(deep_compare(diff.get_after().as_ref(), expected.as_ref()));
    }

    #[test]
    fn replace_swaps_between_the_images() {
        let prototype = tree("Add[Int(\"2\"),Int(\"3\")]");
        let mut diff = DiffTree::new(prototype.clone());
        let replacement = tree("Int(\"7\")");
        assert!(diff.replace_node_at(diff.root(), 1, replacement));

        assert!(deep_compare(diff.get_before().as_ref(), prototype.as_ref()));
        let expected = tree("Add[Int(\"2\"),Int(\"7\")]");
        assert!(deep_compare(diff.get_after().as_ref(), expected.as_ref()));
    }

    #[test]
    fn lookups_miss_without_state_change() {
        let prototype = tree("List[A,B]");
        let stranger = tree("Z");
        let mut diff = DiffTree::new(prototype.clone());

        assert!(!diff.delete_node(diff.root(), &stranger));
        assert!(!diff.replace_node(diff.root(), &stranger, tree("Y")));
        assert!(!diff.insert_node_after(diff.root(), tree("Y"), Some(&stranger)));
        assert!(!diff.delete_node_at(diff.root(), 5));
        assert!(!diff.replace_node_at(diff.root(), 5, tree("Y")));

        assert!(deep_compare(diff.get_after().as_ref(), prototype.as_ref()));
    }

    #[test]
    fn deleted_slots_cannot_be_edited_again() {
        let prototype = tree("List[A,B]");
        let second = prototype.child(1).unwrap();
        let mut diff = DiffTree::new(prototype);
        assert!(diff.delete_node(diff.root(), &second));
        assert!(!diff.delete_node(diff.root(), &second));
        assert!(!diff.replace_node(diff.root(), &second, tree("Y")));
    }

    #[test]
    fn child_slots_are_navigable() {
        let prototype = tree("List[A,B]");
        let diff = DiffTree::new(prototype.clone());
        assert_eq!(diff.child_count(diff.root()), 2);
        assert_eq!(diff.name(diff.root()), "List");
        let Some(DiffTreeItem::Node(first)) = diff.child(diff.root(), 0) else {
            panic!("expected a mirrored child");
        };
        assert_eq!(diff.name(*first), "A");
        assert_eq!(diff.parent(*first), Some(diff.root()));
        assert!(same_node(
            diff.prototype(*first),
            &prototype.child(0).unwrap()
        ));
    }

    #[test]
    fn projection_degrades_to_dummy_on_builder_rejection() {
        let prototype = crate::node::DummyNode::rc();
        // The dummy builder rejects any nonempty child list; force one in.
        let mut diff = DiffTree::new(prototype);
        assert!(diff.insert_node_after(diff.root(), tree("A"), None));
        assert!(diff.get_after().is_dummy());
        // The before image carries no insertion and rebuilds the dummy
        // prototype itself.
        assert!(diff.get_before().is_dummy());
    }
}
