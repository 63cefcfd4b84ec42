//! The syntax tree node model.
//!
//! Trees are immutable values made of reference-counted [`Node`] trait
//! objects. Identity is pointer identity; structural equality is
//! [`deep_compare`]. New nodes are only ever produced through the
//! [`Builder`] obtained from a node's [`Type`], which may reject data or
//! children it considers invalid.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::Deref;
use std::rc::Rc;

use indexmap::IndexMap;

/// Per-node string properties, insertion-ordered.
pub type Properties = IndexMap<String, String>;

/// Opaque source-location metadata attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    /// Name of the originating source, if any (file path, buffer name).
    pub source: Option<Rc<str>>,
    /// Byte offset where the fragment begins.
    pub begin: usize,
    /// Byte offset just past the fragment's end.
    pub end: usize,
}

/// A node type: the handle through which new nodes of this kind are built.
pub trait Type {
    /// The type's name, equal to [`Node::type_name`] of its nodes.
    fn name(&self) -> &str;

    /// A fresh builder for a node of this type.
    fn create_builder(&self) -> Box<dyn Builder>;
}

/// A mutable construction sink for one node.
///
/// Builders are rejectable: `set_data` and `set_children` report whether the
/// input was accepted, and `is_valid` gates `create`. Pipelines that honor
/// all rejection points (projections, the patcher) short-circuit on the
/// first `false`.
pub trait Builder {
    /// Attaches source-location metadata.
    fn set_fragment(&mut self, fragment: Fragment);

    /// Sets the data payload; `false` means the data was rejected.
    fn set_data(&mut self, data: &str) -> bool;

    /// Sets the full children list; `false` means an arity or typing rule
    /// was violated.
    fn set_children(&mut self, children: Vec<NodeRc>) -> bool;

    /// Whether the builder can currently produce a node.
    fn is_valid(&self) -> bool;

    /// Produces the node. Only called after [`is_valid`](Self::is_valid)
    /// returned `true`.
    fn create(self: Box<Self>) -> NodeRc;
}

/// Maps a type name to a fresh builder; `None` means no such type.
pub trait Factory {
    /// A builder for the named type, if the factory knows it.
    fn create_builder(&self, type_name: &str) -> Option<Box<dyn Builder>>;
}

/// An immutable, ordered syntax tree node.
pub trait Node {
    /// Source-location metadata.
    fn fragment(&self) -> Fragment;

    /// The node's type handle.
    fn node_type(&self) -> &dyn Type;

    /// The type name; defaults to the type handle's name.
    fn type_name(&self) -> &str {
        self.node_type().name()
    }

    /// The data payload, empty when there is none.
    fn data(&self) -> &str;

    /// The node's properties.
    fn properties(&self) -> Properties;

    /// Number of children.
    fn child_count(&self) -> usize;

    /// Child handle by zero-based index; `None` when out of range.
    fn child(&self, index: usize) -> Option<NodeRc>;

    /// The node this one wraps and delegates to, for prototype-based
    /// variants. Plain nodes return `None`.
    fn prototype(&self) -> Option<&NodeRc> {
        None
    }

    /// Whether this is the distinguished "no node" value.
    fn is_dummy(&self) -> bool {
        false
    }
}

/// Shared handle to a node; clones are identical, identity is pointer
/// identity.
///
/// Wraps `Rc<dyn Node>` in a local type so that foreign traits (e.g.
/// `cambium::SourceNode`) can be implemented for it without violating the
/// orphan rules.
#[derive(Clone)]
pub struct NodeRc(pub(crate) Rc<dyn Node>);

impl NodeRc {
    /// Wraps a concrete node in a new handle.
    pub fn new<N: Node + 'static>(node: N) -> Self {
        NodeRc(Rc::new(node))
    }
}

impl Deref for NodeRc {
    type Target = dyn Node;

    fn deref(&self) -> &(dyn Node + 'static) {
        &*self.0
    }
}

impl AsRef<dyn Node> for NodeRc {
    fn as_ref(&self) -> &(dyn Node + 'static) {
        &*self.0
    }
}

impl fmt::Debug for dyn Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())?;
        if !self.data().is_empty() {
            write!(f, "({:?})", self.data())?;
        }
        if self.child_count() > 0 {
            write!(f, "[")?;
            for index in 0..self.child_count() {
                if index > 0 {
                    write!(f, ",")?;
                }
                match self.child(index) {
                    Some(child) => fmt::Debug::fmt(child.as_ref(), f)?,
                    None => write!(f, "?")?,
                }
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

/// Structural equality: type names, data, and children, recursively.
/// Fragments and properties do not participate.
pub fn deep_compare(first: &dyn Node, second: &dyn Node) -> bool {
    if first.type_name() != second.type_name() || first.data() != second.data() {
        return false;
    }
    let count = first.child_count();
    if count != second.child_count() {
        return false;
    }
    for index in 0..count {
        match (first.child(index), second.child(index)) {
            (Some(a), Some(b)) => {
                if !deep_compare(a.as_ref(), b.as_ref()) {
                    return false;
                }
            }
            _ => return false,
        }
    }
    true
}

/// Prototype chains are contractually acyclic; the cap only breaks
/// accidental cycles instead of spinning forever.
const PROTOTYPE_CHAIN_LIMIT: usize = 64;

/// Whether `node` is `target`, or wraps it anywhere down its prototype
/// chain.
pub fn represents(node: &NodeRc, target: &NodeRc) -> bool {
    let mut current = node.clone();
    for _ in 0..PROTOTYPE_CHAIN_LIMIT {
        if same_node(&current, target) {
            return true;
        }
        match current.prototype() {
            Some(prototype) => {
                let next = prototype.clone();
                current = next;
            }
            None => return false,
        }
    }
    false
}

/// Pointer identity of two node handles.
pub fn same_node(first: &NodeRc, second: &NodeRc) -> bool {
    core::ptr::eq(
        Rc::as_ptr(&first.0) as *const (),
        Rc::as_ptr(&second.0) as *const (),
    )
}

/// A map key that compares nodes by identity rather than by content.
#[derive(Clone)]
pub struct NodeKey(NodeRc);

impl NodeKey {
    /// Wraps a node handle.
    pub fn new(node: &NodeRc) -> Self {
        Self(node.clone())
    }

    /// The wrapped handle.
    pub fn node(&self) -> &NodeRc {
        &self.0
    }
}

impl PartialEq for NodeKey {
    fn eq(&self, other: &Self) -> bool {
        same_node(&self.0, &other.0)
    }
}

impl Eq for NodeKey {}

impl Hash for NodeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0.0) as *const () as usize).hash(state);
    }
}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeKey({})", self.0.type_name())
    }
}

/// The distinguished "no node / empty tree" value.
pub struct DummyNode;

impl DummyNode {
    /// A fresh dummy handle.
    pub fn rc() -> NodeRc {
        NodeRc(Rc::new(DummyNode))
    }
}

static DUMMY_TYPE: DummyType = DummyType;

struct DummyType;

impl Type for DummyType {
    fn name(&self) -> &str {
        ""
    }

    fn create_builder(&self) -> Box<dyn Builder> {
        Box::new(DummyBuilder)
    }
}

struct DummyBuilder;

impl Builder for DummyBuilder {
    fn set_fragment(&mut self, _fragment: Fragment) {}

    fn set_data(&mut self, data: &str) -> bool {
        data.is_empty()
    }

    fn set_children(&mut self, children: Vec<NodeRc>) -> bool {
        children.is_empty()
    }

    fn is_valid(&self) -> bool {
        true
    }

    fn create(self: Box<Self>) -> NodeRc {
        DummyNode::rc()
    }
}

impl Node for DummyNode {
    fn fragment(&self) -> Fragment {
        Fragment::default()
    }

    fn node_type(&self) -> &dyn Type {
        &DUMMY_TYPE
    }

    fn data(&self) -> &str {
        ""
    }

    fn properties(&self) -> Properties {
        Properties::new()
    }

    fn child_count(&self) -> usize {
        0
    }

    fn child(&self, _index: usize) -> Option<NodeRc> {
        None
    }

    fn is_dummy(&self) -> bool {
        true
    }
}

impl cambium::SourceNode for NodeRc {
    fn type_name(&self) -> &str {
        (**self).type_name()
    }

    fn data(&self) -> &str {
        (**self).data()
    }

    fn child_count(&self) -> usize {
        (**self).child_count()
    }

    fn child(&self, index: usize) -> Self {
        (**self)
            .child(index)
            .expect("child index within child_count")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::DraftNode;

    #[test]
    fn deep_compare_ignores_identity() {
        let first = DraftNode::parse("Add[Int(\"2\"),Int(\"3\")]").unwrap();
        let second = DraftNode::parse("Add[Int(\"2\"),Int(\"3\")]").unwrap();
        assert!(!same_node(&first, &second));
        assert!(deep_compare(first.as_ref(), second.as_ref()));
    }

    #[test]
    fn deep_compare_sees_data_and_children() {
        let base = DraftNode::parse("Add[Int(\"2\"),Int(\"3\")]").unwrap();
        let other_data = DraftNode::parse("Add[Int(\"2\"),Int(\"4\")]").unwrap();
        let other_shape = DraftNode::parse("Add[Int(\"2\")]").unwrap();
        assert!(!deep_compare(base.as_ref(), other_data.as_ref()));
        assert!(!deep_compare(base.as_ref(), other_shape.as_ref()));
    }

    #[test]
    fn dummy_is_dummy() {
        let dummy = DummyNode::rc();
        assert!(dummy.is_dummy());
        assert_eq!(dummy.child_count(), 0);
        let plain = DraftNode::parse("A").unwrap();
        assert!(!plain.is_dummy());
    }

    #[test]
    fn node_keys_compare_by_identity() {
        let node = DraftNode::parse("A").unwrap();
        let twin = DraftNode::parse("A").unwrap();
        assert_eq!(NodeKey::new(&node), NodeKey::new(&node.clone()));
        assert_ne!(NodeKey::new(&node), NodeKey::new(&twin));
    }

    #[test]
    fn represents_chases_prototype_chains() {
        let base = DraftNode::parse("A").unwrap();
        let wrapped: NodeRc =
            NodeRc(Rc::new(crate::draft::tests_support::Wrapper::new(base.clone())));
        let twice: NodeRc =
            NodeRc(Rc::new(crate::draft::tests_support::Wrapper::new(wrapped.clone())));
        assert!(represents(&twice, &base));
        assert!(represents(&wrapped, &base));
        assert!(!represents(&base, &twice));
    }
}
