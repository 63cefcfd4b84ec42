//! Syntax tree differencing and patching on top of the cambium mapping
//! engine.
//!
//! sapwood provides:
//! - **Node model**: immutable tree values behind the [`Node`] trait, built
//!   through rejectable [`Builder`]s obtained from [`Type`] handles
//! - **Mapping**: a node-space facade over cambium's hash-driven top-down
//!   mapper, classifying a delta into insertions, deletions and replacements
//! - **Difference trees**: a navigable mirror of an original tree whose
//!   child slots carry edit actions, projecting consistent *before* and
//!   *after* images
//! - **Patching**: applying a difference tree as a find-and-substitute
//!   pattern to arbitrary trees
//!
//! # Example
//!
//! ```rust
//! use sapwood::{DiffTree, DraftNode, Node, deep_compare};
//!
//! let tree = DraftNode::parse("Stmt[Call(\"f\"),Return[Int(\"0\")]]").unwrap();
//! let ret = tree.child(1).unwrap();
//!
//! let mut diff = DiffTree::new(tree.clone());
//! assert!(diff.delete_node(diff.root(), &ret));
//!
//! let before = diff.get_before();
//! let after = diff.get_after();
//! assert!(deep_compare(before.as_ref(), tree.as_ref()));
//! assert_eq!(after.child_count(), 1);
//! ```

mod tracing_macros;
pub(crate) use tracing_macros::{debug, trace};

mod diff_builder;
mod diff_tree;
mod draft;
mod mapper;
mod node;
mod patcher;

pub use cambium::MapError;
pub use diff_builder::DiffTreeBuilder;
pub use diff_tree::{DiffNodeId, DiffTree, DiffTreeItem};
pub use draft::{DraftBuilder, DraftFactory, DraftNode, DraftType};
pub use mapper::{Insertion, MappingResult, map};
pub use node::{
    Builder, DummyNode, Factory, Fragment, Node, NodeKey, NodeRc, Properties, Type, deep_compare,
    represents, same_node,
};
pub use patcher::patch;
