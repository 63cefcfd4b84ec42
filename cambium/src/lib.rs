//! # Cambium
//!
//! Hash-driven top-down tree mapping with edit script generation.
//!
//! Named after the cambium, the thin layer of a tree where all growth and
//! change happens.
//!
//! ## Algorithm overview
//!
//! Cambium maps two ordered syntax trees by comparing two cached 64-bit
//! hashes per node:
//!
//! - the **local hash**, computed from a node's type name and data;
//! - the **absolute hash**, combining the local hash with the absolute
//!   hashes of all children in order (Merkle-tree style), so two subtrees
//!   are structurally identical iff their absolute hashes are equal.
//!
//! The mapper descends from the roots:
//!
//! 1. Equal absolute hashes: the subtrees are identical and map pairwise.
//! 2. Equal local hashes: the nodes map and their children are resolved
//!    section by section, matching the longest runs of identical siblings
//!    and classifying the leftovers as insertions or deletions.
//! 3. Neither: the left root is replaced by the right root and both
//!    subtrees are acknowledged as unmatched.
//!
//! Hash equality is trusted as identity; collisions are an accepted
//! engineering trade-off and are never verified by deep comparison.
//!
//! ## Usage
//!
//! ```
//! use cambium::{ExtTree, map_trees};
//! # use std::rc::Rc;
//! # #[derive(Clone)]
//! # struct N(Rc<(String, Vec<N>)>);
//! # impl cambium::SourceNode for N {
//! #     fn type_name(&self) -> &str { &self.0.0 }
//! #     fn data(&self) -> &str { "" }
//! #     fn child_count(&self) -> usize { self.0.1.len() }
//! #     fn child(&self, index: usize) -> Self { self.0.1[index].clone() }
//! # }
//! # fn leaf(name: &str) -> N { N(Rc::new((name.to_string(), Vec::new()))) }
//! let left = leaf("literal");
//! let right = leaf("literal");
//!
//! let left_view = ExtTree::build(&left);
//! let right_view = ExtTree::build(&right);
//! let mapping = map_trees(&left_view, &right_view).unwrap();
//! assert!(mapping.inserted().is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]

pub use indextree;

mod tracing_macros;
pub(crate) use tracing_macros::{debug, trace};

mod ext_tree;
mod hash;
#[cfg(test)]
mod test_node;
mod mapper;
mod pair_finder;
mod section;
mod source;

pub use ext_tree::{ExtNodeData, ExtTree};
pub use hash::{NodeHash, combine_hashes, local_hash};
pub use mapper::{Insertion, MapError, Mapping, map_trees};
pub use pair_finder::{PairKey, PairRun, find_longest_run};
pub use section::{Section, Unprocessed};
pub use source::SourceNode;
