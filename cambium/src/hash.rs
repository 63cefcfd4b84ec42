//! Dual node hashes.
//!
//! Every node carries two 64-bit hashes: a *local* hash over its type name
//! and data, and an *absolute* hash folding the local hash together with the
//! absolute hashes of all children in order. Equal absolute hashes mean
//! structurally identical subtrees (Merkle-tree style); equal local hashes
//! mean the nodes themselves agree while their children may differ.

use core::fmt;
use core::hash::{Hash, Hasher};
use rapidhash::RapidHasher;

/// A 64-bit structural hash of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeHash(pub u64);

impl fmt::Display for NodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Computes the local hash of a node from its type name and data.
pub fn local_hash(type_name: &str, data: &str) -> NodeHash {
    let mut hasher = RapidHasher::default();
    type_name.hash(&mut hasher);
    data.hash(&mut hasher);
    NodeHash(hasher.finish())
}

/// Folds a node's local hash with its children's absolute hashes, in order.
///
/// For a leaf this is a re-mix of the local hash alone; a leaf's absolute
/// hash is distinct from its local hash.
pub fn combine_hashes(local: NodeHash, children: &[NodeHash]) -> NodeHash {
    let mut hasher = RapidHasher::default();
    local.0.hash(&mut hasher);
    for child in children {
        child.0.hash(&mut hasher);
    }
    NodeHash(hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_hash_depends_on_type_and_data() {
        let a = local_hash("IntegerLiteral", "2");
        assert_eq!(a, local_hash("IntegerLiteral", "2"));
        assert_ne!(a, local_hash("IntegerLiteral", "3"));
        assert_ne!(a, local_hash("StringLiteral", "2"));
    }

    #[test]
    fn type_and_data_are_framed_separately() {
        // "ab" + "c" must not hash like "a" + "bc".
        assert_ne!(local_hash("ab", "c"), local_hash("a", "bc"));
    }

    #[test]
    fn absolute_hash_depends_on_child_order() {
        let x = local_hash("X", "");
        let a = combine_hashes(local_hash("A", ""), &[]);
        let b = combine_hashes(local_hash("B", ""), &[]);
        assert_ne!(combine_hashes(x, &[a, b]), combine_hashes(x, &[b, a]));
    }

    #[test]
    fn leaf_absolute_hash_differs_from_local() {
        let local = local_hash("Leaf", "data");
        assert_ne!(combine_hashes(local, &[]), local);
    }
}
