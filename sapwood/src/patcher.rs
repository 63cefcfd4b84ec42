//! Applying difference trees as patterns.
//!
//! A pattern is a difference tree: its *before* image describes what to look
//! for, its *after* image what to put there. Matching is structural deep
//! comparison; discovery is top-down and leftmost, and traversal never
//! descends into a substituted subtree, so overlapping matches resolve to
//! the outermost one.

use crate::diff_tree::DiffTree;
use crate::node::{NodeRc, deep_compare, same_node};
use crate::{debug, trace};

/// Applies a pattern to a syntax tree, returning the updated tree.
///
/// Every non-overlapping subtree deep-equal to the pattern's before image is
/// substituted by the after image. Ancestors of a substitution are rebuilt
/// through their builders; when a builder rejects the patched children the
/// substitution is abandoned for that subtree and the original kept. With
/// no match the source is returned unchanged.
pub fn patch(source: &NodeRc, pattern: &DiffTree) -> NodeRc {
    let before = pattern.get_before();
    let after = pattern.get_after();
    if before.is_dummy() {
        // The pattern's own projection failed; there is nothing to look for.
        return source.clone();
    }
    let patched = substitute(source, &before, &after);
    debug!(changed = !same_node(&patched, source), "patch applied");
    patched
}

fn substitute(node: &NodeRc, before: &NodeRc, after: &NodeRc) -> NodeRc {
    if deep_compare(node.as_ref(), before.as_ref()) {
        trace!(name = node.type_name(), "pattern matched");
        return after.clone();
    }

    let count = node.child_count();
    let mut children = Vec::with_capacity(count);
    let mut changed = false;
    for index in 0..count {
        if let Some(child) = node.child(index) {
            let patched = substitute(&child, before, after);
            changed |= !same_node(&patched, &child);
            children.push(patched);
        }
    }
    if !changed {
        return node.clone();
    }

    // A child changed: rebuild this node around the new children.
    let mut builder = node.node_type().create_builder();
    builder.set_fragment(node.fragment());
    if !builder.set_data(node.data()) {
        return node.clone();
    }
    if !builder.set_children(children) {
        return node.clone();
    }
    if !builder.is_valid() {
        return node.clone();
    }
    builder.create()
}
