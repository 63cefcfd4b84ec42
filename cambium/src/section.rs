//! Sibling-run bookkeeping during matching.
//!
//! When two parents match by local hash, their children are resolved section
//! by section. A [`Section`] is a pair of contiguous runs of still-unmatched
//! siblings, one slice per tree; [`Unprocessed`] queues the sections pending
//! resolution. At every step the union of the remaining sections equals the
//! original child lists minus the already-matched nodes, order preserved.

use std::collections::VecDeque;

use indextree::NodeId;

use crate::ext_tree::ExtTree;
use crate::source::SourceNode;

/// A pair of contiguous unmatched sibling slices under two matched parents.
#[derive(Debug, Clone)]
pub struct Section {
    left: Vec<NodeId>,
    right: Vec<NodeId>,
}

impl Section {
    /// A section spanning all children of two matched parents.
    pub fn spanning<N: SourceNode>(
        left_tree: &ExtTree<N>,
        left: NodeId,
        right_tree: &ExtTree<N>,
        right: NodeId,
    ) -> Self {
        Self {
            left: left_tree.child_vec(left),
            right: right_tree.child_vec(right),
        }
    }

    /// Unmatched nodes of the left tree, in sibling order.
    pub fn left(&self) -> &[NodeId] {
        &self.left
    }

    /// Unmatched nodes of the right tree, in sibling order.
    pub fn right(&self) -> &[NodeId] {
        &self.right
    }

    /// Whether the left-tree node is still pending in this section.
    pub fn has_left_node(&self, id: NodeId) -> bool {
        self.left.contains(&id)
    }

    /// Whether the right-tree node is still pending in this section.
    pub fn has_right_node(&self, id: NodeId) -> bool {
        self.right.contains(&id)
    }

    /// Both slices exhausted.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// Splits the section around a matched run of `count` pairs starting at
    /// the given offsets, yielding the leading and trailing subsections.
    pub fn split_around(
        &self,
        left_offset: usize,
        right_offset: usize,
        count: usize,
    ) -> (Section, Section) {
        let leading = Section {
            left: self.left[..left_offset].to_vec(),
            right: self.right[..right_offset].to_vec(),
        };
        let trailing = Section {
            left: self.left[left_offset + count..].to_vec(),
            right: self.right[right_offset + count..].to_vec(),
        };
        (leading, trailing)
    }
}

/// The still-unmatched portions of two parents' child lists, as a FIFO of
/// sections. Sections are handed out leftmost first; after a partial match
/// splits a section, the leading subsection is processed before the trailing
/// one.
pub struct Unprocessed {
    sections: VecDeque<Section>,
}

impl Unprocessed {
    /// Starts with one section spanning all children of both parents.
    pub fn new<N: SourceNode>(
        left_tree: &ExtTree<N>,
        left: NodeId,
        right_tree: &ExtTree<N>,
        right: NodeId,
    ) -> Self {
        let mut sections = VecDeque::new();
        let initial = Section::spanning(left_tree, left, right_tree, right);
        if !initial.is_empty() {
            sections.push_back(initial);
        }
        Self { sections }
    }

    /// Takes the first pending section.
    pub fn pop_first(&mut self) -> Option<Section> {
        self.sections.pop_front()
    }

    /// Requeues the subsections left over after a match, leading first.
    /// Exhausted subsections are dropped.
    pub fn restore(&mut self, leading: Section, trailing: Section) {
        if !trailing.is_empty() {
            self.sections.push_front(trailing);
        }
        if !leading.is_empty() {
            self.sections.push_front(leading);
        }
    }

    /// Number of pending sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Pending sections in processing order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> + '_ {
        self.sections.iter()
    }
}
