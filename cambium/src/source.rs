//! The engine's view of a source tree.

/// Read access the mapping engine needs from a syntax tree node.
///
/// Implementations are cheap handles (reference-counted pointers, arena ids);
/// cloning a handle never copies the tree. The engine treats handles as
/// opaque: identity, equality and everything else it needs is derived from
/// the hashes cached in the extended view.
pub trait SourceNode: Clone {
    /// Name of the node's type, e.g. `"IntegerLiteral"`.
    fn type_name(&self) -> &str;

    /// Data payload attached to the node, empty when there is none.
    fn data(&self) -> &str;

    /// Number of children.
    fn child_count(&self) -> usize;

    /// Child handle by zero-based index.
    ///
    /// Callers only pass indices below [`child_count`](Self::child_count).
    fn child(&self, index: usize) -> Self;
}
