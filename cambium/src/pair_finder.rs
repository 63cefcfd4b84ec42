//! Longest matching run of sibling pairs.
//!
//! Given a [`Section`], finds the longest contiguous run `(l..l+k, r..r+k)`
//! such that every aligned pair of siblings agrees on the selected hash.
//! This is the classic dynamic-programming longest common substring over two
//! sequences of 64-bit keys.

use indextree::NodeId;

use crate::ext_tree::ExtTree;
use crate::section::Section;
use crate::source::SourceNode;
use crate::trace;

/// Which cached hash drives the run matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKey {
    /// Match whole identical subtrees.
    AbsoluteHash,
    /// Match nodes that agree locally while their children may differ.
    LocalHash,
}

/// A matched run of sibling pairs; `count == 0` means nothing matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairRun {
    /// Offset of the run in the section's left slice.
    pub left_offset: usize,
    /// Offset of the run in the section's right slice.
    pub right_offset: usize,
    /// Number of matched pairs.
    pub count: usize,
}

impl PairRun {
    /// Whether any pairs were matched.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Finds the longest run of hash-equal sibling pairs in a section.
///
/// Ties are broken toward the earliest `left_offset + right_offset` sum,
/// then the earliest `left_offset`, which keeps the edit script
/// deterministic and biased toward leftmost matches.
pub fn find_longest_run<N: SourceNode>(
    left_tree: &ExtTree<N>,
    right_tree: &ExtTree<N>,
    section: &Section,
    key: PairKey,
) -> PairRun {
    let left_keys = keys_of(left_tree, section.left(), key);
    let right_keys = keys_of(right_tree, section.right(), key);

    let mut best = PairRun::default();
    // Rolling rows: previous[j] is the run length ending at (i-1, j-1).
    let mut previous = vec![0usize; right_keys.len() + 1];
    let mut current = vec![0usize; right_keys.len() + 1];

    for (i, left_key) in left_keys.iter().enumerate() {
        current[0] = 0;
        for (j, right_key) in right_keys.iter().enumerate() {
            if left_key == right_key {
                let count = previous[j] + 1;
                current[j + 1] = count;
                let candidate = PairRun {
                    left_offset: i + 1 - count,
                    right_offset: j + 1 - count,
                    count,
                };
                if beats(&candidate, &best) {
                    best = candidate;
                }
            } else {
                current[j + 1] = 0;
            }
        }
        core::mem::swap(&mut previous, &mut current);
    }

    trace!(
        left_offset = best.left_offset,
        right_offset = best.right_offset,
        count = best.count,
        "longest sibling run"
    );
    best
}

fn keys_of<N: SourceNode>(tree: &ExtTree<N>, nodes: &[NodeId], key: PairKey) -> Vec<u64> {
    nodes
        .iter()
        .map(|&id| match key {
            PairKey::AbsoluteHash => tree.absolute_hash(id).0,
            PairKey::LocalHash => tree.local_hash(id).0,
        })
        .collect()
}

fn beats(candidate: &PairRun, best: &PairRun) -> bool {
    if candidate.count != best.count {
        return candidate.count > best.count;
    }
    let candidate_sum = candidate.left_offset + candidate.right_offset;
    let best_sum = best.left_offset + best.right_offset;
    if candidate_sum != best_sum {
        return candidate_sum < best_sum;
    }
    candidate.left_offset < best.left_offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_node::TestNode;

    fn run_for(left: &str, right: &str, key: PairKey) -> PairRun {
        let left_tree = ExtTree::build(&TestNode::parse(left));
        let right_tree = ExtTree::build(&TestNode::parse(right));
        let section = Section::spanning(&left_tree, left_tree.root, &right_tree, right_tree.root);
        find_longest_run(&left_tree, &right_tree, &section, key)
    }

    #[test]
    fn finds_the_longest_run() {
        let run = run_for("P[A,B,C,D]", "P[X,B,C,D]", PairKey::AbsoluteHash);
        assert_eq!(run.count, 3);
        assert_eq!(run.left_offset, 1);
        assert_eq!(run.right_offset, 1);
    }

    #[test]
    fn nothing_in_common() {
        let run = run_for("P[A,B]", "P[X,Y]", PairKey::AbsoluteHash);
        assert!(run.is_empty());
    }

    #[test]
    fn tie_breaks_toward_the_earliest_offsets() {
        // Two runs of length one: (0,1) and (1,0); the sums tie at 1, so the
        // earliest left offset wins.
        let run = run_for("P[A,B]", "P[B,A]", PairKey::AbsoluteHash);
        assert_eq!(run.count, 1);
        assert_eq!(run.left_offset, 0);
        assert_eq!(run.right_offset, 1);
    }

    #[test]
    fn longer_run_beats_earlier_singletons() {
        let run = run_for("P[A,C,X]", "P[Y,A,C]", PairKey::AbsoluteHash);
        assert_eq!(run.count, 2);
        assert_eq!(run.left_offset, 0);
        assert_eq!(run.right_offset, 1);
    }

    #[test]
    fn offset_sum_tie_prefers_earliest_left() {
        // Length-one matches for A at (0,2) and for B at (2,0) tie on the
        // offset sum, so the earliest left offset wins.
        let run = run_for("P[A,X,B]", "P[B,Q,A]", PairKey::AbsoluteHash);
        assert_eq!(run.count, 1);
        assert_eq!(run.left_offset, 0);
        assert_eq!(run.right_offset, 2);
    }

    #[test]
    fn local_key_matches_across_different_subtrees() {
        // The lists differ as subtrees but agree locally.
        let run = run_for("P[List[A]]", "P[List[B]]", PairKey::LocalHash);
        assert_eq!(run.count, 1);
        let absolute = run_for("P[List[A]]", "P[List[B]]", PairKey::AbsoluteHash);
        assert!(absolute.is_empty());
    }
}
