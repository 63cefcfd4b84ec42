//! Applying difference-tree patterns to syntax trees.

use sapwood::{DiffTree, DraftNode, Node, NodeRc, deep_compare, patch, same_node};

fn tree(text: &str) -> NodeRc {
    DraftNode::parse(text).expect("test trees are well-formed")
}

/// Pattern with before `Stmt[Call("f"), Return[Int("0")]]` and after
/// `Stmt[Call("f")]`.
fn drop_trailing_return() -> DiffTree {
    let prototype = tree("Stmt[Call(\"f\"),Return[Int(\"0\")]]");
    let ret = prototype.child(1).unwrap();
    let mut pattern = DiffTree::new(prototype);
    assert!(pattern.delete_node(pattern.root(), &ret));
    pattern
}

#[test]
fn s6_patch_substitutes_the_matching_statement() {
    let source = tree("Prog[Stmt[Call(\"f\"),Return[Int(\"0\")]],Stmt[Call(\"g\")]]");
    let result = patch(&source, &drop_trailing_return());
    let expected = tree("Prog[Stmt[Call(\"f\")],Stmt[Call(\"g\")]]");
    assert!(deep_compare(result.as_ref(), expected.as_ref()));
}

#[test]
fn patch_without_a_match_is_the_identity() {
    let source = tree("Prog[Stmt[Call(\"g\")],Stmt[Call(\"h\")]]");
    let result = patch(&source, &drop_trailing_return());
    assert!(same_node(&result, &source));
}

#[test]
fn patch_replaces_every_non_overlapping_match() {
    let source = tree(
        "Prog[Block[Stmt[Call(\"f\"),Return[Int(\"0\")]]],Stmt[Call(\"f\"),Return[Int(\"0\")]]]",
    );
    let result = patch(&source, &drop_trailing_return());
    let expected = tree("Prog[Block[Stmt[Call(\"f\")]],Stmt[Call(\"f\")]]");
    assert!(deep_compare(result.as_ref(), expected.as_ref()));
}

#[test]
fn patch_is_idempotent_when_after_does_not_contain_before() {
    let source = tree("Prog[Stmt[Call(\"f\"),Return[Int(\"0\")]]]");
    let pattern = drop_trailing_return();
    let once = patch(&source, &pattern);
    let twice = patch(&once, &pattern);
    assert!(same_node(&twice, &once));
}

#[test]
fn insertion_patterns_grow_the_target() {
    // Before `List[A]`, after `List[A, B]`.
    let prototype = tree("List[A]");
    let anchor = prototype.child(0).unwrap();
    let mut pattern = DiffTree::new(prototype);
    assert!(pattern.insert_node_after(pattern.root(), tree("B"), Some(&anchor)));

    let source = tree("Prog[List[A],List[C]]");
    let result = patch(&source, &pattern);
    let expected = tree("Prog[List[A,B],List[C]]");
    assert!(deep_compare(result.as_ref(), expected.as_ref()));
}

#[test]
fn diffed_trees_patch_other_occurrences() {
    // Diff two variants of a statement, then apply the delta elsewhere.
    let left = tree("Stmt[Call(\"log\"),Ret]");
    let right = tree("Stmt[Call(\"log\")]");
    let mapping = sapwood::map(&left, &right).unwrap();
    let mut builder = sapwood::DiffTreeBuilder::new(&left);
    assert!(builder.build(&mapping));
    let pattern = builder.into_diff_tree();

    let source = tree("Prog[Stmt[Call(\"log\"),Ret],Stmt[Call(\"other\")]]");
    let result = patch(&source, &pattern);
    let expected = tree("Prog[Stmt[Call(\"log\")],Stmt[Call(\"other\")]]");
    assert!(deep_compare(result.as_ref(), expected.as_ref()));
}
