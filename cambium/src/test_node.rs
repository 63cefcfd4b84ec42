//! Self-contained tree type for unit tests.

use std::rc::Rc;

use crate::source::SourceNode;

struct Inner {
    name: String,
    data: String,
    children: Vec<TestNode>,
}

/// A minimal reference-counted tree node for exercising the engine.
///
/// Built from a compact notation: `Add[Int("2"),Int("3")]` — an optional
/// quoted data payload in parentheses, optional children in brackets.
#[derive(Clone)]
pub struct TestNode(Rc<Inner>);

impl TestNode {
    pub fn new(name: &str, data: &str, children: Vec<TestNode>) -> Self {
        Self(Rc::new(Inner {
            name: name.to_string(),
            data: data.to_string(),
            children,
        }))
    }

    /// Parses the compact notation; panics on malformed input (tests only).
    pub fn parse(text: &str) -> Self {
        let mut chars = text.char_indices().peekable();
        let node = parse_node(text, &mut chars);
        assert!(chars.next().is_none(), "trailing input in {text:?}");
        node
    }
}

impl SourceNode for TestNode {
    fn type_name(&self) -> &str {
        &self.0.name
    }

    fn data(&self) -> &str {
        &self.0.data
    }

    fn child_count(&self) -> usize {
        self.0.children.len()
    }

    fn child(&self, index: usize) -> Self {
        self.0.children[index].clone()
    }
}

type Stream<'a> = core::iter::Peekable<core::str::CharIndices<'a>>;

fn parse_node(text: &str, chars: &mut Stream<'_>) -> TestNode {
    let start = chars.peek().map(|(i, _)| *i).unwrap_or(text.len());
    let mut end = start;
    while let Some((i, c)) = chars.peek().copied() {
        if c.is_alphanumeric() || c == '_' {
            end = i + c.len_utf8();
            chars.next();
        } else {
            break;
        }
    }
    let name = &text[start..end];
    assert!(!name.is_empty(), "expected a type name in {text:?}");

    let mut data = String::new();
    if matches!(chars.peek(), Some((_, '('))) {
        chars.next();
        assert!(matches!(chars.next(), Some((_, '"'))), "expected opening quote");
        for (_, c) in chars.by_ref() {
            if c == '"' {
                break;
            }
            data.push(c);
        }
        assert!(matches!(chars.next(), Some((_, ')'))), "expected closing paren");
    }

    let mut children = Vec::new();
    if matches!(chars.peek(), Some((_, '['))) {
        chars.next();
        loop {
            children.push(parse_node(text, chars));
            match chars.next() {
                Some((_, ',')) => continue,
                Some((_, ']')) => break,
                other => panic!("expected ',' or ']', got {other:?}"),
            }
        }
    }

    TestNode::new(name, &data, children)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_compact_notation() {
        let node = TestNode::parse("Add[Int(\"2\"),Int(\"3\")]");
        assert_eq!(node.type_name(), "Add");
        assert_eq!(node.child_count(), 2);
        assert_eq!(node.child(0).type_name(), "Int");
        assert_eq!(node.child(0).data(), "2");
        assert_eq!(node.child(1).data(), "3");
    }
}
