//! Draft nodes: a permissive concrete node kind.
//!
//! Drafts accept any type name, any data and any children, which makes them
//! the quickest way to put a tree together in tests and examples. Trees can
//! be written in a compact notation with an optional quoted data payload and
//! optional bracketed children:
//!
//! ```
//! use sapwood::{DraftNode, Node};
//!
//! let tree = DraftNode::parse("Add[Int(\"2\"),Int(\"3\")]").unwrap();
//! assert_eq!(tree.type_name(), "Add");
//! assert_eq!(tree.child(0).unwrap().data(), "2");
//! ```

use std::rc::Rc;

use crate::node::{Builder, Factory, Fragment, Node, NodeRc, Properties, Type};

/// A plain node with arbitrary type name, data and children.
pub struct DraftNode {
    node_type: DraftType,
    fragment: Fragment,
    data: String,
    properties: Properties,
    children: Vec<NodeRc>,
}

impl DraftNode {
    /// A leaf draft with the given type name.
    pub fn named(name: &str) -> NodeRc {
        NodeRc(Rc::new(Self {
            node_type: DraftType {
                name: name.to_string(),
            },
            fragment: Fragment::default(),
            data: String::new(),
            properties: Properties::new(),
            children: Vec::new(),
        }))
    }

    /// Parses the compact notation: `Name`, `Name("data")`,
    /// `Name[child,…]` or `Name("data")[child,…]`. Returns `None` on
    /// malformed input.
    pub fn parse(text: &str) -> Option<NodeRc> {
        let mut parser = Parser {
            text,
            chars: text.char_indices().peekable(),
        };
        let node = parser.node()?;
        if parser.chars.next().is_some() {
            return None;
        }
        Some(node)
    }
}

impl Node for DraftNode {
    fn fragment(&self) -> Fragment {
        self.fragment.clone()
    }

    fn node_type(&self) -> &dyn Type {
        &self.node_type
    }

    fn data(&self) -> &str {
        &self.data
    }

    fn properties(&self) -> Properties {
        self.properties.clone()
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child(&self, index: usize) -> Option<NodeRc> {
        self.children.get(index).cloned()
    }
}

/// The type handle of a draft node.
pub struct DraftType {
    name: String,
}

impl Type for DraftType {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_builder(&self) -> Box<dyn Builder> {
        Box::new(DraftBuilder::new(&self.name))
    }
}

/// Builder for draft nodes; accepts everything, valid while the type name is
/// nonempty.
pub struct DraftBuilder {
    name: String,
    fragment: Fragment,
    data: String,
    children: Vec<NodeRc>,
}

impl DraftBuilder {
    /// A builder for the named draft type.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fragment: Fragment::default(),
            data: String::new(),
            children: Vec::new(),
        }
    }
}

impl Builder for DraftBuilder {
    fn set_fragment(&mut self, fragment: Fragment) {
        self.fragment = fragment;
    }

    fn set_data(&mut self, data: &str) -> bool {
        self.data = data.to_string();
        true
    }

    fn set_children(&mut self, children: Vec<NodeRc>) -> bool {
        self.children = children;
        true
    }

    fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }

    fn create(self: Box<Self>) -> NodeRc {
        NodeRc(Rc::new(DraftNode {
            node_type: DraftType { name: self.name },
            fragment: self.fragment,
            data: self.data,
            properties: Properties::new(),
            children: self.children,
        }))
    }
}

/// Factory producing draft builders for any nonempty type name.
pub struct DraftFactory;

impl Factory for DraftFactory {
    fn create_builder(&self, type_name: &str) -> Option<Box<dyn Builder>> {
        if type_name.is_empty() {
            return None;
        }
        Some(Box::new(DraftBuilder::new(type_name)))
    }
}

struct Parser<'a> {
    text: &'a str,
    chars: core::iter::Peekable<core::str::CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn node(&mut self) -> Option<NodeRc> {
        let name = self.name()?;
        let mut builder = DraftBuilder::new(name);

        if self.eat('(') {
            let data = self.quoted()?;
            builder.set_data(&data);
            if !self.eat(')') {
                return None;
            }
        }

        if self.eat('[') {
            let mut children = Vec::new();
            loop {
                children.push(self.node()?);
                if self.eat(',') {
                    continue;
                }
                if self.eat(']') {
                    break;
                }
                return None;
            }
            builder.set_children(children);
        }

        Some(Box::new(builder).create())
    }

    fn name(&mut self) -> Option<&'a str> {
        let start = self.chars.peek().map(|(i, _)| *i)?;
        let mut end = start;
        while let Some((i, c)) = self.chars.peek().copied() {
            if c.is_alphanumeric() || c == '_' {
                end = i + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        if end == start {
            return None;
        }
        Some(&self.text[start..end])
    }

    fn quoted(&mut self) -> Option<String> {
        if !self.eat('"') {
            return None;
        }
        let mut data = String::new();
        for (_, c) in self.chars.by_ref() {
            if c == '"' {
                return Some(data);
            }
            data.push(c);
        }
        None
    }

    fn eat(&mut self, expected: char) -> bool {
        if matches!(self.chars.peek(), Some((_, c)) if *c == expected) {
            self.chars.next();
            return true;
        }
        false
    }
}
