//! Tokenizer and walker for single property values and at-rule parameters.
//!
//! Produces a small tree of words, strings, spaces, comments, dividers and
//! functions, stored in an arena so that nodes can be addressed by
//! [`NodeId`] and rewritten in place after a read-only walk. Serializing the
//! tree with [`ValueTree::stringify`] reproduces the input exactly.
//!
//! `url(` functions whose argument is not quoted hold their whole argument as
//! a single opaque [`ValueKind::Word`].

mod parser;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Word,
    UnicodeRange,
    Space,
    String {
        quote: char,
        unclosed: bool,
    },
    Comment {
        unclosed: bool,
    },
    /// `,`, `/` or `:` together with the whitespace around it.
    Div {
        before: String,
        after: String,
    },
    /// A function call; the node's value is the function name, which is
    /// empty for plain parentheses.
    Function {
        before: String,
        after: String,
        unclosed: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueNode {
    pub kind: ValueKind,
    pub value: String,
    children: Vec<NodeId>,
}

impl ValueNode {
    fn leaf(
        kind: ValueKind,
        value: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            value: value.into(),
            children: Vec::new(),
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, ValueKind::Function { .. })
    }

    pub fn is_string(&self) -> bool {
        matches!(self.kind, ValueKind::String { .. })
    }

    pub fn is_function_named(
        &self,
        name: &str,
    ) -> bool {
        self.is_function() && self.value.eq_ignore_ascii_case(name)
    }
}

/// Whether [`ValueTree::walk`] descends into a function's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    Skip,
}

#[derive(Clone, PartialEq, Eq, Default)]
pub struct ValueTree {
    nodes: Vec<ValueNode>,
    roots: Vec<NodeId>,
}

impl ValueTree {
    pub fn parse(input: &str) -> Self {
        parser::ValueParser::new(input).parse()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(
        &self,
        id: NodeId,
    ) -> &ValueNode {
        &self.nodes[id.0]
    }

    pub fn children(
        &self,
        id: NodeId,
    ) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Depth-first walk over all nodes. The callback receives the node, its
    /// index among its siblings and the sibling list; returning
    /// [`Walk::Skip`] keeps the walk out of that node's children.
    pub fn walk<F>(
        &self,
        mut visit: F,
    ) where
        F: FnMut(&ValueTree, NodeId, usize, &[NodeId]) -> Walk,
    {
        self.walk_nodes(&self.roots, &mut visit);
    }

    fn walk_nodes<F>(
        &self,
        ids: &[NodeId],
        visit: &mut F,
    ) where
        F: FnMut(&ValueTree, NodeId, usize, &[NodeId]) -> Walk,
    {
        for (index, &id) in ids.iter().enumerate() {
            if visit(self, id, index, ids) == Walk::Skip {
                continue;
            }
            let node = self.node(id);
            if node.is_function() {
                self.walk_nodes(&node.children, visit);
            }
        }
    }

    /// Turn `id` into a bare word holding `text`, dropping any children.
    pub fn replace_with_word(
        &mut self,
        id: NodeId,
        text: &str,
    ) {
        let node = &mut self.nodes[id.0];
        node.kind = ValueKind::Word;
        node.value = text.to_string();
        node.children.clear();
    }

    pub fn stringify(&self) -> String {
        self.stringify_nodes(&self.roots)
    }

    pub fn stringify_nodes(
        &self,
        ids: &[NodeId],
    ) -> String {
        let mut out = String::new();
        for &id in ids {
            self.write_node(id, &mut out);
        }
        out
    }

    fn write_node(
        &self,
        id: NodeId,
        out: &mut String,
    ) {
        let node = self.node(id);
        match &node.kind {
            ValueKind::Word | ValueKind::UnicodeRange | ValueKind::Space => out.push_str(&node.value),
            ValueKind::String {
                quote,
                unclosed,
            } => {
                out.push(*quote);
                out.push_str(&node.value);
                if !unclosed {
                    out.push(*quote);
                }
            },
            ValueKind::Comment {
                unclosed,
            } => {
                out.push_str("/*");
                out.push_str(&node.value);
                if !unclosed {
                    out.push_str("*/");
                }
            },
            ValueKind::Div {
                before,
                after,
            } => {
                out.push_str(before);
                out.push_str(&node.value);
                out.push_str(after);
            },
            ValueKind::Function {
                before,
                after,
                unclosed,
            } => {
                out.push_str(&node.value);
                out.push('(');
                out.push_str(before);
                for &child in &node.children {
                    self.write_node(child, out);
                }
                out.push_str(after);
                if !unclosed {
                    out.push(')');
                }
            },
        }
    }

    fn push(
        &mut self,
        node: ValueNode,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn write_debug(
        &self,
        ids: &[NodeId],
        depth: usize,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for &id in ids {
            let node = self.node(id);
            let indent = "  ".repeat(depth);
            match &node.kind {
                ValueKind::Word => writeln!(f, "{indent}Word {:?}", node.value)?,
                ValueKind::UnicodeRange => writeln!(f, "{indent}UnicodeRange {:?}", node.value)?,
                ValueKind::Space => writeln!(f, "{indent}Space {:?}", node.value)?,
                ValueKind::String {
                    quote,
                    unclosed,
                } => {
                    let suffix = if *unclosed { " unclosed" } else { "" };
                    writeln!(f, "{indent}String {quote} {:?}{suffix}", node.value)?;
                },
                ValueKind::Comment {
                    ..
                } => writeln!(f, "{indent}Comment {:?}", node.value)?,
                ValueKind::Div {
                    before,
                    after,
                } => writeln!(f, "{indent}Div {:?} before={before:?} after={after:?}", node.value)?,
                ValueKind::Function {
                    before,
                    after,
                    unclosed,
                } => {
                    let suffix = if *unclosed { " unclosed" } else { "" };
                    writeln!(f, "{indent}Function {:?} before={before:?} after={after:?}{suffix}", node.value)?;
                    self.write_debug(&node.children, depth + 1, f)?;
                },
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ValueTree {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        self.write_debug(&self.roots, 0, f)
    }
}

#[cfg(test)]
#[path = "../../tests/src/value/value_tests.rs"]
mod tests;
