pub mod ast;
pub mod cst;
pub mod cst_parser;
pub mod kind;
pub mod lexer;

use std::sync::Arc;

use crate::syntax::ast::{AstNode, Root};
use crate::syntax::cst::SyntaxNode;
use crate::syntax::cst_parser::Parser;

/// Immutable syntax snapshot of one stylesheet.
#[derive(Clone)]
pub struct Stylesheet {
    green: rowan::GreenNode,
    source: Arc<str>,
}

impl Stylesheet {
    pub fn parse(source: &str) -> Self {
        let parser = Parser::new(source);
        let green = parser.parse();
        Self {
            green,
            source: Arc::from(source),
        }
    }

    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn root(&self) -> Root {
        Root::cast(self.syntax()).expect("parser always produces a Root node")
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}
