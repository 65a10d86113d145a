use rowan::{Direction, TextRange};

use crate::syntax::cst::{SyntaxNode, SyntaxToken};
use crate::syntax::kind::SyntaxKind;

pub trait AstNode: Sized {
    fn cast(syntax: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn cast(syntax: SyntaxNode) -> Option<Self> {
                if syntax.kind() == SyntaxKind::$kind {
                    Some(Self { syntax })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

ast_node!(Root, Root);
ast_node!(AtRule, AtRule);
ast_node!(Block, Block);
ast_node!(Declaration, Declaration);
ast_node!(Value, Value);

impl Root {
    /// At-rules that are direct children of the stylesheet root.
    pub fn at_rules(&self) -> impl Iterator<Item = AtRule> {
        self.syntax.children().filter_map(AtRule::cast)
    }

    /// Every declaration in document order, at any depth.
    pub fn declarations(&self) -> impl Iterator<Item = Declaration> {
        self.syntax.descendants().filter_map(Declaration::cast)
    }
}

impl AtRule {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| token.kind() == SyntaxKind::AtKeyword)
    }

    /// The at-rule name without the leading `@`.
    pub fn name(&self) -> String {
        self.name_token()
            .map(|token| token.text().trim_start_matches('@').to_string())
            .unwrap_or_default()
    }

    pub fn block(&self) -> Option<Block> {
        self.syntax.children().find_map(Block::cast)
    }

    fn prelude(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|node| node.kind() == SyntaxKind::AtRulePrelude)
    }

    /// Whitespace and comments between the name and the parameters.
    pub fn after_name(&self) -> String {
        let Some(prelude) = self.prelude() else {
            return String::new();
        };
        prelude
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .take_while(|token| token.kind().is_trivia())
            .map(|token| token.text().to_string())
            .collect()
    }

    /// Parameter text with comments dropped and surrounding whitespace trimmed.
    pub fn params(&self) -> String {
        let Some(prelude) = self.prelude() else {
            return String::new();
        };
        let params: String = prelude
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .skip_while(|token| token.kind().is_trivia())
            .filter(|token| token.kind() != SyntaxKind::Comment)
            .map(|token| token.text().to_string())
            .collect();
        params.trim().to_string()
    }
}

impl Declaration {
    pub fn property(&self) -> String {
        self.syntax
            .children()
            .find(|node| node.kind() == SyntaxKind::Property)
            .map(|node| node.text().to_string())
            .unwrap_or_default()
    }

    pub fn value(&self) -> Option<Value> {
        self.syntax.children().find_map(Value::cast)
    }

    /// Raw text between the property name and the value: the colon plus
    /// any whitespace and comments around it.
    pub fn between(&self) -> String {
        self.syntax
            .children_with_tokens()
            .skip_while(|element| element.kind() != SyntaxKind::Property)
            .skip(1)
            .take_while(|element| element.kind() != SyntaxKind::Value && element.kind() != SyntaxKind::Semicolon)
            .filter_map(|element| element.into_token())
            .map(|token| token.text().to_string())
            .collect()
    }
}

impl Value {
    pub fn text(&self) -> String {
        self.syntax.text().to_string()
    }

    pub fn text_range(&self) -> TextRange {
        self.syntax.text_range()
    }
}

/// The comment immediately preceding `node`, skipping only whitespace.
pub fn previous_comment(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.siblings_with_tokens(Direction::Prev)
        .skip(1)
        .find(|element| element.kind() != SyntaxKind::Whitespace)
        .and_then(|element| element.into_token())
        .filter(|token| token.kind() == SyntaxKind::Comment)
}

#[cfg(test)]
#[path = "../../tests/src/syntax/ast_tests.rs"]
mod tests;
