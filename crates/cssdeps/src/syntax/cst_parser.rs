use rowan::{GreenNode, GreenNodeBuilder};

use crate::syntax::{kind::SyntaxKind, lexer::Lexer};

/// Lossless recursive-descent parser for stylesheets.
///
/// The parser never fails: unexpected tokens are attached to the nearest
/// enclosing node, so the tree always serializes back to the exact input.
pub struct Parser<'a> {
    tokens: Vec<(SyntaxKind, &'a str)>,
    pos: usize,
    builder: GreenNodeBuilder<'static>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let tokens: Vec<_> = Lexer::new(input).collect();
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
        }
    }

    pub fn parse(mut self) -> GreenNode {
        self.start_node(SyntaxKind::Root);
        self.parse_root();
        self.finish_node();
        self.builder.finish()
    }

    fn start_node(
        &mut self,
        kind: SyntaxKind,
    ) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn parse_root(&mut self) {
        while !self.is_eof() {
            match self.peek() {
                SyntaxKind::Whitespace | SyntaxKind::Comment => self.bump(),
                SyntaxKind::AtKeyword => self.parse_at_rule(),
                // Stray terminators at the top level
                SyntaxKind::RBrace | SyntaxKind::Semicolon => self.bump(),
                _ => self.parse_rule(),
            }
        }
    }

    fn parse_at_rule(&mut self) {
        self.start_node(SyntaxKind::AtRule);
        self.bump(); // at-keyword

        self.start_node(SyntaxKind::AtRulePrelude);
        let mut depth = 0usize;
        while !self.is_eof() {
            match self.peek() {
                SyntaxKind::LParen | SyntaxKind::LBracket => depth += 1,
                SyntaxKind::RParen | SyntaxKind::RBracket => depth = depth.saturating_sub(1),
                SyntaxKind::Semicolon | SyntaxKind::LBrace | SyntaxKind::RBrace if depth == 0 => break,
                _ => {},
            }
            self.bump();
        }
        self.finish_node();

        match self.peek() {
            SyntaxKind::Semicolon => self.bump(),
            SyntaxKind::LBrace => self.parse_block(),
            // `}` belongs to the enclosing block
            _ => {},
        }

        self.finish_node();
    }

    fn parse_rule(&mut self) {
        self.start_node(SyntaxKind::Rule);

        self.start_node(SyntaxKind::Selector);
        let mut depth = 0usize;
        while !self.is_eof() {
            match self.peek() {
                SyntaxKind::LParen | SyntaxKind::LBracket => depth += 1,
                SyntaxKind::RParen | SyntaxKind::RBracket => depth = depth.saturating_sub(1),
                SyntaxKind::LBrace | SyntaxKind::RBrace if depth == 0 => break,
                SyntaxKind::Semicolon if depth == 0 => break,
                _ => {},
            }
            self.bump();
        }
        self.finish_node();

        match self.peek() {
            SyntaxKind::LBrace => self.parse_block(),
            SyntaxKind::Semicolon => self.bump(),
            _ => {},
        }

        self.finish_node();
    }

    fn parse_block(&mut self) {
        self.start_node(SyntaxKind::Block);
        self.bump(); // {

        while !self.is_eof() {
            match self.peek() {
                SyntaxKind::RBrace => {
                    self.bump();
                    break;
                },
                SyntaxKind::Whitespace | SyntaxKind::Comment | SyntaxKind::Semicolon => self.bump(),
                SyntaxKind::AtKeyword => self.parse_at_rule(),
                _ if self.at_declaration() => self.parse_declaration(),
                _ => self.parse_rule(),
            }
        }

        self.finish_node();
    }

    /// A word followed by a colon whose statement ends before any `{` at
    /// depth zero. `a:hover { ... }` is a nested rule, `color: red` is not.
    fn at_declaration(&self) -> bool {
        if !self.at(SyntaxKind::Word) {
            return false;
        }
        let Some(colon) = self.next_non_trivia(self.pos + 1) else {
            return false;
        };
        if self.tokens[colon].0 != SyntaxKind::Colon {
            return false;
        }

        let mut depth = 0usize;
        for &(kind, _) in &self.tokens[colon + 1..] {
            match kind {
                SyntaxKind::LParen | SyntaxKind::LBracket => depth += 1,
                SyntaxKind::RParen | SyntaxKind::RBracket => depth = depth.saturating_sub(1),
                SyntaxKind::LBrace if depth == 0 => return false,
                SyntaxKind::Semicolon | SyntaxKind::RBrace if depth == 0 => return true,
                _ => {},
            }
        }
        true
    }

    fn parse_declaration(&mut self) {
        self.start_node(SyntaxKind::Declaration);

        self.start_node(SyntaxKind::Property);
        self.bump();
        self.finish_node();

        self.skip_trivia();
        if self.at(SyntaxKind::Colon) {
            self.bump();
        }
        // Everything up to the first value token is the "between" zone.
        self.skip_trivia();

        let end = self.statement_end();
        let mut value_end = end;
        while value_end > self.pos && self.tokens[value_end - 1].0 == SyntaxKind::Whitespace {
            value_end -= 1;
        }

        if value_end > self.pos {
            self.start_node(SyntaxKind::Value);
            while self.pos < value_end {
                self.bump();
            }
            self.finish_node();
        }

        while self.pos < end {
            self.bump();
        }
        if self.at(SyntaxKind::Semicolon) {
            self.bump();
        }

        self.finish_node();
    }

    /// Index of the `;` or `}` ending the current statement, or EOF.
    fn statement_end(&self) -> usize {
        let mut depth = 0usize;
        for (index, &(kind, _)) in self.tokens.iter().enumerate().skip(self.pos) {
            match kind {
                SyntaxKind::LParen | SyntaxKind::LBracket | SyntaxKind::LBrace => depth += 1,
                SyntaxKind::RParen | SyntaxKind::RBracket => depth = depth.saturating_sub(1),
                SyntaxKind::RBrace if depth == 0 => return index,
                SyntaxKind::RBrace => depth -= 1,
                SyntaxKind::Semicolon if depth == 0 => return index,
                _ => {},
            }
        }
        self.tokens.len()
    }

    fn next_non_trivia(
        &self,
        from: usize,
    ) -> Option<usize> {
        (from..self.tokens.len()).find(|&index| !self.tokens[index].0.is_trivia())
    }

    fn skip_trivia(&mut self) {
        while !self.is_eof() && self.peek().is_trivia() {
            self.bump();
        }
    }

    fn peek(&self) -> SyntaxKind {
        self.tokens.get(self.pos).map(|(kind, _)| *kind).unwrap_or(SyntaxKind::Error)
    }

    fn at(
        &self,
        kind: SyntaxKind,
    ) -> bool {
        !self.is_eof() && self.peek() == kind
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn bump(&mut self) {
        if let Some((kind, text)) = self.tokens.get(self.pos) {
            self.builder.token((*kind).into(), text);
            self.pos += 1;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/syntax/cst_parser_tests.rs"]
mod tests;
