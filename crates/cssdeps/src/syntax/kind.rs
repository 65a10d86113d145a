use logos::Logos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Tokens
    Error = 0,
    Whitespace,
    Comment,

    // Literals
    String,
    Url,
    AtKeyword,
    Word,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Colon,
    Comma,
    Slash,
    Delim,

    // Composite Nodes (Parser output)
    Root,
    AtRule,
    AtRulePrelude,
    Rule,
    Selector,
    Block,
    Declaration,
    Property,
    Value,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::Whitespace | SyntaxKind::Comment)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(error = ())]
pub enum TokenKind {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    // Unterminated comments run to the end of input.
    #[regex(r"/\*([^*]|\*+[^*/])*\**")]
    BadComment,

    #[regex(r#""([^"\\\r\n\f]|\\[^\r]|\\\r\n?)*""#)]
    #[regex(r#"'([^'\\\r\n\f]|\\[^\r]|\\\r\n?)*'"#)]
    String,

    // Unterminated strings stop at the end of the line.
    #[regex(r#""([^"\\\r\n\f]|\\[^\r]|\\\r\n?)*"#)]
    #[regex(r#"'([^'\\\r\n\f]|\\[^\r]|\\\r\n?)*"#)]
    BadString,

    // Unquoted `url(...)` is a single token so that `;`, `{` or `}` inside a
    // data URI never end a statement.
    #[regex(r#"[uU][rR][lL]\([ \t\r\n\f]*([^"'()\\ \t\r\n\f]|\\[^\r\n\f])+[ \t\r\n\f]*\)"#)]
    Url,

    #[regex(r"@-?([a-zA-Z_]|[^\x00-\x7F]|\\[^\r\n\f])([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[^\r\n\f])*")]
    AtKeyword,

    #[regex(r#"([^ \t\r\n\f"'()\[\]{};:,/@\\]|\\[^\r\n\f])+"#)]
    Word,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token("/")]
    Slash,
    #[token("@")]
    #[token("\\")]
    Delim,
}

impl From<TokenKind> for SyntaxKind {
    fn from(token: TokenKind) -> Self {
        match token {
            TokenKind::Whitespace => SyntaxKind::Whitespace,
            TokenKind::Comment | TokenKind::BadComment => SyntaxKind::Comment,
            TokenKind::String | TokenKind::BadString => SyntaxKind::String,
            TokenKind::Url => SyntaxKind::Url,
            TokenKind::AtKeyword => SyntaxKind::AtKeyword,
            TokenKind::Word => SyntaxKind::Word,
            TokenKind::LParen => SyntaxKind::LParen,
            TokenKind::RParen => SyntaxKind::RParen,
            TokenKind::LBrace => SyntaxKind::LBrace,
            TokenKind::RBrace => SyntaxKind::RBrace,
            TokenKind::LBracket => SyntaxKind::LBracket,
            TokenKind::RBracket => SyntaxKind::RBracket,
            TokenKind::Semicolon => SyntaxKind::Semicolon,
            TokenKind::Colon => SyntaxKind::Colon,
            TokenKind::Comma => SyntaxKind::Comma,
            TokenKind::Slash => SyntaxKind::Slash,
            TokenKind::Delim => SyntaxKind::Delim,
        }
    }
}
