//! The token definition for PQL text.

/// A token is a single unit of the language, with a specific kind and location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub span: Span,
}

/// The kind of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'a> {
    // Literals
    Identifier(&'a str), // Call names and dotted field references, e.g. `donor.gender`
    String(String),      // Quoted string with escapes resolved
    Integer(i64),
    Decimal(f64),

    // Punctuation
    LParen, // (
    RParen, // )
    Comma,  // ,
    Star,   // *
    Plus,   // +
    Dash,   // -

    // Special
    Illegal, // An illegal/unknown character, or an unterminated string
}

impl TokenKind<'_> {
    /// Short human-readable description used in parse error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Identifier(s) => format!("identifier '{}'", s),
            TokenKind::String(s) => format!("string \"{}\"", s),
            TokenKind::Integer(n) => format!("number {}", n),
            TokenKind::Decimal(n) => format!("number {}", n),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Dash => "'-'".to_string(),
            TokenKind::Illegal => "illegal input".to_string(),
        }
    }
}

/// Represents a span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// The starting byte offset.
    pub start: usize,
    /// The ending byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}
