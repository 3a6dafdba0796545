//! Token types for the query expression lexer
//!
//! Tokens represent the lexical elements of the function-call style query
//! grammar shared by the filter and sort parsers.

/// Token types for the query expression lexer
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    /// An unquoted run of text: function names, field chains, numbers,
    /// `null`. Whitespace is preserved inside the run so that field chain
    /// matching can reject it with a precise position.
    Text,
    /// A single-quoted literal; `''` escapes one quote.
    QuotedText,
    OpenParen,  // (
    CloseParen, // )
    Comma,      // ,
    /// End of input
    Eof,
}

/// A token in a query expression
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// Token text with quotes stripped and escapes resolved.
    pub value: String,
    /// Zero-based character position of the token's first character.
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: String, position: usize) -> Self {
        Self {
            kind,
            value,
            position,
        }
    }

    pub fn eof(position: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            value: String::new(),
            position,
        }
    }
}
