//! Query expression lexer - tokenizes literal parameter values
//!
//! Converts a query parameter value into a stream of tokens for the
//! recursive descent parsers. The grammar is deliberately small: text runs,
//! single-quoted literals and the `(` `)` `,` delimiters. Whitespace is never
//! skipped; it stays inside text runs so field chain matching reports stray
//! whitespace at the exact character.

use crate::error::{Error, Result};
use crate::token::{Token, TokenKind};

/// The query expression lexer
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the whole input, appending a trailing Eof token.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(c) = self.current() {
            let token = match c {
                '(' => self.single(TokenKind::OpenParen),
                ')' => self.single(TokenKind::CloseParen),
                ',' => self.single(TokenKind::Comma),
                '\'' => self.read_quoted_text()?,
                _ => self.read_text(),
            };
            tokens.push(token);
        }
        tokens.push(Token::eof(self.position));
        Ok(tokens)
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let position = self.position;
        let value = self.chars[position].to_string();
        self.position += 1;
        Token::new(kind, value, position)
    }

    /// Read an unquoted text run up to the next delimiter.
    fn read_text(&mut self) -> Token {
        let start = self.position;
        while let Some(c) = self.current() {
            if matches!(c, '(' | ')' | ',' | '\'') {
                break;
            }
            self.position += 1;
        }
        let value: String = self.chars[start..self.position].iter().collect();
        Token::new(TokenKind::Text, value, start)
    }

    /// Read a single-quoted literal: `'...'` with `''` escaping one quote.
    fn read_quoted_text(&mut self) -> Result<Token> {
        let start = self.position;
        self.position += 1; // Skip opening quote

        let mut value = String::new();
        while let Some(c) = self.current() {
            if c == '\'' {
                if self.peek() == Some('\'') {
                    value.push('\'');
                    self.position += 2;
                } else {
                    self.position += 1; // Skip closing quote
                    return Ok(Token::new(TokenKind::QuotedText, value, start));
                }
            } else {
                value.push(c);
                self.position += 1;
            }
        }

        Err(Error::QueryParse {
            message: "Unterminated quoted text.".to_string(),
            position: start,
        })
    }
}
