//! Recursive descent parsers for the query parameter grammars
//!
//! One parser per parameter family, all driven by the shared lexer through
//! [`TokenCursor`]. Field references inside any grammar are resolved through
//! the pattern matcher; match failures are re-anchored at the token's
//! position so that every error points into the original parameter value.

pub mod filter;
pub mod include;
pub mod pagination;
pub mod sort;
pub mod sparse_fields;

pub use filter::FilterParser;
pub use include::IncludeParser;
pub use pagination::{PageElement, PaginationParser};
pub use sort::SortParser;
pub use sparse_fields::SparseFieldSetParser;

use std::sync::Arc;

use jsonapi_resource_graph::{ResourceGraph, ResourceType};

use crate::chain::FieldChain;
use crate::error::{Error, Result};
use crate::lexer::Lexer;
use crate::matcher::{match_field_chain, MatchOptions};
use crate::pattern::FieldChainPattern;
use crate::token::{Token, TokenKind};

/// Cursor over the token stream of one parameter value.
pub(crate) struct TokenCursor {
    tokens: Vec<Token>,
    index: usize,
}

impl TokenCursor {
    pub fn new(value: &str) -> Result<Self> {
        Ok(Self {
            tokens: Lexer::new(value).tokenize()?,
            index: 0,
        })
    }

    /// The current token; the trailing Eof token is never consumed, so this
    /// cannot run off the end.
    pub fn current(&self) -> &Token {
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    /// The token after the current one.
    pub fn peek(&self) -> &Token {
        &self.tokens[(self.index + 1).min(self.tokens.len() - 1)]
    }

    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
        token
    }

    pub fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token> {
        if self.current().kind == kind {
            Ok(self.advance())
        } else {
            Err(Error::QueryParse {
                message: format!("{expected} expected."),
                position: self.current().position,
            })
        }
    }

    pub fn expect_end(&self) -> Result<()> {
        if self.current().kind == TokenKind::Eof {
            Ok(())
        } else {
            Err(Error::QueryParse {
                message: "End of expression expected.".to_string(),
                position: self.current().position,
            })
        }
    }
}

/// Resolve dotted field-chain text through the matcher, shifting the failure
/// position by the chain's offset inside the parameter value.
pub(crate) fn resolve_field_chain(
    pattern: &FieldChainPattern,
    chain_text: &str,
    offset: usize,
    resource_type: &Arc<ResourceType>,
    graph: &ResourceGraph,
    options: MatchOptions,
) -> Result<FieldChain> {
    match_field_chain(pattern, chain_text, resource_type, graph, options).map_err(|failure| {
        Error::QueryParse {
            message: failure.message,
            position: offset + failure.position,
        }
    })
}
