//! Pagination value parser
//!
//! A `page[size]` or `page[number]` value holds comma-separated elements,
//! each a positive integer optionally prefixed by a to-many relationship
//! chain and a colon: `10,children:5` sets the top-level value and the value
//! for the nested `children` collection.

use std::sync::Arc;

use jsonapi_resource_graph::{ResourceGraph, ResourceType};

use crate::chain::FieldChain;
use crate::error::{Error, Result};
use crate::matcher::MatchOptions;
use crate::parsers::filter::hardcoded_pattern;
use crate::parsers::{resolve_field_chain, TokenCursor};
use crate::pattern::FieldChainPattern;
use crate::token::TokenKind;

/// One pagination element: the scope it applies to and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct PageElement {
    /// `None` targets the request's root collection.
    pub scope: Option<FieldChain>,
    pub value: u32,
}

/// Parser for `page[size]` and `page[number]` parameter values.
pub struct PaginationParser {
    graph: Arc<ResourceGraph>,
    options: MatchOptions,
    /// One or more to-many relationships.
    scope_chain: FieldChainPattern,
}

impl PaginationParser {
    pub fn new(graph: Arc<ResourceGraph>, options: MatchOptions) -> Self {
        Self {
            graph,
            options,
            scope_chain: hardcoded_pattern("M+"),
        }
    }

    pub fn parse(&self, value: &str, resource_type: &Arc<ResourceType>) -> Result<Vec<PageElement>> {
        let mut cursor = TokenCursor::new(value)?;
        let mut elements = Vec::new();
        loop {
            elements.push(self.parse_element(&mut cursor, resource_type)?);
            if cursor.current().kind == TokenKind::Comma {
                cursor.advance();
            } else {
                break;
            }
        }
        cursor.expect_end()?;
        Ok(elements)
    }

    fn parse_element(
        &self,
        cursor: &mut TokenCursor,
        resource_type: &Arc<ResourceType>,
    ) -> Result<PageElement> {
        let token = cursor.current().clone();
        if token.kind != TokenKind::Text {
            return Err(Error::QueryParse {
                message: "Number or relationship name expected.".to_string(),
                position: token.position,
            });
        }
        cursor.advance();

        let (scope, number_text, number_offset) = match token.value.rsplit_once(':') {
            Some((chain_text, number_text)) => {
                let chain = resolve_field_chain(
                    &self.scope_chain,
                    chain_text,
                    token.position,
                    resource_type,
                    &self.graph,
                    self.options,
                )?;
                let offset = token.position + chain_text.chars().count() + 1;
                (Some(chain), number_text.to_string(), offset)
            }
            None => (None, token.value.clone(), token.position),
        };

        let value = number_text
            .parse::<u32>()
            .ok()
            .filter(|number| *number >= 1)
            .ok_or(Error::QueryParse {
                message: "Positive number expected.".to_string(),
                position: number_offset,
            })?;

        Ok(PageElement { scope, value })
    }
}
