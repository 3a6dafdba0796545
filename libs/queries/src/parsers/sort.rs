//! Sort expression parser
//!
//! Comma-separated elements, each an optionally `-`-prefixed field chain or
//! `count(toManyChain)`. Chains are zero or more relationships followed by a
//! to-one relationship or attribute.

use std::sync::Arc;

use jsonapi_resource_graph::{ResourceGraph, ResourceType};

use crate::chain::FieldChain;
use crate::error::{Error, Result};
use crate::expression::{SortElement, SortExpression, SortTarget};
use crate::matcher::MatchOptions;
use crate::parsers::filter::hardcoded_pattern;
use crate::parsers::{resolve_field_chain, TokenCursor};
use crate::pattern::FieldChainPattern;
use crate::token::TokenKind;

/// Parser for `sort` parameter values.
pub struct SortParser {
    graph: Arc<ResourceGraph>,
    options: MatchOptions,
    /// Zero or more relationships, then a to-one relationship or attribute.
    sort_chain: FieldChainPattern,
    /// Zero or more relationships ending in a to-many relationship.
    count_chain: FieldChainPattern,
}

impl SortParser {
    pub fn new(graph: Arc<ResourceGraph>, options: MatchOptions) -> Self {
        Self {
            graph,
            options,
            sort_chain: hardcoded_pattern("R*[OA]"),
            count_chain: hardcoded_pattern("R*M"),
        }
    }

    pub fn parse(&self, value: &str, resource_type: &Arc<ResourceType>) -> Result<SortExpression> {
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
        Ok(SortExpression { elements })
    }

    fn parse_element(
        &self,
        cursor: &mut TokenCursor,
        resource_type: &Arc<ResourceType>,
    ) -> Result<SortElement> {
        let token = cursor.current().clone();
        if token.kind != TokenKind::Text {
            return Err(Error::QueryParse {
                message: "-, count function or field name expected.".to_string(),
                position: token.position,
            });
        }
        cursor.advance();

        let (ascending, text, offset) = match token.value.strip_prefix('-') {
            Some(rest) => (false, rest.to_string(), token.position + 1),
            None => (true, token.value.clone(), token.position),
        };
        if text.is_empty() {
            return Err(Error::QueryParse {
                message: "-, count function or field name expected.".to_string(),
                position: offset,
            });
        }

        let target = if text == "count" && cursor.current().kind == TokenKind::OpenParen {
            cursor.advance();
            let chain_token = cursor.expect(TokenKind::Text, "Field name")?;
            let chain = resolve_field_chain(
                &self.count_chain,
                &chain_token.value,
                chain_token.position,
                resource_type,
                &self.graph,
                self.options,
            )?;
            cursor.expect(TokenKind::CloseParen, ")")?;
            SortTarget::Count(chain)
        } else {
            let chain = resolve_field_chain(
                &self.sort_chain,
                &text,
                offset,
                resource_type,
                &self.graph,
                self.options,
            )?;
            ensure_sortable(&chain)?;
            SortTarget::Field(chain)
        };

        Ok(SortElement { target, ascending })
    }
}

fn ensure_sortable(chain: &FieldChain) -> Result<()> {
    if let Some(entry) = chain.last() {
        if let Some(attribute) = entry.field.as_attribute() {
            if !attribute.sortable {
                return Err(Error::SortNotAllowed {
                    attribute: attribute.name.clone(),
                    resource_type: entry.resource_type.name().to_string(),
                });
            }
        }
    }
    Ok(())
}
