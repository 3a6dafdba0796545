//! Sparse field set parser
//!
//! Comma-separated attribute/relationship names, each resolved as a single
//! field on the bracketed resource type.

use std::sync::Arc;

use jsonapi_resource_graph::{ResourceGraph, ResourceType};

use crate::chain::ResolvedField;
use crate::error::{Error, Result};
use crate::matcher::MatchOptions;
use crate::parsers::filter::hardcoded_pattern;
use crate::parsers::{resolve_field_chain, TokenCursor};
use crate::pattern::FieldChainPattern;
use crate::token::TokenKind;

/// Parser for `fields[<resourceType>]` parameter values.
pub struct SparseFieldSetParser {
    graph: Arc<ResourceGraph>,
    options: MatchOptions,
    /// Exactly one field of any kind.
    field_pattern: FieldChainPattern,
}

impl SparseFieldSetParser {
    pub fn new(graph: Arc<ResourceGraph>, options: MatchOptions) -> Self {
        Self {
            graph,
            options,
            field_pattern: hardcoded_pattern("F"),
        }
    }

    pub fn parse(
        &self,
        value: &str,
        resource_type: &Arc<ResourceType>,
    ) -> Result<Vec<ResolvedField>> {
        let mut cursor = TokenCursor::new(value)?;
        let mut fields: Vec<ResolvedField> = Vec::new();
        loop {
            let token = cursor.expect(TokenKind::Text, "Field name")?;
            let chain = resolve_field_chain(
                &self.field_pattern,
                &token.value,
                token.position,
                resource_type,
                &self.graph,
                self.options,
            )?;
            let entry = chain.last().ok_or(Error::QueryParse {
                message: "Field name expected.".to_string(),
                position: token.position,
            })?;
            if !fields.iter().any(|field| field.field.name() == entry.field.name()) {
                fields.push(entry.clone());
            }

            if cursor.current().kind == TokenKind::Comma {
                cursor.advance();
            } else {
                break;
            }
        }
        cursor.expect_end()?;
        Ok(fields)
    }
}
