//! Include expression parser
//!
//! Comma-separated dotted relationship chains, merged into a single tree so
//! `children.parent,children.revisions` shares the `children` node.

use std::sync::Arc;

use jsonapi_resource_graph::{ResourceGraph, ResourceType};

use crate::chain::ResolvedField;
use crate::error::Result;
use crate::expression::{IncludeElement, IncludeExpression};
use crate::matcher::MatchOptions;
use crate::parsers::filter::hardcoded_pattern;
use crate::parsers::{resolve_field_chain, TokenCursor};
use crate::pattern::FieldChainPattern;
use crate::token::TokenKind;

/// Parser for `include` parameter values.
pub struct IncludeParser {
    graph: Arc<ResourceGraph>,
    options: MatchOptions,
    /// One or more relationships of either kind.
    relationship_chain: FieldChainPattern,
}

impl IncludeParser {
    pub fn new(graph: Arc<ResourceGraph>, options: MatchOptions) -> Self {
        Self {
            graph,
            options,
            relationship_chain: hardcoded_pattern("R+"),
        }
    }

    pub fn parse(&self, value: &str, resource_type: &Arc<ResourceType>) -> Result<IncludeExpression> {
        let mut expression = IncludeExpression::default();
        if value.is_empty() {
            return Ok(expression);
        }

        let mut cursor = TokenCursor::new(value)?;
        loop {
            let token = cursor.expect(TokenKind::Text, "Relationship name")?;
            let chain = resolve_field_chain(
                &self.relationship_chain,
                &token.value,
                token.position,
                resource_type,
                &self.graph,
                self.options,
            )?;
            merge_chain(&mut expression.elements, chain.fields());

            if cursor.current().kind == TokenKind::Comma {
                cursor.advance();
            } else {
                break;
            }
        }
        cursor.expect_end()?;
        Ok(expression)
    }
}

/// Merge one resolved chain into the include tree.
pub(crate) fn merge_chain(elements: &mut Vec<IncludeElement>, fields: &[ResolvedField]) {
    let Some((first, rest)) = fields.split_first() else {
        return;
    };

    let existing = elements.iter_mut().find(|element| {
        element.relationship.field.name() == first.field.name()
            && element.relationship.resource_type.name() == first.resource_type.name()
    });
    match existing {
        Some(element) => merge_chain(&mut element.children, rest),
        None => {
            let mut element = IncludeElement {
                relationship: first.clone(),
                children: Vec::new(),
            };
            merge_chain(&mut element.children, rest);
            elements.push(element);
        }
    }
}
