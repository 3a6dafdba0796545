//! Scope resolution
//!
//! Determines which relationship-chain scope a parameter applies to. A
//! bracketed parameter name such as `filter[children.orders]` scopes the
//! expression to a nested to-many collection; without brackets the
//! expression applies at the request's root (the global scope).

use std::sync::Arc;

use jsonapi_resource_graph::{ResourceGraph, ResourceType};

use crate::chain::FieldChain;
use crate::error::Result;
use crate::expression::{IncludeElement, IncludeExpression};
use crate::matcher::MatchOptions;
use crate::parsers::filter::hardcoded_pattern;
use crate::parsers::resolve_field_chain;

/// Parse the scope out of a bracketed parameter name.
///
/// `name` is the full parameter name, `family` its unbracketed form (e.g.
/// `sort` for `sort[children]`). Every scope segment must be a to-many
/// relationship; failures carry a position into the bracket content.
pub fn parse_scope(
    name: &str,
    family: &str,
    resource_type: &Arc<ResourceType>,
    graph: &ResourceGraph,
    options: MatchOptions,
) -> Result<Option<FieldChain>> {
    let content = name
        .strip_prefix(family)
        .and_then(|rest| rest.strip_prefix('['))
        .and_then(|rest| rest.strip_suffix(']'));
    let Some(content) = content else {
        return Ok(None);
    };

    let chain = resolve_field_chain(
        &hardcoded_pattern("M*"),
        content,
        0,
        resource_type,
        graph,
        options,
    )?;
    Ok(Some(chain))
}

/// Expand an include tree into every concrete relationship chain it denotes,
/// one per root-to-leaf path, in tree order.
pub fn relationship_chains(include: &IncludeExpression) -> Vec<FieldChain> {
    let mut chains = Vec::new();
    let prefix = FieldChain::default();
    for element in &include.elements {
        collect_chains(element, &prefix, &mut chains);
    }
    chains
}

fn collect_chains(element: &IncludeElement, prefix: &FieldChain, chains: &mut Vec<FieldChain>) {
    let mut chain = prefix.clone();
    chain.push(element.relationship.clone());
    if element.children.is_empty() {
        chains.push(chain);
        return;
    }
    for child in &element.children {
        collect_chains(child, &chain, chains);
    }
}
