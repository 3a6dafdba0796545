//! Sort parameter reader
//!
//! Accepts `sort` and `sort[<scope>]`. Repeated occurrences append to the
//! same scope's element list, so `sort=name&sort=-createdAt` orders by
//! `name` ascending, then `createdAt` descending.

use crate::chain::FieldChain;
use crate::error::{Error, Result};
use crate::expression::{ExpressionInScope, QueryExpression, SortElement, SortExpression};
use crate::parsers::SortParser;
use crate::readers::{DisabledParameters, QueryStringReader, ReaderContext, RequestKind};
use crate::scope::parse_scope;

const INVALID_SORT: &str = "The specified sort is invalid.";

pub struct SortReader {
    context: ReaderContext,
    parser: SortParser,
    /// Sort elements grouped by scope, in first-encounter order.
    groups: Vec<(Option<FieldChain>, Vec<SortElement>)>,
}

impl SortReader {
    pub fn new(context: ReaderContext) -> Self {
        let parser = SortParser::new(context.graph.clone(), context.match_options);
        Self {
            context,
            parser,
            groups: Vec::new(),
        }
    }

    fn read_parameter(&mut self, name: &str, value: &str) -> Result<()> {
        let scope = parse_scope(
            name,
            "sort",
            &self.context.resource_type,
            &self.context.graph,
            self.context.match_options,
        )?;
        if scope.is_none() && self.context.request_kind == RequestKind::SingleResource {
            return Err(Error::CollectionEndpointRequired {
                parameter: name.to_string(),
            });
        }

        let target = match &scope {
            Some(chain) => chain
                .tail_type(&self.context.graph)
                .ok_or_else(|| Error::QueryParse {
                    message: "Related resource type could not be resolved.".to_string(),
                    position: 0,
                })?,
            None => self.context.resource_type.clone(),
        };
        let expression = self.parser.parse(value, &target)?;

        match self.groups.iter_mut().find(|(existing, _)| *existing == scope) {
            Some((_, elements)) => elements.extend(expression.elements),
            None => self.groups.push((scope, expression.elements)),
        }
        Ok(())
    }
}

impl QueryStringReader for SortReader {
    fn can_read(&self, parameter_name: &str) -> bool {
        parameter_name == "sort"
            || (parameter_name.starts_with("sort[") && parameter_name.ends_with(']'))
    }

    fn is_enabled(&self, disabled: DisabledParameters) -> bool {
        !disabled.contains(DisabledParameters::SORT)
    }

    fn read(&mut self, parameter_name: &str, parameter_value: &str) -> Result<()> {
        self.read_parameter(parameter_name, parameter_value)
            .map_err(|error| error.into_invalid_query_string(parameter_name, INVALID_SORT))
    }

    fn constraints(&self) -> Vec<ExpressionInScope> {
        self.groups
            .iter()
            .map(|(scope, elements)| ExpressionInScope {
                scope: scope.clone(),
                expression: QueryExpression::Sort(SortExpression {
                    elements: elements.clone(),
                }),
            })
            .collect()
    }
}
