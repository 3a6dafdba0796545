//! Filter parameter reader
//!
//! Accepts `filter` and `filter[<scope>]`, accumulating expressions per
//! scope. Repeated occurrences targeting the same scope are alternatives
//! and combine into a single `or(...)` expression.

use crate::chain::FieldChain;
use crate::error::{Error, Result};
use crate::expression::{
    ExpressionInScope, FilterExpression, LogicalOperator, QueryExpression,
};
use crate::legacy;
use crate::parsers::FilterParser;
use crate::readers::{DisabledParameters, QueryStringReader, ReaderContext, RequestKind};
use crate::scope::parse_scope;

const INVALID_FILTER: &str = "The specified filter is invalid.";

pub struct FilterReader {
    context: ReaderContext,
    parser: FilterParser,
    /// Expressions grouped by scope, in first-encounter order.
    groups: Vec<(Option<FieldChain>, Vec<FilterExpression>)>,
}

impl FilterReader {
    pub fn new(context: ReaderContext) -> Self {
        let parser = FilterParser::new(context.graph.clone(), context.match_options);
        Self {
            context,
            parser,
            groups: Vec::new(),
        }
    }

    fn read_parameter(&mut self, name: &str, value: &str) -> Result<()> {
        if self.context.legacy_filter_notation {
            for condition in legacy::extract_conditions(value) {
                let (converted_name, converted_value) = legacy::convert(name, condition)?;
                self.read_expression(&converted_name, &converted_value)?;
            }
            Ok(())
        } else {
            self.read_expression(name, value)
        }
    }

    fn read_expression(&mut self, name: &str, value: &str) -> Result<()> {
        let scope = parse_scope(
            name,
            "filter",
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
            Some((_, expressions)) => expressions.push(expression),
            None => self.groups.push((scope, vec![expression])),
        }
        Ok(())
    }
}

impl QueryStringReader for FilterReader {
    fn can_read(&self, parameter_name: &str) -> bool {
        parameter_name == "filter"
            || (parameter_name.starts_with("filter[") && parameter_name.ends_with(']'))
    }

    fn is_enabled(&self, disabled: DisabledParameters) -> bool {
        !disabled.contains(DisabledParameters::FILTER)
    }

    fn read(&mut self, parameter_name: &str, parameter_value: &str) -> Result<()> {
        self.read_parameter(parameter_name, parameter_value)
            .map_err(|error| error.into_invalid_query_string(parameter_name, INVALID_FILTER))
    }

    fn constraints(&self) -> Vec<ExpressionInScope> {
        self.groups
            .iter()
            .map(|(scope, expressions)| {
                let expression = if expressions.len() == 1 {
                    expressions[0].clone()
                } else {
                    FilterExpression::Logical {
                        operator: LogicalOperator::Or,
                        terms: expressions.clone(),
                    }
                };
                ExpressionInScope {
                    scope: scope.clone(),
                    expression: QueryExpression::Filter(expression),
                }
            })
            .collect()
    }
}
