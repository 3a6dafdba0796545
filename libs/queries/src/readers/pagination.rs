//! Pagination parameter reader
//!
//! Accepts `page[size]` and `page[number]`. Each value carries one or more
//! scoped elements (`10,children:5`); when the same scope is set twice, the
//! later occurrence wins.

use crate::chain::FieldChain;
use crate::error::{Error, Result};
use crate::expression::{ExpressionInScope, PaginationExpression, QueryExpression};
use crate::parsers::{PageElement, PaginationParser};
use crate::readers::{DisabledParameters, QueryStringReader, ReaderContext, RequestKind};

const INVALID_PAGINATION: &str = "The specified pagination is invalid.";

pub struct PaginationReader {
    context: ReaderContext,
    parser: PaginationParser,
    /// Per-scope values, in first-encounter order. Later writes to an
    /// existing scope replace the stored value.
    sizes: Vec<(Option<FieldChain>, u32)>,
    numbers: Vec<(Option<FieldChain>, u32)>,
}

impl PaginationReader {
    pub fn new(context: ReaderContext) -> Self {
        let parser = PaginationParser::new(context.graph.clone(), context.match_options);
        Self {
            context,
            parser,
            sizes: Vec::new(),
            numbers: Vec::new(),
        }
    }

    fn read_parameter(&mut self, name: &str, value: &str) -> Result<()> {
        let elements = self.parser.parse(value, &self.context.resource_type)?;
        for element in elements {
            if element.scope.is_none()
                && self.context.request_kind == RequestKind::SingleResource
            {
                return Err(Error::CollectionEndpointRequired {
                    parameter: name.to_string(),
                });
            }
            if name == "page[size]" {
                store(&mut self.sizes, element);
            } else {
                store(&mut self.numbers, element);
            }
        }
        Ok(())
    }
}

fn store(entries: &mut Vec<(Option<FieldChain>, u32)>, element: PageElement) {
    match entries.iter_mut().find(|(scope, _)| *scope == element.scope) {
        Some((_, value)) => *value = element.value,
        None => entries.push((element.scope, element.value)),
    }
}

impl QueryStringReader for PaginationReader {
    fn can_read(&self, parameter_name: &str) -> bool {
        parameter_name == "page[size]" || parameter_name == "page[number]"
    }

    fn is_enabled(&self, disabled: DisabledParameters) -> bool {
        !disabled.contains(DisabledParameters::PAGE)
    }

    fn read(&mut self, parameter_name: &str, parameter_value: &str) -> Result<()> {
        self.read_parameter(parameter_name, parameter_value)
            .map_err(|error| error.into_invalid_query_string(parameter_name, INVALID_PAGINATION))
    }

    fn constraints(&self) -> Vec<ExpressionInScope> {
        let mut scopes: Vec<Option<FieldChain>> = Vec::new();
        for (scope, _) in self.sizes.iter().chain(self.numbers.iter()) {
            if !scopes.contains(scope) {
                scopes.push(scope.clone());
            }
        }

        scopes
            .into_iter()
            .map(|scope| {
                let lookup = |entries: &[(Option<FieldChain>, u32)]| {
                    entries
                        .iter()
                        .find(|(entry_scope, _)| *entry_scope == scope)
                        .map(|(_, value)| *value)
                };
                let expression = PaginationExpression {
                    number: lookup(&self.numbers),
                    size: lookup(&self.sizes),
                };
                ExpressionInScope {
                    scope,
                    expression: QueryExpression::Pagination(expression),
                }
            })
            .collect()
    }
}
