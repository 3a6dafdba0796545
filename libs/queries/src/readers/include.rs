//! Include parameter reader
//!
//! Accepts the bare `include` parameter. Repeated occurrences merge into a
//! single relationship tree; an empty value is meaningful and yields an
//! empty include constraint (include nothing, explicitly).

use crate::error::Result;
use crate::expression::{ExpressionInScope, IncludeExpression, QueryExpression};
use crate::parsers::include::merge_chain;
use crate::parsers::IncludeParser;
use crate::readers::{DisabledParameters, QueryStringReader, ReaderContext};
use crate::scope::relationship_chains;

const INVALID_INCLUDE: &str = "The specified include is invalid.";

pub struct IncludeReader {
    context: ReaderContext,
    parser: IncludeParser,
    accumulated: IncludeExpression,
    /// Distinguishes "no include parameter" from "include=" (empty).
    read_any: bool,
}

impl IncludeReader {
    pub fn new(context: ReaderContext) -> Self {
        let parser = IncludeParser::new(context.graph.clone(), context.match_options);
        Self {
            context,
            parser,
            accumulated: IncludeExpression::default(),
            read_any: false,
        }
    }

    fn read_parameter(&mut self, value: &str) -> Result<()> {
        let expression = self.parser.parse(value, &self.context.resource_type)?;
        for chain in relationship_chains(&expression) {
            merge_chain(&mut self.accumulated.elements, chain.fields());
        }
        self.read_any = true;
        Ok(())
    }
}

impl QueryStringReader for IncludeReader {
    fn can_read(&self, parameter_name: &str) -> bool {
        parameter_name == "include"
    }

    fn allow_empty_value(&self) -> bool {
        true
    }

    fn is_enabled(&self, disabled: DisabledParameters) -> bool {
        !disabled.contains(DisabledParameters::INCLUDE)
    }

    fn read(&mut self, parameter_name: &str, parameter_value: &str) -> Result<()> {
        self.read_parameter(parameter_value)
            .map_err(|error| error.into_invalid_query_string(parameter_name, INVALID_INCLUDE))
    }

    fn constraints(&self) -> Vec<ExpressionInScope> {
        if !self.read_any {
            return Vec::new();
        }
        vec![ExpressionInScope {
            scope: None,
            expression: QueryExpression::Include(self.accumulated.clone()),
        }]
    }
}
