//! Sparse field set parameter reader
//!
//! Accepts `fields[<resourceType>]`. Repeated occurrences for the same type
//! merge into one selection; an explicitly empty value is preserved as a
//! present-but-minimal selection holding only the type's `id` attribute.

use std::sync::Arc;

use jsonapi_resource_graph::ResourceType;

use crate::chain::ResolvedField;
use crate::error::{Error, Result};
use crate::expression::{ExpressionInScope, QueryExpression, SparseFieldSetExpression};
use crate::parsers::SparseFieldSetParser;
use crate::readers::{DisabledParameters, QueryStringReader, ReaderContext};

const INVALID_FIELDSET: &str = "The specified fieldset is invalid.";

pub struct SparseFieldSetReader {
    context: ReaderContext,
    parser: SparseFieldSetParser,
    /// Selections per resource type, in first-encounter order.
    selections: Vec<(Arc<ResourceType>, Vec<ResolvedField>)>,
}

impl SparseFieldSetReader {
    pub fn new(context: ReaderContext) -> Self {
        let parser = SparseFieldSetParser::new(context.graph.clone(), context.match_options);
        Self {
            context,
            parser,
            selections: Vec::new(),
        }
    }

    fn read_parameter(&mut self, name: &str, value: &str) -> Result<()> {
        let resource_type = self.resolve_resource_type(name)?;

        let fields = if value.is_empty() {
            // Present-but-empty keeps the selection minimal instead of
            // dropping it; without an `id` attribute it stays empty.
            self.identifier_field(&resource_type).into_iter().collect()
        } else {
            self.parser.parse(value, &resource_type)?
        };

        let index = match self
            .selections
            .iter()
            .position(|(existing, _)| existing.name() == resource_type.name())
        {
            Some(index) => index,
            None => {
                self.selections.push((resource_type, Vec::new()));
                self.selections.len() - 1
            }
        };
        let selection = &mut self.selections[index].1;
        for field in fields {
            if !selection
                .iter()
                .any(|existing| existing.field.name() == field.field.name())
            {
                selection.push(field);
            }
        }
        Ok(())
    }

    fn resolve_resource_type(&self, name: &str) -> Result<Arc<ResourceType>> {
        let type_name = name
            .strip_prefix("fields[")
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or_default();
        self.context
            .graph
            .resource_type(type_name)
            .cloned()
            .ok_or_else(|| Error::QueryParse {
                message: format!("Resource type '{type_name}' does not exist."),
                position: "fields[".chars().count(),
            })
    }

    /// The minimal selection an empty value collapses to.
    fn identifier_field(&self, resource_type: &Arc<ResourceType>) -> Option<ResolvedField> {
        let field = self.context.graph.field(resource_type, "id").cloned()?;
        Some(ResolvedField {
            resource_type: resource_type.clone(),
            field,
        })
    }
}

impl QueryStringReader for SparseFieldSetReader {
    fn can_read(&self, parameter_name: &str) -> bool {
        parameter_name
            .strip_prefix("fields[")
            .and_then(|rest| rest.strip_suffix(']'))
            .is_some_and(|type_name| !type_name.is_empty())
    }

    fn allow_empty_value(&self) -> bool {
        true
    }

    fn is_enabled(&self, disabled: DisabledParameters) -> bool {
        !disabled.contains(DisabledParameters::FIELDS)
    }

    fn read(&mut self, parameter_name: &str, parameter_value: &str) -> Result<()> {
        self.read_parameter(parameter_name, parameter_value)
            .map_err(|error| error.into_invalid_query_string(parameter_name, INVALID_FIELDSET))
    }

    fn constraints(&self) -> Vec<ExpressionInScope> {
        self.selections
            .iter()
            .map(|(resource_type, fields)| ExpressionInScope {
                scope: None,
                expression: QueryExpression::SparseFieldSet(SparseFieldSetExpression {
                    resource_type: resource_type.clone(),
                    fields: fields.clone(),
                }),
            })
            .collect()
    }
}
