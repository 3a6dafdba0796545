//! Per-parameter readers and the dispatch reader
//!
//! One reader per parameter family (`filter`, `sort`, `include`, `page`,
//! `fields`). A reader is a mutable accumulator built fresh per request: it
//! claims parameter names through [`QueryStringReader::can_read`], folds
//! every occurrence of its parameters into internal state, and exposes the
//! final `(scope, expression)` pairs through
//! [`QueryStringReader::constraints`].
//!
//! [`QueryStringDispatcher`] walks the raw query string once in encounter
//! order, routes each pair to the first claiming reader and enforces the
//! empty-value, disabled-parameter and unknown-parameter policies. The first
//! failing parameter aborts the remaining query string.

pub mod filter;
pub mod include;
pub mod pagination;
pub mod sort;
pub mod sparse_fields;

pub use filter::FilterReader;
pub use include::IncludeReader;
pub use pagination::PaginationReader;
pub use sort::SortReader;
pub use sparse_fields::SparseFieldSetReader;

use std::sync::Arc;

use jsonapi_resource_graph::{ResourceGraph, ResourceType};

use crate::error::{Error, Result};
use crate::expression::ExpressionInScope;
use crate::matcher::MatchOptions;

/// Whether the request targets a collection or a single resource. Filtering,
/// sorting and root-level pagination only make sense against a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Collection,
    SingleResource,
}

/// Bit set of parameter families disabled for the current endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisabledParameters(u8);

impl DisabledParameters {
    pub const NONE: DisabledParameters = DisabledParameters(0);
    pub const FILTER: DisabledParameters = DisabledParameters(1 << 0);
    pub const SORT: DisabledParameters = DisabledParameters(1 << 1);
    pub const INCLUDE: DisabledParameters = DisabledParameters(1 << 2);
    pub const PAGE: DisabledParameters = DisabledParameters(1 << 3);
    pub const FIELDS: DisabledParameters = DisabledParameters(1 << 4);
    pub const ALL: DisabledParameters = DisabledParameters(0b1_1111);

    pub const fn union(self, other: DisabledParameters) -> DisabledParameters {
        DisabledParameters(self.0 | other.0)
    }

    pub const fn contains(self, other: DisabledParameters) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Shared, read-only context a reader is constructed with.
#[derive(Clone)]
pub struct ReaderContext {
    pub graph: Arc<ResourceGraph>,
    /// The request's target resource type.
    pub resource_type: Arc<ResourceType>,
    pub request_kind: RequestKind,
    pub match_options: MatchOptions,
    /// Accept the prefix-based filter notation (`filter[name]=eq:Smith`)
    /// and rewrite it before parsing.
    pub legacy_filter_notation: bool,
}

impl ReaderContext {
    pub fn new(
        graph: Arc<ResourceGraph>,
        resource_type: Arc<ResourceType>,
        request_kind: RequestKind,
    ) -> Self {
        Self {
            graph,
            resource_type,
            request_kind,
            match_options: MatchOptions::default(),
            legacy_filter_notation: false,
        }
    }
}

/// One parameter family's reader.
pub trait QueryStringReader {
    /// Whether this reader claims the parameter name. Tests the name only;
    /// the value is not inspected.
    fn can_read(&self, parameter_name: &str) -> bool;

    /// Whether an empty parameter value is meaningful for this family.
    fn allow_empty_value(&self) -> bool {
        false
    }

    fn is_enabled(&self, disabled: DisabledParameters) -> bool;

    /// Fold one parameter occurrence into the accumulator.
    fn read(&mut self, parameter_name: &str, parameter_value: &str) -> Result<()>;

    /// The accumulated constraints, grouped per scope.
    fn constraints(&self) -> Vec<ExpressionInScope>;
}

/// Dispatch policy knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchOptions {
    /// Pass over parameters no reader claims instead of failing.
    pub allow_unknown_parameters: bool,
    pub disabled_parameters: DisabledParameters,
}

/// Routes raw query string pairs to the per-family readers.
pub struct QueryStringDispatcher {
    readers: Vec<Box<dyn QueryStringReader>>,
    options: DispatchOptions,
}

impl QueryStringDispatcher {
    /// A dispatcher over the five standard readers.
    pub fn new(context: ReaderContext, options: DispatchOptions) -> Self {
        let readers: Vec<Box<dyn QueryStringReader>> = vec![
            Box::new(FilterReader::new(context.clone())),
            Box::new(SortReader::new(context.clone())),
            Box::new(IncludeReader::new(context.clone())),
            Box::new(PaginationReader::new(context.clone())),
            Box::new(SparseFieldSetReader::new(context)),
        ];
        Self { readers, options }
    }

    /// A dispatcher over a custom reader set, tried in the given order.
    pub fn with_readers(readers: Vec<Box<dyn QueryStringReader>>, options: DispatchOptions) -> Self {
        Self { readers, options }
    }

    /// Process every `(name, value)` pair in encounter order. The first
    /// failing parameter aborts with its error; nothing is retried.
    pub fn read_all(&mut self, parameters: &[(String, String)]) -> Result<()> {
        for (name, value) in parameters {
            if name.is_empty() {
                continue;
            }

            let Some(reader) = self
                .readers
                .iter_mut()
                .find(|reader| reader.can_read(name))
            else {
                if self.options.allow_unknown_parameters {
                    continue;
                }
                return Err(Error::UnknownParameter {
                    parameter: name.clone(),
                });
            };

            if value.is_empty() && !reader.allow_empty_value() {
                return Err(Error::MissingParameterValue {
                    parameter: name.clone(),
                });
            }
            if !reader.is_enabled(self.options.disabled_parameters) {
                return Err(Error::ParameterDisabled {
                    parameter: name.clone(),
                });
            }

            tracing::debug!("Reading query string parameter '{}'", name);
            reader.read(name, value)?;
        }
        Ok(())
    }

    /// The accumulated constraints from every reader, in reader order.
    pub fn constraints(&self) -> Vec<ExpressionInScope> {
        self.readers
            .iter()
            .flat_map(|reader| reader.constraints())
            .collect()
    }
}

/// Split a raw query string into decoded `(name, value)` pairs, preserving
/// encounter order. Pairs with an empty name are dropped; a missing `=`
/// yields an empty value. Undecodable percent sequences are kept literal.
pub fn parse_query_string(raw: &str) -> Vec<(String, String)> {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) => (decode_component(name), decode_component(value)),
            None => (decode_component(pair), String::new()),
        })
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

fn decode_component(text: &str) -> String {
    let text = text.replace('+', " ");
    match urlencoding::decode(&text) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => text,
    }
}
