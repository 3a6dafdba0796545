//! Error types for query string parsing
//!
//! Three classes of failure flow through this crate:
//! - pattern-format errors: a malformed field chain pattern, which is a
//!   defect in resource definitions rather than user input
//! - query-parse errors: malformed or semantically invalid query text,
//!   carrying a zero-based character position into the offending value
//! - parameter-usage errors: syntactically fine parameters used in the wrong
//!   context (missing value, disabled family, unknown name, collection-only
//!   parameter on a single-resource endpoint)
//!
//! Readers wrap parse failures into [`Error::InvalidQueryString`], the only
//! variant HTTP error translation needs to understand.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Query string parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The field chain pattern itself is malformed. Carries the pattern text
    /// and the zero-based position of the offending character.
    #[error("Invalid field chain pattern '{pattern}': {message} at position {position}")]
    InvalidPattern {
        pattern: String,
        message: String,
        position: usize,
    },

    /// Malformed or semantically invalid query text supplied by the client.
    /// The position is a zero-based character offset into the literal value.
    #[error("{message} (at position {position})")]
    QueryParse { message: String, position: usize },

    #[error("Filtering on attribute '{attribute}' of resource type '{resource_type}' is not allowed")]
    FilterNotAllowed {
        attribute: String,
        resource_type: String,
    },

    #[error("Sorting on attribute '{attribute}' of resource type '{resource_type}' is not allowed")]
    SortNotAllowed {
        attribute: String,
        resource_type: String,
    },

    #[error("Missing value for '{parameter}' query string parameter")]
    MissingParameterValue { parameter: String },

    #[error("The query string parameter '{parameter}' is currently disabled")]
    ParameterDisabled { parameter: String },

    #[error("Unknown query string parameter '{parameter}'")]
    UnknownParameter { parameter: String },

    #[error("The query string parameter '{parameter}' can only be used on an endpoint that returns a collection of resources")]
    CollectionEndpointRequired { parameter: String },

    /// A parse failure enriched with the parameter it occurred in. This is
    /// the single failure surface exposed to HTTP error translation.
    #[error("{title}: {detail} (parameter '{parameter}')")]
    InvalidQueryString {
        parameter: String,
        title: String,
        detail: String,
    },
}

impl Error {
    /// Wrap a parse failure with the parameter name and a generic category
    /// title. Errors that already carry their parameter pass through.
    pub fn into_invalid_query_string(self, parameter: &str, title: &str) -> Error {
        match self {
            Error::InvalidQueryString { .. }
            | Error::MissingParameterValue { .. }
            | Error::ParameterDisabled { .. }
            | Error::UnknownParameter { .. }
            | Error::CollectionEndpointRequired { .. } => self,
            other => Error::InvalidQueryString {
                parameter: parameter.to_string(),
                title: title.to_string(),
                detail: other.to_string(),
            },
        }
    }

    /// The parameter this error is attributed to, when known.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Error::MissingParameterValue { parameter }
            | Error::ParameterDisabled { parameter }
            | Error::UnknownParameter { parameter }
            | Error::CollectionEndpointRequired { parameter }
            | Error::InvalidQueryString { parameter, .. } => Some(parameter),
            _ => None,
        }
    }
}
