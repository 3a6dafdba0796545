//! JSON:API query string parsing
//!
//! Turns the query string of a JSON:API request into typed, validated
//! constraint expressions resolved against a resource type graph:
//!
//! ```text
//! Raw query string
//!      |
//! Dispatch reader -> per-parameter readers
//!      |
//! Expression parsers (filter / sort / include / page / fields)
//!      |
//! Field chain matcher -> resolved chains over the resource graph
//!      |
//! (scope, expression) constraint pairs
//! ```
//!
//! Field references inside every grammar are validated by a small pattern
//! language over field kinds (attribute, to-one, to-many) with quantifiers
//! and backtracking, so each parameter family states declaratively which
//! dotted paths it accepts. All failures carry a character position into the
//! offending parameter value and surface through a single error type.

pub mod chain;
pub mod error;
pub mod expression;
pub mod legacy;
pub mod lexer;
pub mod matcher;
pub mod parsers;
pub mod pattern;
pub mod readers;
pub mod scope;
pub mod token;

// Re-export main types
pub use chain::{FieldChain, ResolvedField};
pub use error::{Error, Result};
pub use expression::{
    ComparisonOperand, ComparisonOperator, ExpressionInScope, FilterExpression, IncludeElement,
    IncludeExpression, LiteralValue, LogicalOperator, PaginationExpression, QueryExpression,
    SortElement, SortExpression, SortTarget, SparseFieldSetExpression, TextMatchKind,
};
pub use matcher::{match_field_chain, MatchError, MatchOptions};
pub use pattern::{FieldChainPattern, FieldKinds, PatternElement, Quantifier};
pub use readers::{
    parse_query_string, DisabledParameters, DispatchOptions, QueryStringDispatcher,
    QueryStringReader, ReaderContext, RequestKind,
};
