//! Query constraint expression trees
//!
//! The closed union of expression nodes the parsers produce. Expressions are
//! built fresh per request and handed off immutably to downstream query
//! building; `Display` renders each node back to its query-string form.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use jsonapi_resource_graph::ResourceType;
use rust_decimal::Decimal;

use crate::chain::{FieldChain, ResolvedField};

/// A typed constant from query text.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Integer(i64),
    Decimal(Decimal),
    Boolean(bool),
    DateTime(DateTime<FixedOffset>),
    Null,
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::String(text) => write!(f, "'{}'", text.replace('\'', "''")),
            LiteralValue::Integer(value) => write!(f, "'{value}'"),
            LiteralValue::Decimal(value) => write!(f, "'{value}'"),
            LiteralValue::Boolean(value) => write!(f, "'{value}'"),
            LiteralValue::DateTime(value) => write!(f, "'{}'", value.to_rfc3339()),
            LiteralValue::Null => write!(f, "null"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Equals,
    NotEquals,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl ComparisonOperator {
    pub fn function_name(self) -> &'static str {
        match self {
            ComparisonOperator::Equals => "equals",
            ComparisonOperator::NotEquals => "notEquals",
            ComparisonOperator::LessThan => "lessThan",
            ComparisonOperator::LessOrEqual => "lessOrEqual",
            ComparisonOperator::GreaterThan => "greaterThan",
            ComparisonOperator::GreaterOrEqual => "greaterOrEqual",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn function_name(self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
        }
    }
}

/// Text matching flavor for string attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatchKind {
    Contains,
    StartsWith,
    EndsWith,
}

impl TextMatchKind {
    pub fn function_name(self) -> &'static str {
        match self {
            TextMatchKind::Contains => "contains",
            TextMatchKind::StartsWith => "startsWith",
            TextMatchKind::EndsWith => "endsWith",
        }
    }
}

/// Left or right side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonOperand {
    Field(FieldChain),
    Count(FieldChain),
    Literal(LiteralValue),
}

impl fmt::Display for ComparisonOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOperand::Field(chain) => write!(f, "{chain}"),
            ComparisonOperand::Count(chain) => write!(f, "count({chain})"),
            ComparisonOperand::Literal(value) => write!(f, "{value}"),
        }
    }
}

/// A node in a filter expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpression {
    Comparison {
        operator: ComparisonOperator,
        left: ComparisonOperand,
        right: ComparisonOperand,
    },
    MatchText {
        kind: TextMatchKind,
        target: FieldChain,
        text: String,
    },
    /// Equality against any value in a set.
    Any {
        target: FieldChain,
        values: Vec<LiteralValue>,
    },
    Logical {
        operator: LogicalOperator,
        terms: Vec<FilterExpression>,
    },
    Not(Box<FilterExpression>),
    /// Existence test on a to-many relationship, optionally constrained.
    Has {
        target: FieldChain,
        condition: Option<Box<FilterExpression>>,
    },
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpression::Comparison {
                operator,
                left,
                right,
            } => write!(f, "{}({left},{right})", operator.function_name()),
            FilterExpression::MatchText { kind, target, text } => {
                write!(f, "{}({target},'{}')", kind.function_name(), text.replace('\'', "''"))
            }
            FilterExpression::Any { target, values } => {
                write!(f, "any({target}")?;
                for value in values {
                    write!(f, ",{value}")?;
                }
                write!(f, ")")
            }
            FilterExpression::Logical { operator, terms } => {
                write!(f, "{}(", operator.function_name())?;
                for (index, term) in terms.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{term}")?;
                }
                write!(f, ")")
            }
            FilterExpression::Not(inner) => write!(f, "not({inner})"),
            FilterExpression::Has { target, condition } => match condition {
                Some(condition) => write!(f, "has({target},{condition})"),
                None => write!(f, "has({target})"),
            },
        }
    }
}

/// Sort target: a field chain or the count of a to-many relationship.
#[derive(Debug, Clone, PartialEq)]
pub enum SortTarget {
    Field(FieldChain),
    Count(FieldChain),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortElement {
    pub target: SortTarget,
    pub ascending: bool,
}

/// Ordered list of sort elements.
#[derive(Debug, Clone, PartialEq)]
pub struct SortExpression {
    pub elements: Vec<SortElement>,
}

impl fmt::Display for SortExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, element) in self.elements.iter().enumerate() {
            if index > 0 {
                write!(f, ",")?;
            }
            if !element.ascending {
                write!(f, "-")?;
            }
            match &element.target {
                SortTarget::Field(chain) => write!(f, "{chain}")?,
                SortTarget::Count(chain) => write!(f, "count({chain})")?,
            }
        }
        Ok(())
    }
}

/// A tree of included relationships.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IncludeExpression {
    pub elements: Vec<IncludeElement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncludeElement {
    pub relationship: ResolvedField,
    pub children: Vec<IncludeElement>,
}

/// Page number and size for one scope. `None` means the component was not
/// supplied and downstream defaults apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationExpression {
    /// One-based page number.
    pub number: Option<u32>,
    pub size: Option<u32>,
}

/// Selected fields for one resource type.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseFieldSetExpression {
    pub resource_type: Arc<ResourceType>,
    pub fields: Vec<ResolvedField>,
}

/// Any constraint expression a reader can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpression {
    Filter(FilterExpression),
    Sort(SortExpression),
    Include(IncludeExpression),
    Pagination(PaginationExpression),
    SparseFieldSet(SparseFieldSetExpression),
}

/// A constraint expression grouped under the scope it applies to. `None`
/// means the request's root resource type (the global scope).
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionInScope {
    pub scope: Option<FieldChain>,
    pub expression: QueryExpression,
}
