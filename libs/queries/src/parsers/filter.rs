//! Filter expression parser
//!
//! Recursive descent over the function-call grammar:
//!
//! ```text
//! filter     = logical | negation | comparison | matchText | any | has
//! logical    = ( "and" | "or" ) "(" filter "," filter { "," filter } ")"
//! negation   = "not" "(" filter ")"
//! comparison = operator "(" operand "," operand ")"
//! matchText  = ( "contains" | "startsWith" | "endsWith" ) "(" attrChain "," quoted ")"
//! any        = "any" "(" attrChain "," quoted { "," quoted } ")"
//! has        = "has" "(" toManyChain [ "," filter ] ")"
//! operand    = attrChain | "count" "(" toManyChain ")" | quoted | "null"
//! ```
//!
//! Attribute chains are zero or more to-one relationships ending in an
//! attribute; `count`/`has` chains end in a to-many relationship instead.
//! Constants are validated against the target attribute's value kind.

use std::sync::Arc;

use chrono::DateTime;
use jsonapi_resource_graph::{ResourceGraph, ResourceType, ValueKind};
use phf::phf_set;
use rust_decimal::Decimal;

use crate::chain::FieldChain;
use crate::error::{Error, Result};
use crate::expression::{
    ComparisonOperand, ComparisonOperator, FilterExpression, LiteralValue, LogicalOperator,
    TextMatchKind,
};
use crate::matcher::MatchOptions;
use crate::parsers::{resolve_field_chain, TokenCursor};
use crate::pattern::FieldChainPattern;
use crate::token::{Token, TokenKind};

static FILTER_FUNCTIONS: phf::Set<&'static str> = phf_set! {
    "and",
    "or",
    "not",
    "equals",
    "notEquals",
    "lessThan",
    "lessOrEqual",
    "greaterThan",
    "greaterOrEqual",
    "contains",
    "startsWith",
    "endsWith",
    "any",
    "has",
};

const MAX_RECURSION_DEPTH: usize = 64;

/// Parser for `filter` parameter values.
pub struct FilterParser {
    graph: Arc<ResourceGraph>,
    options: MatchOptions,
    /// Zero or more to-one relationships ending in an attribute.
    attribute_chain: FieldChainPattern,
    /// Zero or more to-one relationships ending in a to-many relationship.
    to_many_chain: FieldChainPattern,
}

impl FilterParser {
    pub fn new(graph: Arc<ResourceGraph>, options: MatchOptions) -> Self {
        Self {
            graph,
            options,
            attribute_chain: hardcoded_pattern("O*A"),
            to_many_chain: hardcoded_pattern("O*M"),
        }
    }

    pub fn parse(&self, value: &str, resource_type: &Arc<ResourceType>) -> Result<FilterExpression> {
        let mut cursor = TokenCursor::new(value)?;
        let expression = self.parse_expression(&mut cursor, resource_type, 0)?;
        cursor.expect_end()?;
        Ok(expression)
    }

    fn parse_expression(
        &self,
        cursor: &mut TokenCursor,
        resource_type: &Arc<ResourceType>,
        depth: usize,
    ) -> Result<FilterExpression> {
        if depth > MAX_RECURSION_DEPTH {
            return Err(Error::QueryParse {
                message: format!("Filter is nested deeper than {MAX_RECURSION_DEPTH} levels."),
                position: cursor.current().position,
            });
        }

        let token = cursor.current().clone();
        if token.kind != TokenKind::Text || !FILTER_FUNCTIONS.contains(token.value.as_str()) {
            return Err(Error::QueryParse {
                message: "Filter function expected.".to_string(),
                position: token.position,
            });
        }
        cursor.advance();
        cursor.expect(TokenKind::OpenParen, "(")?;

        let expression = match token.value.as_str() {
            "and" => self.parse_logical(cursor, resource_type, LogicalOperator::And, depth)?,
            "or" => self.parse_logical(cursor, resource_type, LogicalOperator::Or, depth)?,
            "not" => {
                FilterExpression::Not(Box::new(self.parse_expression(cursor, resource_type, depth + 1)?))
            }
            "equals" => self.parse_comparison(cursor, resource_type, ComparisonOperator::Equals)?,
            "notEquals" => {
                self.parse_comparison(cursor, resource_type, ComparisonOperator::NotEquals)?
            }
            "lessThan" => {
                self.parse_comparison(cursor, resource_type, ComparisonOperator::LessThan)?
            }
            "lessOrEqual" => {
                self.parse_comparison(cursor, resource_type, ComparisonOperator::LessOrEqual)?
            }
            "greaterThan" => {
                self.parse_comparison(cursor, resource_type, ComparisonOperator::GreaterThan)?
            }
            "greaterOrEqual" => {
                self.parse_comparison(cursor, resource_type, ComparisonOperator::GreaterOrEqual)?
            }
            "contains" => self.parse_match_text(cursor, resource_type, TextMatchKind::Contains)?,
            "startsWith" => {
                self.parse_match_text(cursor, resource_type, TextMatchKind::StartsWith)?
            }
            "endsWith" => self.parse_match_text(cursor, resource_type, TextMatchKind::EndsWith)?,
            "any" => self.parse_any(cursor, resource_type)?,
            "has" => self.parse_has(cursor, resource_type, depth)?,
            _ => unreachable!("keyword set and dispatch table diverge"),
        };

        cursor.expect(TokenKind::CloseParen, ")")?;
        Ok(expression)
    }

    fn parse_logical(
        &self,
        cursor: &mut TokenCursor,
        resource_type: &Arc<ResourceType>,
        operator: LogicalOperator,
        depth: usize,
    ) -> Result<FilterExpression> {
        let mut terms = vec![self.parse_expression(cursor, resource_type, depth + 1)?];
        cursor.expect(TokenKind::Comma, ",")?;
        terms.push(self.parse_expression(cursor, resource_type, depth + 1)?);
        while cursor.current().kind == TokenKind::Comma {
            cursor.advance();
            terms.push(self.parse_expression(cursor, resource_type, depth + 1)?);
        }
        Ok(FilterExpression::Logical { operator, terms })
    }

    fn parse_comparison(
        &self,
        cursor: &mut TokenCursor,
        resource_type: &Arc<ResourceType>,
        operator: ComparisonOperator,
    ) -> Result<FilterExpression> {
        let left = self.parse_left_operand(cursor, resource_type)?;
        cursor.expect(TokenKind::Comma, ",")?;
        let right = self.parse_right_operand(cursor, resource_type, &left, operator)?;
        Ok(FilterExpression::Comparison {
            operator,
            left,
            right,
        })
    }

    /// Left side: an attribute chain or `count(toManyChain)`.
    fn parse_left_operand(
        &self,
        cursor: &mut TokenCursor,
        resource_type: &Arc<ResourceType>,
    ) -> Result<ComparisonOperand> {
        if self.at_count_function(cursor) {
            return Ok(ComparisonOperand::Count(self.parse_count(cursor, resource_type)?));
        }
        let token = cursor.expect(TokenKind::Text, "Field name")?;
        let chain = self.resolve_attribute_chain(&token, resource_type)?;
        Ok(ComparisonOperand::Field(chain))
    }

    /// Right side: a quoted constant, `null`, `count(...)` or another field
    /// chain. Constants take their type from the left side.
    fn parse_right_operand(
        &self,
        cursor: &mut TokenCursor,
        resource_type: &Arc<ResourceType>,
        left: &ComparisonOperand,
        operator: ComparisonOperator,
    ) -> Result<ComparisonOperand> {
        let token = cursor.current().clone();
        match token.kind {
            TokenKind::QuotedText => {
                cursor.advance();
                let value_kind = match left {
                    ComparisonOperand::Field(chain) => attribute_value_kind(chain),
                    _ => Some(ValueKind::Integer),
                };
                let literal = match value_kind {
                    Some(kind) => parse_typed_literal(&token.value, kind, token.position)?,
                    None => LiteralValue::String(token.value),
                };
                Ok(ComparisonOperand::Literal(literal))
            }
            TokenKind::Text if token.value == "null" => {
                if !matches!(
                    operator,
                    ComparisonOperator::Equals | ComparisonOperator::NotEquals
                ) {
                    return Err(Error::QueryParse {
                        message: "The 'null' constant can only be used with equality operators."
                            .to_string(),
                        position: token.position,
                    });
                }
                cursor.advance();
                Ok(ComparisonOperand::Literal(LiteralValue::Null))
            }
            TokenKind::Text if self.at_count_function(cursor) => {
                Ok(ComparisonOperand::Count(self.parse_count(cursor, resource_type)?))
            }
            TokenKind::Text => {
                cursor.advance();
                let chain = self.resolve_attribute_chain(&token, resource_type)?;
                Ok(ComparisonOperand::Field(chain))
            }
            _ => Err(Error::QueryParse {
                message: "Constant, 'null', count function or field name expected.".to_string(),
                position: token.position,
            }),
        }
    }

    fn parse_match_text(
        &self,
        cursor: &mut TokenCursor,
        resource_type: &Arc<ResourceType>,
        kind: TextMatchKind,
    ) -> Result<FilterExpression> {
        let token = cursor.expect(TokenKind::Text, "Field name")?;
        let target = self.resolve_attribute_chain(&token, resource_type)?;
        if attribute_value_kind(&target) != Some(ValueKind::String) {
            return Err(Error::QueryParse {
                message: "Attribute of type 'String' expected.".to_string(),
                position: token.position,
            });
        }
        cursor.expect(TokenKind::Comma, ",")?;
        let text = cursor.expect(TokenKind::QuotedText, "Quoted text")?;
        Ok(FilterExpression::MatchText {
            kind,
            target,
            text: text.value,
        })
    }

    fn parse_any(
        &self,
        cursor: &mut TokenCursor,
        resource_type: &Arc<ResourceType>,
    ) -> Result<FilterExpression> {
        let token = cursor.expect(TokenKind::Text, "Field name")?;
        let target = self.resolve_attribute_chain(&token, resource_type)?;
        let value_kind = attribute_value_kind(&target).unwrap_or(ValueKind::String);

        cursor.expect(TokenKind::Comma, ",")?;
        let mut values = Vec::new();
        loop {
            let constant = cursor.expect(TokenKind::QuotedText, "Quoted text")?;
            values.push(parse_typed_literal(&constant.value, value_kind, constant.position)?);
            if cursor.current().kind == TokenKind::Comma {
                cursor.advance();
            } else {
                break;
            }
        }
        Ok(FilterExpression::Any { target, values })
    }

    fn parse_has(
        &self,
        cursor: &mut TokenCursor,
        resource_type: &Arc<ResourceType>,
        depth: usize,
    ) -> Result<FilterExpression> {
        let token = cursor.expect(TokenKind::Text, "Field name")?;
        let target = resolve_field_chain(
            &self.to_many_chain,
            &token.value,
            token.position,
            resource_type,
            &self.graph,
            self.options,
        )?;

        let condition = if cursor.current().kind == TokenKind::Comma {
            cursor.advance();
            let related_type = target.tail_type(&self.graph).ok_or_else(|| Error::QueryParse {
                message: "Related resource type could not be resolved.".to_string(),
                position: token.position,
            })?;
            Some(Box::new(self.parse_expression(cursor, &related_type, depth + 1)?))
        } else {
            None
        };
        Ok(FilterExpression::Has { target, condition })
    }

    /// `count` is only a keyword when directly followed by `(`; a field may
    /// legitimately carry that name.
    fn at_count_function(&self, cursor: &TokenCursor) -> bool {
        cursor.current().kind == TokenKind::Text
            && cursor.current().value == "count"
            && cursor.peek().kind == TokenKind::OpenParen
    }

    fn parse_count(
        &self,
        cursor: &mut TokenCursor,
        resource_type: &Arc<ResourceType>,
    ) -> Result<FieldChain> {
        cursor.advance(); // Skip 'count'
        cursor.expect(TokenKind::OpenParen, "(")?;
        let token = cursor.expect(TokenKind::Text, "Field name")?;
        let chain = resolve_field_chain(
            &self.to_many_chain,
            &token.value,
            token.position,
            resource_type,
            &self.graph,
            self.options,
        )?;
        cursor.expect(TokenKind::CloseParen, ")")?;
        Ok(chain)
    }

    fn resolve_attribute_chain(
        &self,
        token: &Token,
        resource_type: &Arc<ResourceType>,
    ) -> Result<FieldChain> {
        let chain = resolve_field_chain(
            &self.attribute_chain,
            &token.value,
            token.position,
            resource_type,
            &self.graph,
            self.options,
        )?;
        ensure_filterable(&chain)?;
        Ok(chain)
    }
}

/// Value kind of the attribute a chain terminates in.
fn attribute_value_kind(chain: &FieldChain) -> Option<ValueKind> {
    chain
        .last()
        .and_then(|entry| entry.field.as_attribute())
        .map(|attribute| attribute.value_kind)
}

fn ensure_filterable(chain: &FieldChain) -> Result<()> {
    if let Some(entry) = chain.last() {
        if let Some(attribute) = entry.field.as_attribute() {
            if !attribute.filterable {
                return Err(Error::FilterNotAllowed {
                    attribute: attribute.name.clone(),
                    resource_type: entry.resource_type.name().to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Parse a quoted constant against the attribute's underlying value type.
pub(crate) fn parse_typed_literal(
    text: &str,
    kind: ValueKind,
    position: usize,
) -> Result<LiteralValue> {
    let conversion_failed = || Error::QueryParse {
        message: format!("Failed to convert '{text}' to type '{kind}'."),
        position,
    };

    match kind {
        ValueKind::String => Ok(LiteralValue::String(text.to_string())),
        ValueKind::Integer => text
            .parse::<i64>()
            .map(LiteralValue::Integer)
            .map_err(|_| conversion_failed()),
        ValueKind::Decimal => text
            .parse::<Decimal>()
            .map(LiteralValue::Decimal)
            .map_err(|_| conversion_failed()),
        ValueKind::Boolean => match text {
            "true" => Ok(LiteralValue::Boolean(true)),
            "false" => Ok(LiteralValue::Boolean(false)),
            _ => Err(conversion_failed()),
        },
        ValueKind::DateTime => DateTime::parse_from_rfc3339(text)
            .map(LiteralValue::DateTime)
            .map_err(|_| conversion_failed()),
    }
}

/// Parse a pattern literal that is part of the program, not user input.
pub(crate) fn hardcoded_pattern(text: &str) -> FieldChainPattern {
    match FieldChainPattern::parse(text) {
        Ok(pattern) => pattern,
        Err(_) => unreachable!("hardcoded pattern '{text}' is well-formed"),
    }
}
