//! Legacy filter notation converter
//!
//! Rewrites the older prefix-based filter syntax into the function-call
//! syntax, so both forms drive the same parser:
//!
//! - `filter[name]=eq:Smith` → `filter=equals(name,'Smith')`
//! - `filter[age]=gt:18` → `filter=greaterThan(age,'18')`
//! - `filter[tag]=in:a,b` → `filter=any(tag,'a','b')`
//! - `filter[owner]=isnull:` → `filter=equals(owner,null)`
//! - `filter=expr:equals(name,'Smith')` → passthrough without the prefix
//!
//! Pure text-to-text: no resource graph involved; the converted output is
//! validated by the filter parser like any other value.

use phf::{phf_map, phf_set};

use crate::error::{Error, Result};

/// Comparison-style prefixes: target function name and whether the result
/// is wrapped in `not(...)`.
static COMPARISON_PREFIXES: phf::Map<&'static str, (&'static str, bool)> = phf_map! {
    "eq" => ("equals", false),
    "ne" => ("equals", true),
    "lt" => ("lessThan", false),
    "le" => ("lessOrEqual", false),
    "gt" => ("greaterThan", false),
    "ge" => ("greaterOrEqual", false),
    "like" => ("contains", false),
};

/// Prefixes whose value is a single unit even when it contains commas.
static MULTI_VALUE_PREFIXES: phf::Set<&'static str> = phf_set! {
    "in",
    "nin",
    "expr",
};

/// Split a legacy value into separate conditions: top-level commas separate
/// alternatives unless the value carries a multi-value prefix.
pub fn extract_conditions(value: &str) -> Vec<&str> {
    if let Some((prefix, _)) = value.split_once(':') {
        if MULTI_VALUE_PREFIXES.contains(prefix) {
            return vec![value];
        }
    }
    value.split(',').collect()
}

/// Convert one legacy parameter occurrence into the current syntax.
///
/// Returns the parameter unchanged when it carries no legacy markers (bare
/// `filter` name without a recognized prefix).
pub fn convert(parameter_name: &str, parameter_value: &str) -> Result<(String, String)> {
    let attribute = parse_bracketed_attribute(parameter_name)?;
    let prefix = parameter_value.split_once(':').filter(|(prefix, _)| {
        COMPARISON_PREFIXES.contains_key(prefix)
            || MULTI_VALUE_PREFIXES.contains(prefix)
            || *prefix == "isnull"
            || *prefix == "isnotnull"
    });

    let expression = match (&attribute, prefix) {
        (None, Some(("expr", rest))) => rest.to_string(),
        (None, _) => return Ok(("filter".to_string(), parameter_value.to_string())),
        (Some(_), Some(("expr", _))) => {
            return Err(Error::QueryParse {
                message: "The 'expr:' prefix cannot be combined with a field name.".to_string(),
                position: 0,
            });
        }
        (Some(attribute), None) => format!("equals({attribute},'{}')", escape(parameter_value)),
        (Some(attribute), Some((prefix, rest))) => match prefix {
            "in" | "nin" => {
                let values: Vec<String> = rest
                    .split(',')
                    .map(|value| format!("'{}'", escape(value)))
                    .collect();
                let any = format!("any({attribute},{})", values.join(","));
                if prefix == "nin" {
                    format!("not({any})")
                } else {
                    any
                }
            }
            "isnull" => format!("equals({attribute},null)"),
            "isnotnull" => format!("not(equals({attribute},null))"),
            _ => {
                // Guaranteed present by the prefix filter above.
                let (function, negated) = COMPARISON_PREFIXES
                    .get(prefix)
                    .copied()
                    .unwrap_or(("equals", false));
                let comparison = format!("{function}({attribute},'{}')", escape(rest));
                if negated {
                    format!("not({comparison})")
                } else {
                    comparison
                }
            }
        },
    };

    Ok(("filter".to_string(), expression))
}

/// Extract the attribute name from the bracketed parameter form.
///
/// `filter` yields `None`; `filter[name]` yields `Some("name")`. Malformed
/// bracket syntax fails with a position into the parameter name.
fn parse_bracketed_attribute(parameter_name: &str) -> Result<Option<String>> {
    let Some(rest) = parameter_name.strip_prefix("filter[") else {
        return Ok(None);
    };
    let Some(attribute) = rest.strip_suffix(']') else {
        return Err(Error::QueryParse {
            message: "] expected.".to_string(),
            position: parameter_name.chars().count(),
        });
    };
    if attribute.is_empty() {
        return Err(Error::QueryParse {
            message: "Field name expected.".to_string(),
            position: "filter[".chars().count(),
        });
    }
    Ok(Some(attribute.to_string()))
}

fn escape(value: &str) -> String {
    value.replace('\'', "''")
}
