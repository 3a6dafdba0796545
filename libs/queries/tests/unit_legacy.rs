//! Unit tests for the legacy filter notation converter

use jsonapi_queries::error::Error;
use jsonapi_queries::legacy::{convert, extract_conditions};
use jsonapi_queries::matcher::MatchOptions;
use jsonapi_queries::parsers::FilterParser;

mod test_support;
use test_support::{articles, blog_graph};

#[test]
fn test_extract_conditions_splits_on_commas() {
    assert_eq!(
        extract_conditions("eq:a,like:b"),
        vec!["eq:a", "like:b"]
    );
    assert_eq!(extract_conditions("plain"), vec!["plain"]);
}

#[test]
fn test_extract_conditions_keeps_multi_value_prefixes_whole() {
    assert_eq!(extract_conditions("in:a,b,c"), vec!["in:a,b,c"]);
    assert_eq!(extract_conditions("nin:a,b"), vec!["nin:a,b"]);
    assert_eq!(
        extract_conditions("expr:or(equals(title,'a'),equals(title,'b'))"),
        vec!["expr:or(equals(title,'a'),equals(title,'b'))"]
    );
}

#[test]
fn test_comparison_prefixes() {
    let cases = [
        ("eq:Smith", "equals(name,'Smith')"),
        ("ne:Smith", "not(equals(name,'Smith'))"),
        ("lt:5", "lessThan(name,'5')"),
        ("le:5", "lessOrEqual(name,'5')"),
        ("gt:5", "greaterThan(name,'5')"),
        ("ge:5", "greaterOrEqual(name,'5')"),
        ("like:Smi", "contains(name,'Smi')"),
    ];
    for (value, expected) in cases {
        let (name, converted) = convert("filter[name]", value).unwrap();
        assert_eq!(name, "filter");
        assert_eq!(converted, expected, "for {value}");
    }
}

#[test]
fn test_unprefixed_value_becomes_equality() {
    let (name, converted) = convert("filter[name]", "Smith").unwrap();
    assert_eq!((name.as_str(), converted.as_str()), ("filter", "equals(name,'Smith')"));
}

#[test]
fn test_set_membership_prefixes() {
    let (_, converted) = convert("filter[tag]", "in:a,b").unwrap();
    assert_eq!(converted, "any(tag,'a','b')");

    let (_, converted) = convert("filter[tag]", "nin:a,b").unwrap();
    assert_eq!(converted, "not(any(tag,'a','b'))");
}

#[test]
fn test_null_check_prefixes() {
    let (_, converted) = convert("filter[owner]", "isnull:").unwrap();
    assert_eq!(converted, "equals(owner,null)");

    let (_, converted) = convert("filter[owner]", "isnotnull:").unwrap();
    assert_eq!(converted, "not(equals(owner,null))");
}

#[test]
fn test_quotes_escaped_in_converted_output() {
    let (_, converted) = convert("filter[name]", "eq:O'Brien").unwrap();
    assert_eq!(converted, "equals(name,'O''Brien')");
}

#[test]
fn test_expr_prefix_passes_through() {
    let (name, converted) = convert("filter", "expr:equals(title,'x')").unwrap();
    assert_eq!((name.as_str(), converted.as_str()), ("filter", "equals(title,'x')"));
}

#[test]
fn test_expr_prefix_rejected_with_field_name() {
    let error = convert("filter[title]", "expr:equals(title,'x')").unwrap_err();
    assert_eq!(
        error,
        Error::QueryParse {
            message: "The 'expr:' prefix cannot be combined with a field name.".to_string(),
            position: 0,
        }
    );
}

#[test]
fn test_bare_filter_without_prefix_unchanged() {
    let (name, converted) = convert("filter", "equals(title,'x')").unwrap();
    assert_eq!((name.as_str(), converted.as_str()), ("filter", "equals(title,'x')"));
}

#[test]
fn test_malformed_bracket_syntax() {
    let error = convert("filter[name", "eq:x").unwrap_err();
    assert_eq!(
        error,
        Error::QueryParse {
            message: "] expected.".to_string(),
            position: 11,
        }
    );

    let error = convert("filter[]", "eq:x").unwrap_err();
    assert_eq!(
        error,
        Error::QueryParse {
            message: "Field name expected.".to_string(),
            position: 7,
        }
    );
}

#[test]
fn test_converted_output_parses_like_handwritten_filter() {
    let graph = blog_graph();
    let parser = FilterParser::new(graph.clone(), MatchOptions::default());
    let target = articles(&graph);

    let (_, converted) = convert("filter[title]", "eq:Moby-Dick").unwrap();
    let from_legacy = parser.parse(&converted, &target).unwrap();
    let direct = parser.parse("equals(title,'Moby-Dick')", &target).unwrap();
    assert_eq!(from_legacy, direct);

    let (_, converted) = convert("filter[viewCount]", "gt:18").unwrap();
    assert_eq!(converted, "greaterThan(viewCount,'18')");
    let expression = parser.parse(&converted, &target).unwrap();
    assert_eq!(expression.to_string(), "greaterThan(viewCount,'18')");
}
