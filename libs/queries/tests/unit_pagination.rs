//! Unit tests for the pagination value parser

use jsonapi_queries::error::Error;
use jsonapi_queries::matcher::MatchOptions;
use jsonapi_queries::parsers::{PageElement, PaginationParser};

mod test_support;
use test_support::{articles, blog_graph};

fn parse(value: &str) -> Result<Vec<PageElement>, Error> {
    let graph = blog_graph();
    let parser = PaginationParser::new(graph.clone(), MatchOptions::default());
    parser.parse(value, &articles(&graph))
}

#[test]
fn test_single_unscoped_value() {
    let elements = parse("10").unwrap();
    assert_eq!(elements.len(), 1);
    assert!(elements[0].scope.is_none());
    assert_eq!(elements[0].value, 10);
}

#[test]
fn test_scoped_and_unscoped_elements() {
    let elements = parse("10,children:5").unwrap();
    assert_eq!(elements.len(), 2);
    assert!(elements[0].scope.is_none());
    assert_eq!(elements[0].value, 10);

    let scope = elements[1].scope.as_ref().unwrap();
    assert_eq!(scope.to_string(), "children");
    assert_eq!(elements[1].value, 5);
}

#[test]
fn test_nested_scope_chain() {
    let elements = parse("children.children:3").unwrap();
    assert_eq!(elements[0].scope.as_ref().unwrap().len(), 2);
    assert_eq!(elements[0].value, 3);
}

#[test]
fn test_zero_rejected() {
    let error = parse("0").unwrap_err();
    assert_eq!(
        error,
        Error::QueryParse {
            message: "Positive number expected.".to_string(),
            position: 0,
        }
    );
}

#[test]
fn test_non_numeric_value_rejected() {
    let error = parse("children:many").unwrap_err();
    assert_eq!(
        error,
        Error::QueryParse {
            message: "Positive number expected.".to_string(),
            position: 9,
        }
    );
}

#[test]
fn test_scope_must_be_to_many() {
    let error = parse("author:5").unwrap_err();
    match error {
        Error::QueryParse { message, position } => {
            assert!(message.starts_with("To-many relationship"), "{message}");
            assert_eq!(position, 0);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_empty_element_rejected() {
    let error = parse("10,").unwrap_err();
    assert_eq!(
        error,
        Error::QueryParse {
            message: "Number or relationship name expected.".to_string(),
            position: 3,
        }
    );
}
