//! Unit tests for the include expression parser

use jsonapi_queries::error::Error;
use jsonapi_queries::expression::IncludeExpression;
use jsonapi_queries::matcher::MatchOptions;
use jsonapi_queries::parsers::IncludeParser;
use jsonapi_queries::scope::relationship_chains;

mod test_support;
use test_support::{articles, blog_graph};

fn parse(value: &str) -> Result<IncludeExpression, Error> {
    let graph = blog_graph();
    let parser = IncludeParser::new(graph.clone(), MatchOptions::default());
    parser.parse(value, &articles(&graph))
}

#[test]
fn test_single_chain() {
    let expression = parse("author").unwrap();
    assert_eq!(expression.elements.len(), 1);
    assert_eq!(expression.elements[0].relationship.field.name(), "author");
    assert!(expression.elements[0].children.is_empty());
}

#[test]
fn test_shared_prefix_merges_into_one_node() {
    let expression = parse("children.parent,children.revisions").unwrap();
    assert_eq!(expression.elements.len(), 1);

    let children = &expression.elements[0];
    assert_eq!(children.relationship.field.name(), "children");
    assert_eq!(children.children.len(), 2);
    assert_eq!(children.children[0].relationship.field.name(), "parent");
    assert_eq!(children.children[1].relationship.field.name(), "revisions");
}

#[test]
fn test_duplicate_chain_collapses() {
    let expression = parse("author,author").unwrap();
    assert_eq!(expression.elements.len(), 1);
}

#[test]
fn test_empty_value_yields_empty_expression() {
    let expression = parse("").unwrap();
    assert!(expression.elements.is_empty());
}

#[test]
fn test_attribute_rejected() {
    let error = parse("title").unwrap_err();
    assert_eq!(
        error,
        Error::QueryParse {
            message: "Relationship on resource type 'articles' expected.".to_string(),
            position: 0,
        }
    );
}

#[test]
fn test_nested_position_offset() {
    let error = parse("author,children.nope").unwrap_err();
    assert_eq!(
        error,
        Error::QueryParse {
            message: "Field 'nope' does not exist on resource type 'articles'.".to_string(),
            position: 16,
        }
    );
}

#[test]
fn test_relationship_chains_expands_tree() {
    let expression = parse("children.parent,children.revisions,author").unwrap();
    let chains: Vec<String> = relationship_chains(&expression)
        .iter()
        .map(|chain| chain.to_string())
        .collect();
    assert_eq!(
        chains,
        vec!["children.parent", "children.revisions", "author"]
    );
}
