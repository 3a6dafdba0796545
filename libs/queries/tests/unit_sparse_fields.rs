//! Unit tests for the sparse field set parser

use jsonapi_queries::chain::ResolvedField;
use jsonapi_queries::error::Error;
use jsonapi_queries::matcher::MatchOptions;
use jsonapi_queries::parsers::SparseFieldSetParser;

mod test_support;
use test_support::{articles, blog_graph};

fn parse(value: &str) -> Result<Vec<ResolvedField>, Error> {
    let graph = blog_graph();
    let parser = SparseFieldSetParser::new(graph.clone(), MatchOptions::default());
    parser.parse(value, &articles(&graph))
}

#[test]
fn test_attributes_and_relationships_allowed() {
    let fields = parse("title,children,author").unwrap();
    let names: Vec<&str> = fields.iter().map(|field| field.field.name()).collect();
    assert_eq!(names, vec!["title", "children", "author"]);
}

#[test]
fn test_duplicates_collapse() {
    let fields = parse("title,title,viewCount").unwrap();
    assert_eq!(fields.len(), 2);
}

#[test]
fn test_unknown_field_rejected() {
    let error = parse("title,nope").unwrap_err();
    assert_eq!(
        error,
        Error::QueryParse {
            message: "Field 'nope' does not exist on resource type 'articles'.".to_string(),
            position: 6,
        }
    );
}

#[test]
fn test_dotted_chain_rejected() {
    // Exactly one field per entry; chains do not belong here.
    let error = parse("author.name").unwrap_err();
    assert!(matches!(error, Error::QueryParse { .. }));
}

#[test]
fn test_dangling_comma_rejected() {
    let error = parse("title,").unwrap_err();
    assert_eq!(
        error,
        Error::QueryParse {
            message: "Field name expected.".to_string(),
            position: 6,
        }
    );
}
