//! Shared resource graph fixtures for the integration tests

use std::sync::Arc;

use jsonapi_resource_graph::{ResourceGraph, ResourceType, ValueKind};

/// A blog-style schema: self-referencing `articles` with a to-one `author`
/// and `parent`, to-many `children` and `revisions`, and one attribute that
/// is neither filterable nor sortable.
pub fn blog_graph() -> Arc<ResourceGraph> {
    let graph = ResourceGraph::builder()
        .resource(
            ResourceType::builder("articles")
                .attribute("id", ValueKind::String)
                .attribute("title", ValueKind::String)
                .attribute("viewCount", ValueKind::Integer)
                .attribute("rating", ValueKind::Decimal)
                .attribute("published", ValueKind::Boolean)
                .attribute("createdAt", ValueKind::DateTime)
                .attribute_with("internalNotes", ValueKind::String, false, false)
                .to_one("author", "people")
                .to_one("parent", "articles")
                .to_many("children", "articles")
                .to_many("revisions", "revisions")
                .build(),
        )
        .resource(
            ResourceType::builder("people")
                .attribute("id", ValueKind::String)
                .attribute("name", ValueKind::String)
                .to_many("articles", "articles")
                .build(),
        )
        .resource(
            ResourceType::builder("revisions")
                .attribute("id", ValueKind::String)
                .attribute("number", ValueKind::Integer)
                .attribute("publishedAt", ValueKind::DateTime)
                .build(),
        )
        .build()
        .unwrap();
    Arc::new(graph)
}

/// An inheritance schema: `shelters` holding `animals`, with `dogs` and
/// `cats` both deriving from `animals`. Both derived types declare a
/// `nickname` attribute (ambiguous from the base); `barkVolume` exists only
/// on `dogs`.
pub fn shelter_graph() -> Arc<ResourceGraph> {
    let graph = ResourceGraph::builder()
        .resource(
            ResourceType::builder("shelters")
                .attribute("id", ValueKind::String)
                .to_many("animals", "animals")
                .build(),
        )
        .resource(
            ResourceType::builder("animals")
                .attribute("id", ValueKind::String)
                .attribute("weight", ValueKind::Decimal)
                .build(),
        )
        .resource(
            ResourceType::builder("dogs")
                .base("animals")
                .attribute("nickname", ValueKind::String)
                .attribute("barkVolume", ValueKind::Integer)
                .build(),
        )
        .resource(
            ResourceType::builder("cats")
                .base("animals")
                .attribute("nickname", ValueKind::String)
                .build(),
        )
        .build()
        .unwrap();
    Arc::new(graph)
}

pub fn articles(graph: &Arc<ResourceGraph>) -> Arc<ResourceType> {
    graph.require("articles").unwrap().clone()
}
