//! Resource type graph for JSON:API query parsing
//!
//! Provides the read-only schema that query-string parsing resolves field
//! references against: resource types with attributes and relationships
//! (to-one / to-many), plus type inheritance with base/derived adjacency.
//!
//! The graph is built once at process start and never mutated afterwards, so
//! it can be shared freely across request handlers without locking.

pub mod error;
pub mod field;
pub mod graph;
pub mod resource;

pub use error::{Error, Result};
pub use field::{Attribute, Field, FieldKind, ToManyRelationship, ToOneRelationship, ValueKind};
pub use graph::{ResourceGraph, ResourceGraphBuilder};
pub use resource::{ResourceType, ResourceTypeBuilder};
