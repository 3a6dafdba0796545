//! Error types for the resource type graph

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Resource type '{0}' does not exist")]
    UnknownResourceType(String),

    #[error("Resource type '{0}' is defined more than once")]
    DuplicateResourceType(String),

    #[error("Field '{field}' is defined more than once on resource type '{resource_type}'")]
    DuplicateField {
        resource_type: String,
        field: String,
    },

    #[error("Resource type '{resource_type}' derives from unknown base type '{base}'")]
    UnknownBaseType {
        resource_type: String,
        base: String,
    },

    #[error("Relationship '{relationship}' on resource type '{resource_type}' targets unknown resource type '{target}'")]
    UnknownRelationshipTarget {
        resource_type: String,
        relationship: String,
        target: String,
    },

    #[error("Resource type '{0}' participates in an inheritance cycle")]
    InheritanceCycle(String),
}

pub type Result<T> = std::result::Result<T, Error>;
