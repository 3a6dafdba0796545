//! Field definitions: attributes and relationships
//!
//! A field is a closed variant over the three kinds a resource type can
//! declare. Relationships carry the name of their target resource type;
//! target resolution goes through the graph so that mutually-referencing
//! types need no back pointers.

use std::fmt;

/// Underlying value type of an attribute, used to validate filter literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Integer,
    Decimal,
    Boolean,
    DateTime,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "String",
            ValueKind::Integer => "Integer",
            ValueKind::Decimal => "Decimal",
            ValueKind::Boolean => "Boolean",
            ValueKind::DateTime => "DateTime",
        };
        write!(f, "{name}")
    }
}

/// The kind of a field, as tested by field-chain patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Attribute,
    ToOne,
    ToMany,
}

/// A leaf attribute with a typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Public name as used in query text.
    pub name: String,
    pub value_kind: ValueKind,
    /// Whether `filter` expressions may reference this attribute.
    pub filterable: bool,
    /// Whether `sort` expressions may reference this attribute.
    pub sortable: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value_kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            value_kind,
            filterable: true,
            sortable: true,
        }
    }
}

/// A relationship to exactly one resource of the target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToOneRelationship {
    pub name: String,
    /// Name of the target resource type.
    pub target: String,
}

/// A relationship to a collection of resources of the target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToManyRelationship {
    pub name: String,
    /// Name of the target resource type.
    pub target: String,
}

/// A field declared on a resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Attribute(Attribute),
    ToOne(ToOneRelationship),
    ToMany(ToManyRelationship),
}

impl Field {
    pub fn name(&self) -> &str {
        match self {
            Field::Attribute(attr) => &attr.name,
            Field::ToOne(rel) => &rel.name,
            Field::ToMany(rel) => &rel.name,
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Attribute(_) => FieldKind::Attribute,
            Field::ToOne(_) => FieldKind::ToOne,
            Field::ToMany(_) => FieldKind::ToMany,
        }
    }

    pub fn is_relationship(&self) -> bool {
        matches!(self, Field::ToOne(_) | Field::ToMany(_))
    }

    pub fn is_to_many(&self) -> bool {
        matches!(self, Field::ToMany(_))
    }

    /// Target resource type name, for relationships.
    pub fn target(&self) -> Option<&str> {
        match self {
            Field::Attribute(_) => None,
            Field::ToOne(rel) => Some(&rel.target),
            Field::ToMany(rel) => Some(&rel.target),
        }
    }

    pub fn as_attribute(&self) -> Option<&Attribute> {
        match self {
            Field::Attribute(attr) => Some(attr),
            _ => None,
        }
    }
}
