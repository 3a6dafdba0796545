//! Resource type definitions

use crate::field::{Attribute, Field, ToManyRelationship, ToOneRelationship, ValueKind};

/// A named schema entry with its directly declared fields.
///
/// Inherited fields are not duplicated here; lookups that must see the base
/// type's fields go through [`crate::ResourceGraph`], which walks the base
/// chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceType {
    name: String,
    base: Option<String>,
    fields: Vec<Field>,
}

impl ResourceType {
    pub fn builder(name: impl Into<String>) -> ResourceTypeBuilder {
        ResourceTypeBuilder {
            name: name.into(),
            base: None,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the base type this type derives from, if any.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Fields declared directly on this type, in declaration order.
    pub fn declared_fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a directly declared field by public name.
    pub fn declared_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name() == name)
    }
}

/// Fluent builder for a [`ResourceType`].
#[derive(Debug)]
pub struct ResourceTypeBuilder {
    name: String,
    base: Option<String>,
    fields: Vec<Field>,
}

impl ResourceTypeBuilder {
    /// Mark this type as deriving from `base`.
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Add an attribute that allows both filtering and sorting.
    pub fn attribute(mut self, name: impl Into<String>, value_kind: ValueKind) -> Self {
        self.fields.push(Field::Attribute(Attribute::new(name, value_kind)));
        self
    }

    /// Add an attribute with explicit capability flags.
    pub fn attribute_with(
        mut self,
        name: impl Into<String>,
        value_kind: ValueKind,
        filterable: bool,
        sortable: bool,
    ) -> Self {
        self.fields.push(Field::Attribute(Attribute {
            name: name.into(),
            value_kind,
            filterable,
            sortable,
        }));
        self
    }

    pub fn to_one(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.fields.push(Field::ToOne(ToOneRelationship {
            name: name.into(),
            target: target.into(),
        }));
        self
    }

    pub fn to_many(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.fields.push(Field::ToMany(ToManyRelationship {
            name: name.into(),
            target: target.into(),
        }));
        self
    }

    pub fn build(self) -> ResourceType {
        ResourceType {
            name: self.name,
            base: self.base,
            fields: self.fields,
        }
    }
}
