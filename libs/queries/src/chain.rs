//! Resolved field chains
//!
//! A field chain is the ordered, fully resolved result of matching dotted
//! field-reference text against the resource graph. Every entry knows the
//! concrete resource type it was resolved against, which may be a derived
//! type of the type the chain entered with.

use std::fmt;
use std::sync::Arc;

use jsonapi_resource_graph::{Field, ResourceGraph, ResourceType};
use smallvec::SmallVec;

/// One resolved segment of a field chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    /// The concrete (possibly derived) resource type the segment was
    /// resolved against.
    pub resource_type: Arc<ResourceType>,
    pub field: Field,
}

/// An ordered, non-empty sequence of resolved fields.
///
/// Chains are cheap to clone; realistic paths fit inline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldChain {
    fields: SmallVec<[ResolvedField; 4]>,
}

impl FieldChain {
    pub fn new(fields: SmallVec<[ResolvedField; 4]>) -> Self {
        Self { fields }
    }

    pub fn single(field: ResolvedField) -> Self {
        let mut fields = SmallVec::new();
        fields.push(field);
        Self { fields }
    }

    pub fn fields(&self) -> &[ResolvedField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn last(&self) -> Option<&ResolvedField> {
        self.fields.last()
    }

    pub fn push(&mut self, field: ResolvedField) {
        self.fields.push(field);
    }

    /// Whether every field in the chain is a to-many relationship.
    pub fn is_to_many_only(&self) -> bool {
        self.fields.iter().all(|entry| entry.field.is_to_many())
    }

    /// The resource type reached after traversing the whole chain: the
    /// target of the last relationship, or the resolved type itself when the
    /// chain ends in an attribute.
    pub fn tail_type(&self, graph: &ResourceGraph) -> Option<Arc<ResourceType>> {
        let last = self.fields.last()?;
        match last.field.target() {
            Some(target) => graph.resource_type(target).cloned(),
            None => Some(last.resource_type.clone()),
        }
    }
}

impl fmt::Display for FieldChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.fields.iter().enumerate() {
            if index > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", entry.field.name())?;
        }
        Ok(())
    }
}
