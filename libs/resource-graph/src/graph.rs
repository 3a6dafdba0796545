//! The resource type graph
//!
//! Holds every resource type by name plus the base → derived adjacency used
//! for inheritance-aware field lookup. Built once, then read-only.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::field::Field;
use crate::resource::ResourceType;

/// Immutable graph of resource types.
#[derive(Debug, Clone)]
pub struct ResourceGraph {
    types: HashMap<String, Arc<ResourceType>>,
    /// Base type name → directly derived type names, in registration order.
    derived: HashMap<String, Vec<String>>,
}

impl ResourceGraph {
    pub fn builder() -> ResourceGraphBuilder {
        ResourceGraphBuilder { types: Vec::new() }
    }

    pub fn resource_type(&self, name: &str) -> Option<&Arc<ResourceType>> {
        self.types.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&Arc<ResourceType>> {
        self.types
            .get(name)
            .ok_or_else(|| Error::UnknownResourceType(name.to_string()))
    }

    /// Look up a field on `resource_type`, including fields inherited from
    /// its base chain.
    pub fn field<'a>(&'a self, resource_type: &'a ResourceType, name: &str) -> Option<&'a Field> {
        let mut current = Some(resource_type);
        while let Some(ty) = current {
            if let Some(field) = ty.declared_field(name) {
                return Some(field);
            }
            current = ty.base().and_then(|base| self.types.get(base)).map(Arc::as_ref);
        }
        None
    }

    /// Resource types directly deriving from `name`.
    pub fn directly_derived(&self, name: &str) -> &[String] {
        self.derived.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All resource types transitively deriving from `resource_type`, in
    /// breadth-first order.
    pub fn derived_closure(&self, resource_type: &ResourceType) -> Vec<&Arc<ResourceType>> {
        let mut result = Vec::new();
        let mut queue: Vec<&str> = self
            .directly_derived(resource_type.name())
            .iter()
            .map(String::as_str)
            .collect();

        let mut index = 0;
        while index < queue.len() {
            let name = queue[index];
            index += 1;
            if let Some(ty) = self.types.get(name) {
                result.push(ty);
                queue.extend(self.directly_derived(name).iter().map(String::as_str));
            }
        }
        result
    }

    /// Whether `resource_type` equals or derives (transitively) from the type
    /// named `ancestor`.
    pub fn is_or_derives_from(&self, resource_type: &ResourceType, ancestor: &str) -> bool {
        let mut current = Some(resource_type);
        while let Some(ty) = current {
            if ty.name() == ancestor {
                return true;
            }
            current = ty.base().and_then(|base| self.types.get(base)).map(Arc::as_ref);
        }
        false
    }

    /// Search the derived closure of `resource_type` for declarations of the
    /// field named `name`.
    ///
    /// A declaration whose type has an ancestor (inside the closure) that also
    /// declares the field is an override of the same logical field and is
    /// dropped, so the result holds one entry per distinct logical field. The
    /// caller inspects the length: zero (not found), one (unique match) or
    /// many (ambiguous reference).
    pub fn find_field_in_derived(
        &self,
        resource_type: &ResourceType,
        name: &str,
    ) -> Vec<(&Arc<ResourceType>, &Field)> {
        let declaring: Vec<(&Arc<ResourceType>, &Field)> = self
            .derived_closure(resource_type)
            .into_iter()
            .filter_map(|ty| ty.declared_field(name).map(|field| (ty, field)))
            .collect();

        let declaring_names: HashSet<&str> =
            declaring.iter().map(|(ty, _)| ty.name()).collect();

        declaring
            .into_iter()
            .filter(|(ty, _)| {
                // Drop overrides: keep only the topmost declaration on each
                // inheritance chain below `resource_type`.
                let mut current = ty.base();
                while let Some(base) = current {
                    if base == resource_type.name() {
                        break;
                    }
                    if declaring_names.contains(base) {
                        return false;
                    }
                    current = self
                        .types
                        .get(base)
                        .and_then(|base_ty| base_ty.base());
                }
                true
            })
            .collect()
    }
}

/// Builder that validates the graph before freezing it.
#[derive(Debug)]
pub struct ResourceGraphBuilder {
    types: Vec<ResourceType>,
}

impl ResourceGraphBuilder {
    pub fn resource(mut self, resource_type: ResourceType) -> Self {
        self.types.push(resource_type);
        self
    }

    pub fn build(self) -> Result<ResourceGraph> {
        let mut types: HashMap<String, Arc<ResourceType>> = HashMap::new();
        for ty in self.types {
            let name = ty.name().to_string();
            let mut seen = HashSet::new();
            for field in ty.declared_fields() {
                if !seen.insert(field.name()) {
                    return Err(Error::DuplicateField {
                        resource_type: name.clone(),
                        field: field.name().to_string(),
                    });
                }
            }
            if types.insert(name.clone(), Arc::new(ty)).is_some() {
                return Err(Error::DuplicateResourceType(name));
            }
        }

        let mut derived: HashMap<String, Vec<String>> = HashMap::new();
        for ty in types.values() {
            if let Some(base) = ty.base() {
                if !types.contains_key(base) {
                    return Err(Error::UnknownBaseType {
                        resource_type: ty.name().to_string(),
                        base: base.to_string(),
                    });
                }
                derived
                    .entry(base.to_string())
                    .or_default()
                    .push(ty.name().to_string());
            }
            for field in ty.declared_fields() {
                if let Some(target) = field.target() {
                    if !types.contains_key(target) {
                        return Err(Error::UnknownRelationshipTarget {
                            resource_type: ty.name().to_string(),
                            relationship: field.name().to_string(),
                            target: target.to_string(),
                        });
                    }
                }
            }
        }

        // Registration order is not deterministic through a HashMap; keep
        // derived lists sorted so lookups behave the same across runs.
        for siblings in derived.values_mut() {
            siblings.sort();
        }

        // Reject inheritance cycles so base-chain walks terminate.
        for ty in types.values() {
            let mut visited = HashSet::new();
            let mut current = Some(ty.as_ref());
            while let Some(step) = current {
                if !visited.insert(step.name().to_string()) {
                    return Err(Error::InheritanceCycle(ty.name().to_string()));
                }
                current = step
                    .base()
                    .and_then(|base| types.get(base))
                    .map(Arc::as_ref);
            }
        }

        Ok(ResourceGraph { types, derived })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ValueKind;

    fn sample_graph() -> ResourceGraph {
        ResourceGraph::builder()
            .resource(
                ResourceType::builder("vehicles")
                    .attribute("weight", ValueKind::Decimal)
                    .build(),
            )
            .resource(
                ResourceType::builder("cars")
                    .base("vehicles")
                    .attribute("doors", ValueKind::Integer)
                    .build(),
            )
            .resource(
                ResourceType::builder("trucks")
                    .base("vehicles")
                    .attribute("payload", ValueKind::Decimal)
                    .build(),
            )
            .resource(
                ResourceType::builder("sportsCars")
                    .base("cars")
                    .attribute("topSpeed", ValueKind::Integer)
                    .build(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_inherited_field_lookup() {
        let graph = sample_graph();
        let cars = graph.require("cars").unwrap().clone();

        assert!(graph.field(&cars, "doors").is_some());
        assert!(graph.field(&cars, "weight").is_some());
        assert!(graph.field(&cars, "payload").is_none());
    }

    #[test]
    fn test_derived_closure_is_transitive() {
        let graph = sample_graph();
        let vehicles = graph.require("vehicles").unwrap().clone();

        let names: Vec<&str> = graph
            .derived_closure(&vehicles)
            .into_iter()
            .map(|ty| ty.name())
            .collect();
        assert!(names.contains(&"cars"));
        assert!(names.contains(&"trucks"));
        assert!(names.contains(&"sportsCars"));
    }

    #[test]
    fn test_find_field_in_derived_unique() {
        let graph = sample_graph();
        let vehicles = graph.require("vehicles").unwrap().clone();

        let matches = graph.find_field_in_derived(&vehicles, "topSpeed");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].0.name(), "sportsCars");
    }

    #[test]
    fn test_find_field_in_derived_prunes_overrides() {
        let graph = ResourceGraph::builder()
            .resource(ResourceType::builder("animals").build())
            .resource(
                ResourceType::builder("dogs")
                    .base("animals")
                    .attribute("breed", ValueKind::String)
                    .build(),
            )
            .resource(
                ResourceType::builder("puppies")
                    .base("dogs")
                    .attribute("breed", ValueKind::String)
                    .build(),
            )
            .build()
            .unwrap();

        let animals = graph.require("animals").unwrap().clone();
        let matches = graph.find_field_in_derived(&animals, "breed");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].0.name(), "dogs");
    }

    #[test]
    fn test_find_field_in_derived_ambiguous() {
        let graph = sample_graph();
        let vehicles = graph.require("vehicles").unwrap().clone();

        // Unknown everywhere.
        assert!(graph.find_field_in_derived(&vehicles, "missing").is_empty());

        // Declared on two unrelated derived types.
        let graph = ResourceGraph::builder()
            .resource(ResourceType::builder("parents").build())
            .resource(
                ResourceType::builder("lefts")
                    .base("parents")
                    .attribute("shared", ValueKind::String)
                    .build(),
            )
            .resource(
                ResourceType::builder("rights")
                    .base("parents")
                    .attribute("shared", ValueKind::String)
                    .build(),
            )
            .build()
            .unwrap();
        let parents = graph.require("parents").unwrap().clone();
        assert_eq!(graph.find_field_in_derived(&parents, "shared").len(), 2);
    }

    #[test]
    fn test_builder_rejects_unknown_base() {
        let result = ResourceGraph::builder()
            .resource(ResourceType::builder("cars").base("vehicles").build())
            .build();
        assert!(matches!(result, Err(Error::UnknownBaseType { .. })));
    }

    #[test]
    fn test_builder_rejects_unknown_target() {
        let result = ResourceGraph::builder()
            .resource(
                ResourceType::builder("articles")
                    .to_one("author", "people")
                    .build(),
            )
            .build();
        assert!(matches!(result, Err(Error::UnknownRelationshipTarget { .. })));
    }

    #[test]
    fn test_builder_rejects_cycles() {
        let result = ResourceGraph::builder()
            .resource(ResourceType::builder("a").base("b").build())
            .resource(ResourceType::builder("b").base("a").build())
            .build();
        assert!(matches!(result, Err(Error::InheritanceCycle(_))));
    }
}
