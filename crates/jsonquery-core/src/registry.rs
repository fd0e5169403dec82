//! Named sources the engine can query.
//!
//! The registry is plain bookkeeping: a map from source name to the element
//! [`Schema`] and a type-erased [`Collection`] handle. Registration needs
//! `&mut SourceRegistry` and queries only need `&SourceRegistry`, so the
//! single-writer/many-reader discipline is enforced by the borrow checker.
//! Once every source is registered the registry can be shared across threads.

use crate::error::{Error, Result};
use crate::schema::Schema;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Read-only, ordered access to the elements of a registered collection.
///
/// The engine never mutates a collection. Owners must not mutate it while a
/// query is running.
pub trait Collection: Send + Sync {
    /// Number of elements
    fn element_count(&self) -> usize;

    /// Elements in source order
    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Any> + '_>;
}

impl<T: Any + Send + Sync> Collection for Vec<T> {
    fn element_count(&self) -> usize {
        self.as_slice().len()
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Any> + '_> {
        Box::new(self.as_slice().iter().map(|e| e as &dyn Any))
    }
}

impl<T: Any + Send + Sync> Collection for Arc<[T]> {
    fn element_count(&self) -> usize {
        <[T]>::len(self)
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Any> + '_> {
        Box::new(<[T]>::iter(self).map(|e| e as &dyn Any))
    }
}

impl<T: Any + Send + Sync> Collection for Arc<Vec<T>> {
    fn element_count(&self) -> usize {
        self.as_slice().len()
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Any> + '_> {
        Box::new(self.as_slice().iter().map(|e| e as &dyn Any))
    }
}

/// What to do when a name is registered twice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail the registration with a validation error
    #[default]
    Reject,
    /// Replace the existing source
    Replace,
}

/// A registered collection and its element descriptor
#[derive(Clone)]
pub struct Source {
    name: String,
    schema: Schema,
    collection: Arc<dyn Collection>,
}

impl Source {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn collection(&self) -> &dyn Collection {
        self.collection.as_ref()
    }

    /// Shared handle to the collection
    pub fn handle(&self) -> Arc<dyn Collection> {
        Arc::clone(&self.collection)
    }
}

/// Map from source name to registered source
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: HashMap<String, Source>,
    policy: DuplicatePolicy,
}

impl SourceRegistry {
    /// Creates an empty registry that rejects duplicate names
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with the given duplicate policy
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            sources: HashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Register `collection` under `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        schema: Schema,
        collection: Arc<dyn Collection>,
    ) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::Validation("Source name cannot be empty".to_string()));
        }

        if self.sources.contains_key(&name) {
            match self.policy {
                DuplicatePolicy::Reject => {
                    return Err(Error::Validation(format!(
                        "Queryable '{}' is already registered",
                        name
                    )));
                }
                DuplicatePolicy::Replace => {
                    warn!(source = %name, "replacing registered queryable");
                }
            }
        }

        debug!(
            source = %name,
            element = schema.root().type_name(),
            elements = collection.element_count(),
            "registered queryable"
        );
        self.sources.insert(
            name.clone(),
            Source {
                name,
                schema,
                collection,
            },
        );
        Ok(())
    }

    /// Look up a source by name.
    pub fn get(&self, name: &str) -> Result<&Source> {
        self.sources
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Unregister a source, returning whether it existed
    pub fn remove(&mut self, name: &str) -> bool {
        self.sources.remove(name).is_some()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sources.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::schema::SchemaBuilder;

    struct Item {
        id: i64,
    }

    fn schema() -> Schema {
        SchemaBuilder::<Item>::new()
            .field("Id", |i: &Item| i.id)
            .build()
    }

    fn items(n: i64) -> Arc<dyn Collection> {
        Arc::new((1..=n).map(|id| Item { id }).collect::<Vec<_>>())
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = SourceRegistry::new();
        registry.register("items", schema(), items(3)).unwrap();

        let source = registry.get("items").unwrap();
        assert_eq!(source.name(), "items");
        assert_eq!(source.collection().element_count(), 3);
        assert!(registry.contains("items"));
    }

    #[test]
    fn test_unknown_source_is_not_found() {
        let registry = SourceRegistry::new();
        let err = registry.get("missing").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_duplicate_rejected_by_default() {
        let mut registry = SourceRegistry::new();
        registry.register("items", schema(), items(1)).unwrap();
        let err = registry.register("items", schema(), items(2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(registry.get("items").unwrap().collection().element_count(), 1);
    }

    #[test]
    fn test_duplicate_replaced_when_configured() {
        let mut registry = SourceRegistry::with_policy(DuplicatePolicy::Replace);
        registry.register("items", schema(), items(1)).unwrap();
        registry.register("items", schema(), items(2)).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("items").unwrap().collection().element_count(), 2);
    }

    #[test]
    fn test_names_sorted_and_remove() {
        let mut registry = SourceRegistry::new();
        registry.register("b", schema(), items(1)).unwrap();
        registry.register("a", schema(), items(1)).unwrap();
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);

        assert!(registry.remove("a"));
        assert!(!registry.remove("a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_collection_iterates_in_source_order() {
        let collection = items(4);
        let ids: Vec<i64> = collection
            .elements()
            .map(|e| e.downcast_ref::<Item>().unwrap().id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_vec_iter_unaffected_by_collection_impl() {
        let values: Vec<i32> = vec![1, 2, 3];
        let doubled: Vec<i32> = values.iter().map(|v| v * 2).collect();
        assert_eq!(doubled, vec![2, 4, 6]);
        assert_eq!(values.len(), values.element_count());

        let shared = Arc::new(values);
        assert_eq!(shared.iter().sum::<i32>(), 6);
        assert_eq!(shared.len(), 3);
    }
}
