use crate::error::Result;
use crate::search::Predicate;
use crate::state::{Collection, DocumentStore};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use strum::IntoEnumIterator;

/// In-memory document store (for development and testing)
#[derive(Clone)]
pub struct InMemoryStore {
    collections: Arc<HashMap<Collection, DashMap<String, Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        let collections = Collection::iter()
            .map(|collection| (collection, DashMap::new()))
            .collect();

        Self {
            collections: Arc::new(collections),
        }
    }

    fn collection(&self, collection: Collection) -> &DashMap<String, Value> {
        // every variant is inserted in `new`
        &self.collections[&collection]
    }

    /// Number of documents in a collection
    pub fn len(&self, collection: Collection) -> usize {
        self.collection(collection).len()
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.collection(collection).is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert(&self, collection: Collection, id: &str, doc: Value) -> Result<()> {
        self.collection(collection).insert(id.to_string(), doc);
        tracing::debug!(%collection, id, "Document saved");
        Ok(())
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        Ok(self
            .collection(collection)
            .get(id)
            .map(|entry| entry.value().clone()))
    }

    async fn replace(&self, collection: Collection, id: &str, doc: Value) -> Result<bool> {
        match self.collection(collection).get_mut(id) {
            Some(mut entry) => {
                *entry = doc;
                tracing::debug!(%collection, id, "Document replaced");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        let removed = self.collection(collection).remove(id).is_some();
        if removed {
            tracing::debug!(%collection, id, "Document deleted");
        }
        Ok(removed)
    }

    async fn find(
        &self,
        collection: Collection,
        predicate: &Predicate,
        limit: Option<usize>,
    ) -> Result<Vec<Value>> {
        let mut matches: Vec<(String, Value)> = self
            .collection(collection)
            .iter()
            .filter(|entry| predicate.matches(entry.value()))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        // DashMap iteration order is arbitrary
        matches.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(matches
            .into_iter()
            .map(|(_, doc)| doc)
            .take(limit.unwrap_or(usize::MAX))
            .collect())
    }
}
