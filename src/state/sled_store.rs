use crate::error::{AppError, Result};
use crate::search::Predicate;
use crate::state::{Collection, DocumentStore};
use async_trait::async_trait;
use serde_json::Value;
use sled::Db;
use std::path::Path;
use std::sync::Arc;

/// Persistent document store using the Sled embedded database.
///
/// One tree per collection; keys are document ids, values JSON bytes. Sled
/// iterates keys in byte order, which gives `find` its id ordering.
#[derive(Clone)]
pub struct SledStore {
    db: Arc<Db>,
}

impl SledStore {
    /// Create a new Sled store at the specified path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path.as_ref()).map_err(|e| {
            AppError::Database(format!("Failed to open Sled database: {}", e))
        })?;

        tracing::info!("Initialized Sled store at {:?}", path.as_ref());

        Ok(Self { db: Arc::new(db) })
    }

    fn tree(&self, collection: Collection) -> Result<sled::Tree> {
        self.db.open_tree(collection.to_string()).map_err(|e| {
            AppError::Database(format!("Failed to open {} tree: {}", collection, e))
        })
    }

    fn encode(doc: &Value) -> Result<Vec<u8>> {
        serde_json::to_vec(doc)
            .map_err(|e| AppError::Serialization(format!("Failed to encode document: {}", e)))
    }

    fn decode(bytes: &[u8]) -> Result<Value> {
        serde_json::from_slice(bytes)
            .map_err(|e| AppError::Serialization(format!("Failed to decode document: {}", e)))
    }

    /// Flush pending writes to disk
    pub async fn flush(&self) -> Result<()> {
        self.db
            .flush_async()
            .await
            .map_err(|e| AppError::Database(format!("Failed to flush database: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SledStore {
    async fn insert(&self, collection: Collection, id: &str, doc: Value) -> Result<()> {
        let tree = self.tree(collection)?;
        tree.insert(id.as_bytes(), Self::encode(&doc)?)?;
        tree.flush_async().await?;

        tracing::debug!(%collection, id, "Document saved to Sled");
        Ok(())
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        match self.tree(collection)?.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn replace(&self, collection: Collection, id: &str, doc: Value) -> Result<bool> {
        let tree = self.tree(collection)?;
        if !tree.contains_key(id.as_bytes())? {
            return Ok(false);
        }

        tree.insert(id.as_bytes(), Self::encode(&doc)?)?;
        tree.flush_async().await?;

        tracing::debug!(%collection, id, "Document replaced in Sled");
        Ok(true)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        let tree = self.tree(collection)?;
        let removed = tree.remove(id.as_bytes())?.is_some();
        if removed {
            tree.flush_async().await?;
            tracing::debug!(%collection, id, "Document deleted from Sled");
        }
        Ok(removed)
    }

    async fn find(
        &self,
        collection: Collection,
        predicate: &Predicate,
        limit: Option<usize>,
    ) -> Result<Vec<Value>> {
        let limit = limit.unwrap_or(usize::MAX);
        let mut docs = Vec::new();

        for entry in self.tree(collection)?.iter() {
            if docs.len() >= limit {
                break;
            }

            let (key, bytes) = entry?;
            // Undecodable bytes are left for the caller's per-document handling
            let doc = match Self::decode(&bytes) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!(
                        %collection,
                        key = %String::from_utf8_lossy(&key),
                        error = %e,
                        "Skipping undecodable document"
                    );
                    continue;
                }
            };

            if predicate.matches(&doc) {
                docs.push(doc);
            }
        }

        Ok(docs)
    }
}
