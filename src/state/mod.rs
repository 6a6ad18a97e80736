pub mod factory;
pub mod sled_store;
pub mod store;

pub use factory::{create_in_memory_store, create_store};
pub use sled_store::SledStore;
pub use store::*;

use crate::error::Result;
use crate::search::Predicate;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use strum::{Display, EnumIter};
use tracing::warn;

/// Named document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Collection {
    Properties,
    ContactSubmissions,
    Inquiries,
}

/// Document store over JSON documents keyed by id.
///
/// `find` yields documents in ascending id order on every backend, so
/// callers that stop early get a deterministic prefix.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert or overwrite a document
    async fn insert(&self, collection: Collection, id: &str, doc: Value) -> Result<()>;

    /// Fetch a document by id
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>>;

    /// Replace an existing document. Returns false if it does not exist.
    async fn replace(&self, collection: Collection, id: &str, doc: Value) -> Result<bool>;

    /// Delete a document. Returns false if it does not exist.
    async fn delete(&self, collection: Collection, id: &str) -> Result<bool>;

    /// Documents matching `predicate`, at most `limit` of them
    async fn find(
        &self,
        collection: Collection,
        predicate: &Predicate,
        limit: Option<usize>,
    ) -> Result<Vec<Value>>;
}

/// Decode store documents, logging and skipping the ones that do not parse
pub(crate) fn decode_all<T: DeserializeOwned>(docs: Vec<Value>, kind: &'static str) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| {
            let id = doc.get("id").cloned().unwrap_or(Value::Null);
            match serde_json::from_value(doc) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(kind, id = %id, error = %e, "Skipping malformed document");
                    None
                }
            }
        })
        .collect()
}
