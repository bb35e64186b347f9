use crate::errors::StoreResult;
use async_trait::async_trait;
use serde_json::Value;

/// Trait abstraction for document storage keyed by `(collection, resource)`.
/// Object-safe so callers can hold an `Arc<dyn DocumentRepository>`.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn write(&self, collection: &str, resource: &str, value: Value) -> StoreResult<()>;
    async fn read(&self, collection: &str, resource: &str) -> StoreResult<Value>;
    async fn read_all(&self, collection: &str) -> StoreResult<Vec<String>>;
    /// An empty `resource` deletes the whole collection.
    async fn delete(&self, collection: &str, resource: &str) -> StoreResult<()>;
    async fn delete_collection(&self, collection: &str) -> StoreResult<()>;
}
