use std::{io, path::PathBuf, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::{StoreError, StoreResult};
use crate::repository::DocumentRepository;
use crate::storage::document_store::{DocumentStore, StoreOptions};

/// Async handle over [`DocumentStore`].
/// Every call runs on tokio's blocking pool so file I/O never stalls the runtime.
#[derive(Clone, Debug)]
pub struct AsyncDocumentStore {
    inner: Arc<DocumentStore>,
}

impl AsyncDocumentStore {
    /// Open (or create) the store root on the blocking pool.
    pub async fn open<P: Into<PathBuf>>(root: P, options: StoreOptions) -> StoreResult<Arc<Self>> {
        let root = root.into();
        let store = run_blocking(move || DocumentStore::open_with(root, options)).await?;
        Ok(Arc::new(Self { inner: Arc::new(store) }))
    }

    pub fn from_store(store: Arc<DocumentStore>) -> Self {
        Self { inner: store }
    }

    /// Underlying blocking store.
    pub fn blocking(&self) -> &Arc<DocumentStore> {
        &self.inner
    }

    pub async fn write<T>(&self, collection: &str, resource: &str, value: T) -> StoreResult<()>
    where
        T: Serialize + Send + 'static,
    {
        let store = self.inner.clone();
        let (collection, resource) = (collection.to_string(), resource.to_string());
        run_blocking(move || store.write(&collection, &resource, &value)).await
    }

    pub async fn read<T>(&self, collection: &str, resource: &str) -> StoreResult<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let store = self.inner.clone();
        let (collection, resource) = (collection.to_string(), resource.to_string());
        run_blocking(move || store.read(&collection, &resource)).await
    }

    pub async fn read_all(&self, collection: &str) -> StoreResult<Vec<String>> {
        let store = self.inner.clone();
        let collection = collection.to_string();
        run_blocking(move || store.read_all(&collection)).await
    }

    pub async fn read_all_as<T>(&self, collection: &str) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let store = self.inner.clone();
        let collection = collection.to_string();
        run_blocking(move || store.read_all_as(&collection)).await
    }

    /// Same hazard as [`DocumentStore::delete`]: an empty `resource` drops the collection.
    pub async fn delete(&self, collection: &str, resource: &str) -> StoreResult<()> {
        let store = self.inner.clone();
        let (collection, resource) = (collection.to_string(), resource.to_string());
        run_blocking(move || store.delete(&collection, &resource)).await
    }

    pub async fn delete_collection(&self, collection: &str) -> StoreResult<()> {
        let store = self.inner.clone();
        let collection = collection.to_string();
        run_blocking(move || store.delete_collection(&collection)).await
    }
}

async fn run_blocking<F, R>(f: F) -> StoreResult<R>
where
    F: FnOnce() -> StoreResult<R> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Io(io::Error::new(io::ErrorKind::Other, e)))?
}

#[async_trait::async_trait]
impl DocumentRepository for AsyncDocumentStore {
    async fn write(&self, collection: &str, resource: &str, value: Value) -> StoreResult<()> {
        self.write(collection, resource, value).await
    }

    async fn read(&self, collection: &str, resource: &str) -> StoreResult<Value> {
        self.read(collection, resource).await
    }

    async fn read_all(&self, collection: &str) -> StoreResult<Vec<String>> {
        self.read_all(collection).await
    }

    async fn delete(&self, collection: &str, resource: &str) -> StoreResult<()> {
        self.delete(collection, resource).await
    }

    async fn delete_collection(&self, collection: &str) -> StoreResult<()> {
        self.delete_collection(collection).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::log_sink::NoopSink;
    use crate::test_support::TempRoot;
    use serde_json::json;

    fn quiet() -> StoreOptions {
        StoreOptions::default().with_sink(Arc::new(NoopSink))
    }

    #[tokio::test]
    async fn async_store_basic_crud() -> Result<(), anyhow::Error> {
        let tmp = TempRoot::new("async_crud");
        let store = AsyncDocumentStore::open(tmp.path().join("db"), quiet()).await?;

        // write and read back
        store.write("users", "alice", json!({ "age": 30 })).await?;
        store.write("users", "bob", json!({ "age": 41 })).await?;
        let alice: Value = store.read("users", "alice").await?;
        assert_eq!(alice["age"], 30);
        assert_eq!(store.read_all("users").await?.len(), 2);

        // delete one, then the whole collection
        store.delete("users", "alice").await?;
        assert!(matches!(store.read::<Value>("users", "alice").await, Err(StoreError::NotFound(_))));
        store.delete_collection("users").await?;
        assert!(matches!(store.read_all("users").await, Err(StoreError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn repository_trait_object_round_trips() -> Result<(), anyhow::Error> {
        let tmp = TempRoot::new("async_repo");
        let store = AsyncDocumentStore::open(tmp.path(), quiet()).await?;
        let repo: Arc<dyn DocumentRepository> = store;

        repo.write("teams", "mclaren", json!({ "drivers": ["Lando", "Oscar"] })).await?;
        let team = repo.read("teams", "mclaren").await?;
        assert_eq!(team["drivers"][1], "Oscar");

        let raw = repo.read_all("teams").await?;
        assert!(raw[0].ends_with("}\n"));

        repo.delete("teams", "").await?;
        assert!(matches!(repo.read_all("teams").await, Err(StoreError::NotFound(_))));
        assert!(matches!(repo.write("", "x", json!(1)).await, Err(StoreError::InvalidArgument(_))));
        Ok(())
    }

    #[tokio::test]
    async fn shares_locks_with_blocking_handle() -> Result<(), anyhow::Error> {
        let tmp = TempRoot::new("async_shared");
        let blocking = Arc::new(DocumentStore::open_with(tmp.path(), quiet())?);
        let store = AsyncDocumentStore::from_store(blocking.clone());

        store.write("users", "carol", json!({ "age": 22 })).await?;
        let carol: Value = blocking.read("users", "carol")?;
        assert_eq!(carol["age"], 22);
        assert!(Arc::ptr_eq(store.blocking(), &blocking));
        Ok(())
    }
}
