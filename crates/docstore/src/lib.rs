//! Embedded JSON document store.
//! - One directory per collection, one `<resource>.json` file per document.
//! - Writes land via temp file + rename and are serialized per collection.
//! - `AsyncDocumentStore` wraps the blocking engine for tokio callers.

pub mod errors;
pub mod storage;
pub mod repository;
pub mod file;
#[cfg(test)]
pub mod test_support;

pub use errors::{StoreError, StoreResult};
pub use file::async_store::AsyncDocumentStore;
pub use repository::DocumentRepository;
pub use storage::document_store::{DocumentStore, StoreOptions};
pub use storage::log_sink::{LogLevel, LogSink, NoopSink, TracingSink};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
