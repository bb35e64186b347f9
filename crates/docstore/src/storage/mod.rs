//! File-backed document storage.
//!
//! - `path_resolver`: `(collection, resource)` to on-disk path mapping
//! - `mutex_registry`: one exclusive lock per collection
//! - `document_store`: the blocking engine built on top of both
//! - `log_sink`: where lifecycle messages go

pub mod document_store;
pub mod log_sink;
pub mod mutex_registry;
pub mod path_resolver;
