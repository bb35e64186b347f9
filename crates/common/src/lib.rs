//! Shared process-level helpers for docstore binaries.

pub mod utils;
