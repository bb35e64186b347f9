#![cfg(test)]
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Unique scratch directory under the system temp dir, removed on drop.
pub struct TempRoot {
    path: PathBuf,
}

impl TempRoot {
    pub fn new(prefix: &str) -> Self {
        let path = std::env::temp_dir().join(format!("docstore_{}_{}", prefix, Uuid::new_v4()));
        std::fs::create_dir_all(&path).expect("create temp root");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
