//! Maps `(collection, resource)` pairs onto the on-disk layout
//! `<root>/<collection>/<resource>.json`.

use std::{
    fs::{self, Metadata},
    io,
    path::{Component, Path, PathBuf},
};

use crate::errors::{StoreError, StoreResult};

/// File suffix of every persisted resource.
pub const DOCUMENT_EXT: &str = "json";
/// Suffix appended to a resource path while its write is in flight.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Outcome of [`stat_flexible`].
#[derive(Debug)]
pub enum Resolution {
    /// The path exists exactly as given.
    Exact(PathBuf, Metadata),
    /// The path only exists once `.json` is appended.
    WithSuffix(PathBuf, Metadata),
    NotFound,
}

impl Resolution {
    /// Resolved path and metadata, if anything was found.
    pub fn found(&self) -> Option<(&Path, &Metadata)> {
        match self {
            Resolution::Exact(p, m) | Resolution::WithSuffix(p, m) => Some((p.as_path(), m)),
            Resolution::NotFound => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(collection)
    }

    /// Final location of a resource. Does not touch the filesystem.
    pub fn resolve(&self, collection: &str, resource: &str) -> PathBuf {
        self.collection_path(collection).join(format!("{}.{}", resource, DOCUMENT_EXT))
    }

    /// Sibling file a write lands in before being renamed over [`resolve`](Self::resolve).
    pub fn temp_path(&self, collection: &str, resource: &str) -> PathBuf {
        append_suffix(&self.resolve(collection, resource), TEMP_SUFFIX)
    }

    /// Unsuffixed path used by flexible lookups (`Delete` with or without a resource).
    pub fn bare_path(&self, collection: &str, resource: &str) -> PathBuf {
        let dir = self.collection_path(collection);
        if resource.is_empty() { dir } else { dir.join(resource) }
    }
}

/// Stat `path`, falling back to `path + ".json"` when the exact path is absent.
///
/// Only a missing file maps to [`Resolution::NotFound`]; every other I/O
/// failure is returned as an error.
pub fn stat_flexible(path: &Path) -> io::Result<Resolution> {
    match fs::metadata(path) {
        Ok(meta) => return Ok(Resolution::Exact(path.to_path_buf(), meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let suffixed = append_suffix(path, &format!(".{}", DOCUMENT_EXT));
    match fs::metadata(&suffixed) {
        Ok(meta) => Ok(Resolution::WithSuffix(suffixed, meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Resolution::NotFound),
        Err(e) => Err(e),
    }
}

/// Whether `path` is a finished document rather than an in-flight temp file.
pub fn is_document_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == DOCUMENT_EXT)
}

/// Check a caller-supplied name: non-empty, and every `/`-separated segment a
/// plain directory or file name. `.`, `..`, empty segments and absolute paths
/// are rejected so one name maps to exactly one directory and lock key.
pub fn validate_name(kind: &str, name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(StoreError::invalid(kind));
    }
    let bad_segment = name
        .split(std::path::is_separator)
        .any(|seg| seg.is_empty() || seg == "." || seg == "..");
    let not_plain = Path::new(name)
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if bad_segment || not_plain {
        return Err(StoreError::InvalidArgument(format!(
            "{} name '{}' must be plain segments inside the store root",
            kind, name
        )));
    }
    Ok(())
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TempRoot;

    #[test]
    fn resolve_builds_layout_without_touching_disk() {
        let r = PathResolver::new("/data");
        assert_eq!(r.resolve("users", "max"), PathBuf::from("/data/users/max.json"));
        assert_eq!(r.temp_path("users", "max"), PathBuf::from("/data/users/max.json.tmp"));
        assert_eq!(r.bare_path("users", ""), PathBuf::from("/data/users"));
        assert_eq!(r.bare_path("users", "max"), PathBuf::from("/data/users/max"));
    }

    #[test]
    fn stat_flexible_prefers_exact_then_suffix() -> Result<(), anyhow::Error> {
        let tmp = TempRoot::new("resolver");
        let dir = tmp.path().join("users");
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("max.json"), "{}\n")?;

        assert!(matches!(stat_flexible(&dir)?, Resolution::Exact(_, ref m) if m.is_dir()));
        match stat_flexible(&dir.join("max"))? {
            Resolution::WithSuffix(p, m) => {
                assert_eq!(p, dir.join("max.json"));
                assert!(m.is_file());
            }
            other => panic!("expected suffixed match, got {:?}", other),
        }
        assert!(matches!(stat_flexible(&dir.join("nobody"))?, Resolution::NotFound));
        Ok(())
    }

    #[test]
    fn names_are_validated() {
        assert!(validate_name("collection", "users").is_ok());
        assert!(validate_name("collection", "tenants/acme").is_ok());
        assert!(matches!(validate_name("collection", ""), Err(StoreError::InvalidArgument(_))));
        assert!(matches!(validate_name("resource", "../etc"), Err(StoreError::InvalidArgument(_))));
        assert!(matches!(validate_name("resource", "/abs"), Err(StoreError::InvalidArgument(_))));
    }

    #[test]
    fn dot_segments_and_aliases_are_rejected() {
        for name in [".", "./users", "users/.", "users/", "a//b", "users/./x", "..", "a/../b"] {
            assert!(
                matches!(validate_name("collection", name), Err(StoreError::InvalidArgument(_))),
                "accepted {:?}",
                name
            );
        }
    }

    #[test]
    fn temp_files_are_not_documents() {
        assert!(is_document_file(Path::new("a/max.json")));
        assert!(!is_document_file(Path::new("a/max.json.tmp")));
    }
}
