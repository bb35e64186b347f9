use std::{
    fmt,
    fs::{self, DirBuilder, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::{StoreError, StoreResult};
use crate::storage::log_sink::{LogLevel, LogSink, TracingSink};
use crate::storage::mutex_registry::{acquire, MutexRegistry};
use crate::storage::path_resolver::{is_document_file, stat_flexible, validate_name, PathResolver, Resolution};

/// Knobs accepted by [`DocumentStore::open_with`].
#[derive(Clone)]
pub struct StoreOptions {
    pub sink: Arc<dyn LogSink>,
    /// Mode for the root and collection directories (Unix only).
    pub dir_mode: u32,
    /// Mode for resource files (Unix only).
    pub file_mode: u32,
    /// fsync the temp file before renaming it into place.
    pub sync_writes: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { sink: Arc::new(TracingSink), dir_mode: 0o755, file_mode: 0o644, sync_writes: true }
    }
}

impl StoreOptions {
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }
}

impl fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreOptions")
            .field("dir_mode", &format_args!("{:o}", self.dir_mode))
            .field("file_mode", &format_args!("{:o}", self.file_mode))
            .field("sync_writes", &self.sync_writes)
            .finish_non_exhaustive()
    }
}

/// Directory-backed JSON document store.
///
/// Every resource lives in `<root>/<collection>/<resource>.json`. Writes and
/// deletes are serialized per collection; reads take no lock and rely on the
/// temp-file + rename sequence to never observe a torn document.
///
/// Only one process may use a given root at a time.
pub struct DocumentStore {
    paths: PathResolver,
    locks: MutexRegistry,
    sink: Arc<dyn LogSink>,
    dir_mode: u32,
    file_mode: u32,
    sync_writes: bool,
}

impl fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("root", &self.paths.root())
            .field("collections_locked", &self.locks.len())
            .finish_non_exhaustive()
    }
}

impl DocumentStore {
    /// Open (or create) a store rooted at `root` with default options.
    pub fn open<P: Into<PathBuf>>(root: P) -> StoreResult<Self> {
        Self::open_with(root, StoreOptions::default())
    }

    /// Open (or create) a store rooted at `root`. Reusing an existing
    /// directory is not an error and leaves its contents untouched.
    pub fn open_with<P: Into<PathBuf>>(root: P, options: StoreOptions) -> StoreResult<Self> {
        let store = Self {
            paths: PathResolver::new(root),
            locks: MutexRegistry::new(),
            sink: options.sink,
            dir_mode: options.dir_mode,
            file_mode: options.file_mode,
            sync_writes: options.sync_writes,
        };
        let root = store.paths.root();

        match fs::metadata(root) {
            Ok(meta) if meta.is_dir() => {
                store.log(LogLevel::Debug, format_args!("using '{}' (database is already present)", root.display()));
                return Ok(store);
            }
            Ok(_) => {
                return Err(StoreError::InvalidArgument(format!(
                    "store root '{}' exists and is not a directory",
                    root.display()
                )))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        store.log(LogLevel::Debug, format_args!("creating the database at '{}'", root.display()));
        store.create_dirs(root)?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        self.paths.root()
    }

    /// Persist `value` as `<collection>/<resource>.json`.
    ///
    /// The document is encoded as tab-indented JSON with a trailing newline,
    /// written to `<resource>.json.tmp` and renamed over the final path, so
    /// the final file is always either the previous or the new document.
    pub fn write<T: Serialize + ?Sized>(&self, collection: &str, resource: &str, value: &T) -> StoreResult<()> {
        validate_name("collection", collection)?;
        validate_name("resource", resource)?;

        let bytes = encode_document(value)?;

        let lock = self.locks.lock_for(collection);
        let _guard = acquire(&lock);

        let temp_path = self.paths.temp_path(collection, resource);
        let final_path = self.paths.resolve(collection, resource);
        // Nested resource names ("team/max") need their own parent, not just the collection dir.
        let parent = final_path.parent().unwrap_or_else(|| self.paths.root());
        self.create_dirs(parent)?;

        let written = self
            .write_temp(&temp_path, &bytes)
            .and_then(|()| fs::rename(&temp_path, &final_path));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        self.log(LogLevel::Trace, format_args!("wrote {}/{} ({} bytes)", collection, resource, bytes.len()));
        Ok(())
    }

    /// Load and decode a single resource. Takes no lock.
    pub fn read<T: DeserializeOwned>(&self, collection: &str, resource: &str) -> StoreResult<T> {
        validate_name("collection", collection)?;
        validate_name("resource", resource)?;

        let path = self.paths.resolve(collection, resource);
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::not_found("record", &format!("{}/{}", collection, resource)))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Raw contents of every document in `collection`, in directory
    /// enumeration order. Temp files and nested directories are skipped.
    /// The first failing read aborts the whole call.
    pub fn read_all(&self, collection: &str) -> StoreResult<Vec<String>> {
        validate_name("collection", collection)?;

        let dir = match stat_flexible(&self.paths.collection_path(collection))? {
            Resolution::Exact(path, meta) if meta.is_dir() => path,
            _ => return Err(StoreError::not_found("collection", collection)),
        };

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::not_found("collection", collection))
            }
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type()?.is_file() || !is_document_file(&path) {
                continue;
            }
            records.push(fs::read_to_string(&path)?);
        }
        Ok(records)
    }

    /// [`read_all`](Self::read_all) followed by decoding every document as `T`.
    pub fn read_all_as<T: DeserializeOwned>(&self, collection: &str) -> StoreResult<Vec<T>> {
        self.read_all(collection)?
            .iter()
            .map(|raw| serde_json::from_str(raw).map_err(StoreError::from))
            .collect()
    }

    /// Remove a resource.
    ///
    /// **Hazard:** an empty `resource` removes the entire collection
    /// directory, exactly like [`delete_collection`](Self::delete_collection).
    /// Guard against empty resource names if that is not intended.
    pub fn delete(&self, collection: &str, resource: &str) -> StoreResult<()> {
        validate_name("collection", collection)?;
        if resource.is_empty() {
            return self.delete_collection(collection);
        }
        validate_name("resource", resource)?;

        let lock = self.locks.lock_for(collection);
        let _guard = acquire(&lock);

        let target = self.paths.bare_path(collection, resource);
        match stat_flexible(&target)?.found() {
            Some((path, meta)) if meta.is_dir() => fs::remove_dir_all(path)?,
            Some((path, _)) => fs::remove_file(path)?,
            None => return Err(StoreError::not_found("record", &format!("{}/{}", collection, resource))),
        }
        self.log(LogLevel::Trace, format_args!("deleted {}/{}", collection, resource));
        Ok(())
    }

    /// Recursively remove a collection directory and every resource in it.
    pub fn delete_collection(&self, collection: &str) -> StoreResult<()> {
        validate_name("collection", collection)?;

        let lock = self.locks.lock_for(collection);
        let _guard = acquire(&lock);

        match stat_flexible(&self.paths.bare_path(collection, ""))? {
            Resolution::Exact(path, meta) if meta.is_dir() => fs::remove_dir_all(path)?,
            _ => return Err(StoreError::not_found("collection", collection)),
        }
        self.log(LogLevel::Debug, format_args!("deleted collection '{}'", collection));
        Ok(())
    }

    fn create_dirs(&self, path: &Path) -> io::Result<()> {
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(self.dir_mode);
        builder.create(path)
    }

    fn write_temp(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut opts = OpenOptions::new();
        opts.write(true).create(true).truncate(true);
        #[cfg(unix)]
        opts.mode(self.file_mode);
        let mut file = opts.open(path)?;
        file.write_all(bytes)?;
        if self.sync_writes {
            file.sync_all()?;
        }
        Ok(())
    }

    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.sink.log(level, args);
    }

    #[cfg(test)]
    pub(crate) fn registry(&self) -> &MutexRegistry {
        &self.locks
    }
}

/// Tab-indented JSON plus a trailing newline.
fn encode_document<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::with_capacity(256);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}
