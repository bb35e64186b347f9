use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// Exclusive lock guarding one collection's files.
pub type CollectionLock = Arc<Mutex<()>>;

/// Lazily created per-collection locks, owned by a single store.
///
/// The registry's own mutex only covers the map lookup/insert and is never
/// held while a caller performs I/O. Entries are never removed.
#[derive(Debug, Default)]
pub struct MutexRegistry {
    locks: Mutex<HashMap<String, CollectionLock>>,
}

impl MutexRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up or insert the lock for `collection`.
    pub fn lock_for(&self, collection: &str) -> CollectionLock {
        // The map stays consistent even if a holder panicked.
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(collection.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Acquire a collection lock; poisoning is ignored since the lock guards no data.
pub fn acquire(lock: &CollectionLock) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}
