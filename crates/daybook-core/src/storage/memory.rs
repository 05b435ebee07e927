//! In-memory entry store
//!
//! Keeps the document in process memory. Clones share the same slot, so a
//! test can hold one handle while a repository owns another, and can make
//! the medium fail on demand.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::error::{StorageError, StorageResult};
use super::EntryStore;
use crate::models::Entry;

#[derive(Debug, Default)]
struct Slot {
    document: Option<Vec<Entry>>,
    fail_reads: bool,
    fail_writes: bool,
    saves: usize,
}

/// Entry store backed by process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Slot>>,
}

impl MemoryStore {
    /// Create an empty store (nothing saved yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `entries`
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        let store = Self::new();
        store.slot().document = Some(entries);
        store
    }

    /// Make every following `load` fail
    pub fn set_fail_reads(&self, fail: bool) {
        self.slot().fail_reads = fail;
    }

    /// Make every following `save` fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.slot().fail_writes = fail;
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.slot().saves
    }

    /// The currently stored collection, if anything was saved
    pub fn stored(&self) -> Option<Vec<Entry>> {
        self.slot().document.clone()
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EntryStore for MemoryStore {
    async fn load(&self) -> StorageResult<Vec<Entry>> {
        let slot = self.slot();
        if slot.fail_reads {
            return Err(StorageError::Unavailable("read refused".to_string()));
        }
        Ok(slot.document.clone().unwrap_or_default())
    }

    async fn save(&self, entries: &[Entry]) -> StorageResult<()> {
        let mut slot = self.slot();
        if slot.fail_writes {
            return Err(StorageError::Unavailable("write refused".to_string()));
        }
        slot.document = Some(entries.to_vec());
        slot.saves += 1;
        Ok(())
    }
}
