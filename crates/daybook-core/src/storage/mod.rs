//! Storage layer
//!
//! The Persistent Store holds the whole entry collection as one document.
//! Every save rewrites the full collection; there is no incremental write.
//!
//! ## Backends
//!
//! - **`JsonFileStore`**: JSON array on disk, written atomically
//! - **`MemoryStore`**: in-process document, with failure switches for tests

pub mod error;
pub mod memory;
pub mod persistence;

pub use error::{Access, StorageError, StorageResult};
pub use memory::MemoryStore;
pub use persistence::{JsonFileStore, StorageStats};

use crate::models::Entry;

/// A durable slot holding the serialized entry collection
///
/// Implementations must make `save` atomic: a later `load` sees either the
/// previous document or the new one, never a partial write.
#[allow(async_fn_in_trait)]
pub trait EntryStore {
    /// Read the stored collection, in stored order
    ///
    /// Returns an empty collection when nothing has been saved yet.
    async fn load(&self) -> StorageResult<Vec<Entry>>;

    /// Overwrite the stored collection
    async fn save(&self, entries: &[Entry]) -> StorageResult<()>;
}
