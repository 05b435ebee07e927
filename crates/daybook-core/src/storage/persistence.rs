//! Journal document persistence
//!
//! Handles saving and loading the entry collection to/from the filesystem.
//! Uses atomic writes (write to temp file, then rename) to prevent corruption.
//!
//! Storage location: `~/.local/share/daybook/` (configurable via `Config`)
//!
//! Files:
//! - `journal_entries.json` - The entry collection, a JSON array
//! - `journal_entries.json.corrupt.backup` - Copy of an unparsable document
//!   (`.1`, `.2`, ... when an earlier copy is already there)

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::error::{Access, StorageError, StorageResult};
use super::EntryStore;
use crate::config::Config;
use crate::models::Entry;

/// File-backed entry store
///
/// The whole collection lives in one JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

/// Size information about the stored document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageStats {
    pub document_exists: bool,
    pub document_size: u64,
}

impl StorageStats {
    /// Document size formatted for humans
    pub fn size_human(&self) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        match self.document_size {
            size if size >= MB => format!("{:.1} MB", size as f64 / MB as f64),
            size if size >= KB => format!("{:.1} KB", size as f64 / KB as f64),
            size => format!("{} B", size),
        }
    }
}

impl JsonFileStore {
    /// Create a store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at the configured entries path
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.entries_path())
    }

    /// Path of the journal document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unparsable document is copied before reporting corruption
    pub fn backup_path(&self) -> PathBuf {
        with_suffix(&self.path, ".corrupt.backup")
    }

    /// Check if a document exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Size information for the stored document
    pub async fn stats(&self) -> StorageStats {
        match fs::metadata(&self.path).await {
            Ok(meta) => StorageStats {
                document_exists: true,
                document_size: meta.len(),
            },
            Err(_) => StorageStats::default(),
        }
    }

    /// First backup slot that does not already hold an earlier copy
    ///
    /// `backup_path()`, then `backup_path()` + `.1`, `.2`, ...
    async fn free_backup_path(&self) -> PathBuf {
        let base = self.backup_path();
        let mut candidate = base.clone();
        let mut n = 1u32;
        while fs::try_exists(&candidate).await.unwrap_or(false) {
            candidate = with_suffix(&base, &format!(".{}", n));
            n += 1;
        }
        candidate
    }

    /// Copy the unreadable document aside and build the corruption error
    async fn quarantine(&self, details: String) -> StorageError {
        let backup_path = self.free_backup_path().await;
        if let Err(e) = fs::copy(&self.path, &backup_path).await {
            warn!("Could not back up corrupt journal to {:?}: {}", backup_path, e);
        }
        StorageError::CorruptDocument {
            path: self.path.clone(),
            backup_path,
            details,
        }
    }
}

impl EntryStore for JsonFileStore {
    async fn load(&self) -> StorageResult<Vec<Entry>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No journal at {:?}, starting empty", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::from_io(e, self.path.clone(), Access::Read)),
        };

        // An empty slot reads the same as a missing one
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice::<Vec<Entry>>(&bytes) {
            Ok(entries) => {
                debug!("Loaded {} entries from {:?}", entries.len(), self.path);
                Ok(entries)
            }
            Err(e) => Err(self.quarantine(e.to_string()).await),
        }
    }

    async fn save(&self, entries: &[Entry]) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        atomic_write(&self.path, &bytes).await?;
        debug!("Saved {} entries to {:?}", entries.len(), self.path);
        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
async fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = with_suffix(path, ".tmp");

    if let Err(e) = write_synced(&temp_path, data).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(StorageError::from_io(e, temp_path, Access::Write));
    }

    if let Err(source) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(StorageError::AtomicWriteFailed {
            from: temp_path,
            to: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

async fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mood;
    use tempfile::TempDir;

    fn test_store(temp_dir: &TempDir) -> JsonFileStore {
        JsonFileStore::new(temp_dir.path().join("journal_entries.json"))
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        // Initially no document
        assert!(!store.exists());
        assert!(store.load().await.unwrap().is_empty());

        let entries = vec![
            Entry::new("First", Mood::Good, None),
            Entry::new("Second", Mood::Poor, Some("file:///photo.jpg".to_string())),
        ];
        store.save(&entries).await.unwrap();
        assert!(store.exists());

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, entries);
    }

    #[tokio::test]
    async fn test_document_is_json_array() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let entry = Entry::new("Hello", Mood::Okay, None);
        store.save(std::slice::from_ref(&entry)).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 1);
        assert_eq!(array[0]["mood"], "okay");
        assert_eq!(array[0]["content"], "Hello");
        assert!(array[0]["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_save_overwrites_whole_collection() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let entries: Vec<Entry> = (0..10)
            .map(|i| Entry::new(format!("Entry {}", i), Mood::Good, None))
            .collect();
        store.save(&entries).await.unwrap();
        store.save(&entries[..3]).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[2].content, "Entry 2");
    }

    #[tokio::test]
    async fn test_empty_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        std::fs::write(store.path(), "  \n").unwrap();

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_backed_up() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        std::fs::write(store.path(), "{not json").unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StorageError::CorruptDocument { .. }));

        let backup = std::fs::read_to_string(store.backup_path()).unwrap();
        assert_eq!(backup, "{not json");
    }

    #[tokio::test]
    async fn test_second_corruption_keeps_first_backup() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        std::fs::write(store.path(), "first broken").unwrap();
        store.load().await.unwrap_err();

        std::fs::write(store.path(), "second broken").unwrap();
        let err = store.load().await.unwrap_err();

        let second = match err {
            StorageError::CorruptDocument { backup_path, .. } => backup_path,
            other => panic!("unexpected error: {:?}", other),
        };
        assert_ne!(second, store.backup_path());
        assert_eq!(
            std::fs::read_to_string(store.backup_path()).unwrap(),
            "first broken"
        );
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "second broken");
    }

    #[tokio::test]
    async fn test_opaque_ids_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        std::fs::write(
            store.path(),
            r#"[{"id":"1699999999-abc","content":"old","mood":"good","image":null,"timestamp":"2023-11-14T22:13:19.000Z"}]"#,
        )
        .unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "1699999999-abc");

        // Saved back unchanged
        store.save(&loaded).await.unwrap();
        assert_eq!(store.load().await.unwrap(), loaded);
    }

    #[tokio::test]
    async fn test_wrong_shape_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        std::fs::write(store.path(), r#"{"entries": []}"#).unwrap();

        assert!(matches!(
            store.load().await,
            Err(StorageError::CorruptDocument { .. })
        ));
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        store
            .save(&[Entry::new("x", Mood::Amazing, None)])
            .await
            .unwrap();

        assert!(!with_suffix(store.path(), ".tmp").exists());
    }

    #[tokio::test]
    async fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir
            .path()
            .join("a")
            .join("b")
            .join("c")
            .join("file.txt");

        atomic_write(&nested_path, b"test data").await.unwrap();

        let content = std::fs::read_to_string(&nested_path).unwrap();
        assert_eq!(content, "test data");
    }

    #[tokio::test]
    async fn test_save_into_unwritable_location_fails() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where a directory is expected
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let store = JsonFileStore::new(blocker.join("journal_entries.json"));

        let result = store.save(&[Entry::new("x", Mood::Good, None)]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_stats() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        assert_eq!(store.stats().await, StorageStats::default());

        store
            .save(&[Entry::new("x", Mood::Good, None)])
            .await
            .unwrap();
        let stats = store.stats().await;
        assert!(stats.document_exists);
        assert!(stats.document_size > 0);
    }

    #[test]
    fn test_size_human() {
        let stats = |size| StorageStats {
            document_exists: true,
            document_size: size,
        };
        assert_eq!(stats(512).size_human(), "512 B");
        assert_eq!(stats(2048).size_human(), "2.0 KB");
        assert_eq!(stats(3 * 1024 * 1024).size_human(), "3.0 MB");
    }
}
