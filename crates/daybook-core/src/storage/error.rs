//! Storage errors
//!
//! Every variant carries the path it concerns so the message can point
//! the user at the right file.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Direction of the I/O that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Errors raised by an `EntryStore`
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Could not create journal directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied for '{path}'")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No space left to write '{path}'")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not read journal '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not write journal '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document exists but is not a list of entries
    #[error("Journal '{path}' is unreadable ({details}); copied to '{backup_path}'")]
    CorruptDocument {
        path: PathBuf,
        backup_path: PathBuf,
        details: String,
    },

    #[error("Could not encode journal: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Journal file '{path}' does not exist")]
    NotFound { path: PathBuf },

    /// The temp file was written but could not replace the document
    #[error("Could not replace '{to}' with '{from}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The medium refused the operation
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Classify an I/O error that happened while accessing `path`
    pub fn from_io(error: io::Error, path: PathBuf, access: Access) -> Self {
        match (error.kind(), access) {
            (io::ErrorKind::PermissionDenied, _) => StorageError::PermissionDenied {
                path,
                source: error,
            },
            (io::ErrorKind::NotFound, _) => StorageError::NotFound { path },
            (_, Access::Write) if is_out_of_space(&error) => StorageError::DiskFull {
                path,
                source: error,
            },
            (_, Access::Read) => StorageError::ReadError {
                path,
                source: error,
            },
            (_, Access::Write) => StorageError::WriteError {
                path,
                source: error,
            },
        }
    }

    /// Whether the user can fix the cause and try again
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StorageError::DiskFull { .. }
                | StorageError::PermissionDenied { .. }
                | StorageError::CorruptDocument { .. }
        )
    }

    /// What the user can do about it, if anything
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::DiskFull { .. } => Some("Free some disk space, then repeat the change."),
            StorageError::PermissionDenied { .. } => {
                Some("Make sure you own the journal directory and can write to it.")
            }
            StorageError::CorruptDocument { .. } => Some(
                "The unreadable journal was kept next to the original. Your next change starts a new journal.",
            ),
            StorageError::CreateDirectory { .. } => {
                Some("Set data_dir to a directory you can write to.")
            }
            _ => None,
        }
    }
}

fn is_out_of_space(error: &io::Error) -> bool {
    if error.kind() == io::ErrorKind::StorageFull {
        return true;
    }
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left") || msg.contains("quota exceeded")
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
