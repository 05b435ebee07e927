//! Journal error taxonomy
//!
//! Every failure the repository reports to its caller is a `JournalError`.
//! None of them are fatal: the running session keeps its in-memory state.

use std::sync::Arc;

use thiserror::Error;

use crate::image::ImageError;
use crate::storage::StorageError;

/// Errors surfaced by journal operations
///
/// Cloneable so the repository can hand one copy to the caller and keep
/// another as its current error.
#[derive(Error, Debug, Clone)]
pub enum JournalError {
    /// Stored journal could not be read or parsed at startup
    #[error("Failed to load journal: {0}")]
    StorageRead(#[source] Arc<StorageError>),

    /// A change could not be persisted; memory is ahead of disk
    ///
    /// `unsaved_id` names the entry an `add` created before the save failed.
    #[error("Failed to save journal: {source}")]
    StorageWrite {
        #[source]
        source: Arc<StorageError>,
        unsaved_id: Option<String>,
    },

    /// No entry has this id
    #[error("Entry not found: {id}")]
    NotFound { id: String },

    /// Mood key is not one of the five recognized moods
    #[error("Invalid mood '{value}'. Expected one of: amazing, good, okay, poor, terrible")]
    InvalidMood { value: String },

    /// An id prefix matched more than one entry
    #[error("Ambiguous id '{prefix}' matches {} entries", matches.len())]
    AmbiguousId { prefix: String, matches: Vec<String> },

    /// The image provider failed
    #[error("Failed to select image: {0}")]
    ImageSelection(#[source] Arc<ImageError>),
}

impl JournalError {
    pub fn storage_read(error: StorageError) -> Self {
        JournalError::StorageRead(Arc::new(error))
    }

    pub fn storage_write(error: StorageError) -> Self {
        JournalError::StorageWrite {
            source: Arc::new(error),
            unsaved_id: None,
        }
    }

    pub fn image_selection(error: ImageError) -> Self {
        JournalError::ImageSelection(Arc::new(error))
    }

    /// Short message suitable for a one-shot error dialog
    pub fn user_message(&self) -> &'static str {
        match self {
            JournalError::StorageRead(_) => "Failed to load your journal entries",
            JournalError::StorageWrite { .. } => {
                "Failed to save your journal entries. Your latest change may be lost when the app restarts."
            }
            JournalError::NotFound { .. } => "That journal entry no longer exists",
            JournalError::InvalidMood { .. } => "Please choose how you are feeling",
            JournalError::AmbiguousId { .. } => {
                "More than one entry matches. Please provide more characters."
            }
            JournalError::ImageSelection(_) => "Failed to select image",
        }
    }

    /// Whether retrying the same operation may succeed
    ///
    /// Nothing here ends the session; this only tells the caller whether a
    /// retry is worth offering.
    pub fn is_recoverable(&self) -> bool {
        match self.storage_error() {
            Some(e) => e.is_recoverable(),
            None => true,
        }
    }

    /// Id of an entry that exists in memory but was not saved
    pub fn unsaved_id(&self) -> Option<&str> {
        match self {
            JournalError::StorageWrite { unsaved_id, .. } => unsaved_id.as_deref(),
            _ => None,
        }
    }

    /// The underlying storage error, if any
    pub fn storage_error(&self) -> Option<&StorageError> {
        match self {
            JournalError::StorageRead(e) | JournalError::StorageWrite { source: e, .. } => {
                Some(e.as_ref())
            }
            _ => None,
        }
    }
}

/// Result type for journal operations
pub type JournalResult<T> = Result<T, JournalError>;
