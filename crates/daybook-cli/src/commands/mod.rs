//! Command handlers

pub mod config;
pub mod entry;
pub mod stats;
pub mod status;

use daybook_core::{EntryRepository, JsonFileStore};

/// The journal as the CLI opens it
pub type Journal = EntryRepository<JsonFileStore>;
