//! Daybook Core Library
//!
//! This crate provides the core functionality for Daybook, a local-only
//! personal journal: dated entries with a mood tag and an optional photo,
//! plus the grouped views and statistics shown on a dashboard.
//!
//! # Architecture
//!
//! - **Persistent Store**: the whole entry collection in one document,
//!   loaded once and rewritten atomically after every change
//! - **Entry Repository**: the authoritative in-memory collection, its
//!   CRUD operations and derived views
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut journal = EntryRepository::initialize(JsonFileStore::from_config(&config)).await;
//!
//! journal.add("First day of spring", "amazing", None).await?;
//!
//! for day in journal.group_by_day() {
//!     println!("{}: {} entries", day.key(), day.entries.len());
//! }
//! ```
//!
//! # Modules
//!
//! - `repository`: Entry repository (main entry point)
//! - `models`: Entries, moods and partial updates
//! - `analytics`: Grouping, histograms and streaks
//! - `storage`: Persistent store trait and backends
//! - `image`: Image provider seam
//! - `error`: Journal error taxonomy
//! - `config`: Application configuration

pub mod analytics;
pub mod config;
pub mod error;
pub mod image;
pub mod models;
pub mod repository;
pub mod storage;

pub use analytics::{DayGroup, JournalStats, MonthGroup, MoodHistogram, WeekdayHistogram};
pub use config::Config;
pub use error::{JournalError, JournalResult};
pub use image::{ImageError, ImageProvider, NoImage};
pub use models::{Entry, EntryUpdate, Mood, MoodDefinition, MOOD_DEFINITIONS};
pub use repository::EntryRepository;
pub use storage::{EntryStore, JsonFileStore, MemoryStore, StorageError, StorageStats};
