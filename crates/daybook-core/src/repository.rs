//! Entry repository
//!
//! The `EntryRepository` owns the authoritative in-memory collection and
//! writes the whole collection through to its `EntryStore` after every
//! mutation.
//!
//! ## Lifecycle
//!
//! A repository only exists once `initialize` has loaded the store, so no
//! operation can run before the collection is ready. If loading fails the
//! repository starts empty and keeps the failure as its current error.
//!
//! ## Failure semantics
//!
//! Mutations change memory first, then await the save. A failed save is
//! returned and recorded, but the in-memory change stays: the running
//! session is the source of truth until the next successful save.
//! Mutating methods take `&mut self`, so two writes can never interleave.
//!
//! ## Usage
//!
//! ```ignore
//! let store = JsonFileStore::from_config(&config);
//! let mut journal = EntryRepository::initialize(store).await;
//!
//! let id = journal.add("Long walk after work", "good", None).await?;
//! let streak = journal.current_streak();
//! ```

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use tracing::{debug, info, warn};

use crate::analytics::{
    self, DayGroup, JournalStats, MonthGroup, MoodHistogram, WeekdayHistogram,
};
use crate::error::{JournalError, JournalResult};
use crate::image::ImageProvider;
use crate::models::{new_id, Entry, EntryUpdate, Mood};
use crate::storage::EntryStore;

/// In-memory entry collection with write-through persistence
pub struct EntryRepository<S: EntryStore> {
    /// Durable backing slot
    store: S,
    /// Authoritative collection, in insertion order
    entries: Vec<Entry>,
    /// Most recent failure, until cleared
    last_error: Option<JournalError>,
}

impl<S: EntryStore> EntryRepository<S> {
    /// Load the store and return a ready repository
    ///
    /// Never fails: an unreadable store yields an empty journal and a
    /// `StorageRead` error in the error channel.
    pub async fn initialize(store: S) -> Self {
        let (entries, last_error) = match store.load().await {
            Ok(entries) => {
                info!("Journal ready with {} entries", entries.len());
                (entries, None)
            }
            Err(e) => {
                warn!("Failed to load journal, starting empty: {}", e);
                (Vec::new(), Some(JournalError::storage_read(e)))
            }
        };

        Self {
            store,
            entries,
            last_error,
        }
    }

    /// Get the backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    // ==================== Mutations ====================

    /// Add a new entry stamped with the current instant
    ///
    /// Returns the new id. If the save fails the entry stays in memory and
    /// the returned `StorageWrite` carries its id in `unsaved_id`.
    pub async fn add(
        &mut self,
        content: impl Into<String>,
        mood: &str,
        image: Option<String>,
    ) -> JournalResult<String> {
        let mood = match mood.parse::<Mood>() {
            Ok(mood) => mood,
            Err(e) => return Err(self.fail(e)),
        };

        let mut entry = Entry::new(content, mood, image);
        while self.get_by_id(&entry.id).is_some() {
            entry.id = new_id();
        }
        let id = entry.id.clone();

        self.entries.push(entry);
        debug!("Added entry {}", id);

        self.persist(Some(&id)).await?;
        Ok(id)
    }

    /// Merge `update` into the entry with `id`
    ///
    /// The entry's id and timestamp never change.
    pub async fn update(&mut self, id: &str, update: EntryUpdate) -> JournalResult<()> {
        if let Some(mood) = update.mood.as_deref() {
            if let Err(e) = mood.parse::<Mood>() {
                return Err(self.fail(e));
            }
        }

        let Some(pos) = self.entries.iter().position(|e| e.id == id) else {
            return Err(self.fail(JournalError::NotFound { id: id.to_string() }));
        };

        self.entries[pos].apply(update);
        debug!("Updated entry {}", id);

        self.persist(None).await
    }

    /// Remove the entry with `id`
    ///
    /// Removing an absent id is not an error. The collection is saved either way.
    pub async fn delete(&mut self, id: &str) -> JournalResult<()> {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);

        if self.entries.len() == before {
            debug!("Delete of absent entry {} is a no-op", id);
        } else {
            debug!("Deleted entry {}", id);
        }

        self.persist(None).await
    }

    // ==================== Lookups ====================

    /// Get an entry by id
    pub fn get_by_id(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Resolve a full id or a unique id prefix
    ///
    /// An exact id always wins. Prefixes match case-insensitively.
    pub fn find_by_prefix(&self, prefix: &str) -> JournalResult<&Entry> {
        if let Some(entry) = self.get_by_id(prefix) {
            return Ok(entry);
        }

        let needle = prefix.to_lowercase();
        let matches: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|e| !needle.is_empty() && e.id.to_lowercase().starts_with(&needle))
            .collect();

        match matches.as_slice() {
            [] => Err(JournalError::NotFound {
                id: prefix.to_string(),
            }),
            [entry] => Ok(*entry),
            many => Err(JournalError::AmbiguousId {
                prefix: prefix.to_string(),
                matches: many.iter().map(|e| e.id.clone()).collect(),
            }),
        }
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ==================== Derived views ====================

    /// Entries grouped by local day, newest day and newest entry first
    pub fn group_by_day(&self) -> Vec<DayGroup<'_>> {
        self.group_by_day_in(&Local)
    }

    pub fn group_by_day_in<Tz: TimeZone>(&self, tz: &Tz) -> Vec<DayGroup<'_>> {
        analytics::group_by_day(&self.entries, tz)
    }

    /// Entries grouped by local `YYYY-MM`
    pub fn group_by_month(&self) -> Vec<MonthGroup<'_>> {
        self.group_by_month_in(&Local)
    }

    pub fn group_by_month_in<Tz: TimeZone>(&self, tz: &Tz) -> Vec<MonthGroup<'_>> {
        analytics::group_by_month(&self.entries, tz)
    }

    /// Count per recognized mood
    pub fn mood_histogram(&self) -> MoodHistogram {
        analytics::mood_histogram(&self.entries)
    }

    /// Count per local weekday, Sunday first
    pub fn weekday_histogram(&self) -> WeekdayHistogram {
        self.weekday_histogram_in(&Local)
    }

    pub fn weekday_histogram_in<Tz: TimeZone>(&self, tz: &Tz) -> WeekdayHistogram {
        analytics::weekday_histogram(&self.entries, tz)
    }

    /// Consecutive local days with entries, ending today
    pub fn current_streak(&self) -> u32 {
        self.current_streak_on(Local::now().date_naive(), &Local)
    }

    pub fn current_streak_on<Tz: TimeZone>(&self, today: NaiveDate, tz: &Tz) -> u32 {
        analytics::current_streak(&self.entries, today, tz)
    }

    /// Dashboard summary as of now
    pub fn stats(&self) -> JournalStats {
        self.stats_at(&Local::now())
    }

    pub fn stats_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> JournalStats {
        analytics::summarize(&self.entries, now)
    }

    // ==================== Images ====================

    /// Ask `provider` for an image reference
    ///
    /// Nothing selected and a failed provider both yield `None`; the failure
    /// is recorded in the error channel.
    pub fn pick_image<P: ImageProvider + ?Sized>(&mut self, provider: &P) -> Option<String> {
        match provider.pick_image() {
            Ok(image) => image,
            Err(e) => {
                warn!("Image selection failed: {}", e);
                self.fail(JournalError::image_selection(e));
                None
            }
        }
    }

    // ==================== Error channel ====================

    /// The most recent failure, if not yet cleared
    pub fn last_error(&self) -> Option<&JournalError> {
        self.last_error.as_ref()
    }

    /// Take the current error, clearing it
    pub fn take_error(&mut self) -> Option<JournalError> {
        self.last_error.take()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    fn fail(&mut self, error: JournalError) -> JournalError {
        self.last_error = Some(error.clone());
        error
    }

    /// Write the whole collection to the store
    ///
    /// `unsaved_id` is reported in the error when a freshly added entry
    /// did not reach the store.
    async fn persist(&mut self, unsaved_id: Option<&str>) -> JournalResult<()> {
        match self.store.save(&self.entries).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(
                    "Failed to save journal, {} entries held in memory only: {}",
                    self.entries.len(),
                    e
                );
                Err(self.fail(JournalError::StorageWrite {
                    source: Arc::new(e),
                    unsaved_id: unsaved_id.map(str::to_string),
                }))
            }
        }
    }
}
