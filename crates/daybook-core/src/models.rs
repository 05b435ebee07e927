//! Data models for Daybook
//!
//! Defines the journal `Entry`, the fixed `Mood` set with its display
//! metadata, and `EntryUpdate` for partial edits.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::JournalError;

/// One of the five fixed mood tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Amazing,
    Good,
    Okay,
    Poor,
    Terrible,
}

impl Mood {
    /// All moods, best to worst
    pub const ALL: [Mood; 5] = [
        Mood::Amazing,
        Mood::Good,
        Mood::Okay,
        Mood::Poor,
        Mood::Terrible,
    ];

    /// The storage key for this mood
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Amazing => "amazing",
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Poor => "poor",
            Mood::Terrible => "terrible",
        }
    }

    /// Display metadata for this mood
    pub fn definition(&self) -> &'static MoodDefinition {
        &MOOD_DEFINITIONS[self.index()]
    }

    /// Position of this mood in `Mood::ALL`
    pub(crate) fn index(&self) -> usize {
        match self {
            Mood::Amazing => 0,
            Mood::Good => 1,
            Mood::Okay => 2,
            Mood::Poor => 3,
            Mood::Terrible => 4,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str() == s)
            .ok_or_else(|| JournalError::InvalidMood {
                value: s.to_string(),
            })
    }
}

/// Label, emoji and color shown for a mood
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodDefinition {
    pub mood: Mood,
    pub label: &'static str,
    pub emoji: &'static str,
    /// Hex color, `#rrggbb`
    pub color: &'static str,
}

/// Mood lookup table, in `Mood::ALL` order
pub static MOOD_DEFINITIONS: [MoodDefinition; 5] = [
    MoodDefinition {
        mood: Mood::Amazing,
        label: "Amazing",
        emoji: "😁",
        color: "#10b981",
    },
    MoodDefinition {
        mood: Mood::Good,
        label: "Good",
        emoji: "😊",
        color: "#60a5fa",
    },
    MoodDefinition {
        mood: Mood::Okay,
        label: "Okay",
        emoji: "😐",
        color: "#fbbf24",
    },
    MoodDefinition {
        mood: Mood::Poor,
        label: "Poor",
        emoji: "😔",
        color: "#f87171",
    },
    MoodDefinition {
        mood: Mood::Terrible,
        label: "Terrible",
        emoji: "😭",
        color: "#ef4444",
    },
];

/// A journal entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    /// Opaque unique identifier, never reused
    ///
    /// New entries get a v4 UUID, but any string loaded from disk is kept.
    pub id: String,
    /// Free-form entry text
    pub content: String,
    /// Raw mood key as stored
    ///
    /// Kept as a string so that documents written with a foreign mood value
    /// still load and round-trip. Use [`Entry::known_mood`] to classify it.
    pub mood: String,
    /// Reference to a locally stored photo
    #[serde(default)]
    pub image: Option<String>,
    /// Creation instant; never changes after creation
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
}

impl Entry {
    /// Create a new entry stamped with the current instant
    pub fn new(content: impl Into<String>, mood: Mood, image: Option<String>) -> Self {
        Self::with_timestamp(new_id(), content, mood.as_str(), image, Utc::now())
    }

    /// Create an entry with explicit identity (for loading and tests)
    pub fn with_timestamp(
        id: impl Into<String>,
        content: impl Into<String>,
        mood: impl Into<String>,
        image: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            mood: mood.into(),
            image,
            timestamp: truncate_to_millis(timestamp),
        }
    }

    /// The mood, if it is one of the five recognized keys
    pub fn known_mood(&self) -> Option<Mood> {
        self.mood.parse().ok()
    }

    /// Calendar day of the timestamp in `tz`
    pub fn local_day<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.timestamp.with_timezone(tz).date_naive()
    }

    /// `YYYY-MM` of the timestamp in `tz`
    pub fn local_month_key<Tz: TimeZone>(&self, tz: &Tz) -> String {
        let day = self.local_day(tz);
        format!("{:04}-{:02}", day.year(), day.month())
    }

    /// Merge the fields present in `update`
    ///
    /// `id` and `timestamp` are untouched.
    pub fn apply(&mut self, update: EntryUpdate) {
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(mood) = update.mood {
            self.mood = mood;
        }
        if let Some(image) = update.image {
            self.image = image;
        }
    }
}

/// Partial field set for editing an entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryUpdate {
    pub content: Option<String>,
    pub mood: Option<String>,
    /// `Some(None)` removes the photo
    pub image: Option<Option<String>>,
}

impl EntryUpdate {
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = Some(mood.into());
        self
    }

    pub fn image(mut self, image: Option<String>) -> Self {
        self.image = Some(image);
        self
    }

    /// True if no field would change
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.mood.is_none() && self.image.is_none()
    }
}

/// A fresh entry id
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn truncate_to_millis(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    let millis = timestamp.timestamp_millis();
    DateTime::from_timestamp_millis(millis).unwrap_or(timestamp)
}

/// ISO-8601 timestamps with fixed millisecond precision (`2024-03-05T14:07:09.120Z`)
mod timestamp_format {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_mood_keys() {
        assert_eq!(Mood::Amazing.as_str(), "amazing");
        assert_eq!("terrible".parse::<Mood>().unwrap(), Mood::Terrible);
        assert!(matches!(
            "ecstatic".parse::<Mood>(),
            Err(JournalError::InvalidMood { .. })
        ));
        // Keys are case sensitive
        assert!("Good".parse::<Mood>().is_err());
        assert_eq!(format!("{:<6}|", Mood::Good), "good  |");
    }

    #[test]
    fn test_mood_definitions_match_order() {
        for (mood, def) in Mood::ALL.iter().zip(MOOD_DEFINITIONS.iter()) {
            assert_eq!(*mood, def.mood);
            assert_eq!(mood.definition(), def);
        }
        assert_eq!(Mood::Okay.definition().emoji, "😐");
        assert_eq!(Mood::Terrible.definition().color, "#ef4444");
    }

    #[test]
    fn test_entry_new() {
        let entry = Entry::new("Walked by the river", Mood::Good, None);
        assert_eq!(entry.content, "Walked by the river");
        assert_eq!(entry.mood, "good");
        assert_eq!(entry.known_mood(), Some(Mood::Good));
        assert!(entry.image.is_none());
    }

    #[test]
    fn test_unknown_mood_is_kept() {
        let entry = Entry::with_timestamp("e-1", "x", "meh", None, Utc::now());
        assert_eq!(entry.mood, "meh");
        assert!(entry.known_mood().is_none());
    }

    #[test]
    fn test_apply_update_preserves_identity() {
        let mut entry = Entry::new("draft", Mood::Okay, Some("file:///a.jpg".to_string()));
        let id = entry.id.clone();
        let timestamp = entry.timestamp;

        entry.apply(EntryUpdate::default().content("final").mood("amazing"));

        assert_eq!(entry.content, "final");
        assert_eq!(entry.mood, "amazing");
        assert_eq!(entry.image.as_deref(), Some("file:///a.jpg"));
        assert_eq!(entry.id, id);
        assert_eq!(entry.timestamp, timestamp);

        entry.apply(EntryUpdate::default().image(None));
        assert!(entry.image.is_none());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(EntryUpdate::default().is_empty());
        assert!(!EntryUpdate::default().image(None).is_empty());
    }

    #[test]
    fn test_timestamp_serialization_format() {
        let ts = DateTime::parse_from_rfc3339("2024-03-05T14:07:09.120456Z")
            .unwrap()
            .with_timezone(&Utc);
        let id = new_id();
        let entry = Entry::with_timestamp(id.clone(), "hi", "good", None, ts);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["timestamp"], "2024-03-05T14:07:09.120Z");
        assert_eq!(json["image"], serde_json::Value::Null);
        assert_eq!(json["id"], id);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_timestamp_accepts_offsets() {
        let json = format!(
            r#"{{"id":"{}","content":"c","mood":"poor","image":null,"timestamp":"2024-03-05T23:30:00+02:00"}}"#,
            Uuid::new_v4()
        );
        let entry: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry.timestamp.to_rfc3339(), "2024-03-05T21:30:00+00:00");
    }

    #[test]
    fn test_missing_image_key_loads() {
        let json = format!(
            r#"{{"id":"{}","content":"c","mood":"good","timestamp":"2024-03-05T10:00:00.000Z"}}"#,
            Uuid::new_v4()
        );
        let entry: Entry = serde_json::from_str(&json).unwrap();
        assert!(entry.image.is_none());
    }

    #[test]
    fn test_opaque_id_loads() {
        let json = r#"{"id":"1699999999-abc","content":"c","mood":"good","image":null,"timestamp":"2024-03-05T10:00:00.000Z"}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "1699999999-abc");

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["id"], "1699999999-abc");
    }

    #[test]
    fn test_local_day_and_month() {
        let ts = DateTime::parse_from_rfc3339("2024-01-31T23:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let entry = Entry::with_timestamp(new_id(), "c", "good", None, ts);

        let utc = FixedOffset::east_opt(0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();

        assert_eq!(entry.local_day(&utc).to_string(), "2024-01-31");
        assert_eq!(entry.local_day(&plus_two).to_string(), "2024-02-01");
        assert_eq!(entry.local_month_key(&utc), "2024-01");
        assert_eq!(entry.local_month_key(&plus_two), "2024-02");
    }

    #[test]
    fn test_entry_serialization() {
        let entry = Entry::new("Content", Mood::Poor, Some("/photos/1.jpg".to_string()));
        let json = serde_json::to_string(&entry).unwrap();
        let deserialized: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, deserialized);
    }
}
