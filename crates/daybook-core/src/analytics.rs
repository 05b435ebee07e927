//! Derived views over the entry collection
//!
//! All functions are pure and take the time zone explicitly, so the same
//! collection can be bucketed by the user's local calendar or by a fixed
//! offset in tests. Entries are borrowed, never cloned.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Weekday};
use serde::Serialize;

use crate::models::{Entry, Mood};

/// Weekdays in histogram order
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Entries sharing one local calendar day, newest first
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<'a> {
    pub day: NaiveDate,
    pub entries: Vec<&'a Entry>,
}

impl DayGroup<'_> {
    /// `YYYY-MM-DD`
    pub fn key(&self) -> String {
        self.day.format("%Y-%m-%d").to_string()
    }
}

/// Entries sharing one local calendar month, in collection order
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGroup<'a> {
    /// `YYYY-MM`
    pub key: String,
    pub entries: Vec<&'a Entry>,
}

/// Entry count per recognized mood
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoodHistogram {
    counts: [usize; 5],
}

impl MoodHistogram {
    pub fn count(&self, mood: Mood) -> usize {
        self.counts[mood.index()]
    }

    /// All five moods with their counts, in `Mood::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = (Mood, usize)> + '_ {
        Mood::ALL.into_iter().map(move |mood| (mood, self.count(mood)))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// The most frequent mood; ties go to the earlier mood in `Mood::ALL`
    pub fn most_common(&self) -> Option<Mood> {
        let mut best: Option<(Mood, usize)> = None;
        for (mood, count) in self.iter() {
            if count == 0 {
                continue;
            }
            match best {
                Some((_, best_count)) if best_count >= count => {}
                _ => best = Some((mood, count)),
            }
        }
        best.map(|(mood, _)| mood)
    }
}

/// Entry count per weekday, Sunday first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekdayHistogram {
    counts: [usize; 7],
}

impl WeekdayHistogram {
    pub fn count(&self, weekday: Weekday) -> usize {
        self.counts[weekday.num_days_from_sunday() as usize]
    }

    /// Sunday..Saturday with counts
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, usize)> + '_ {
        WEEKDAYS
            .into_iter()
            .map(move |day| (day, self.count(day)))
    }

    /// Raw counts, index 0 is Sunday
    pub fn counts(&self) -> [usize; 7] {
        self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Dashboard summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JournalStats {
    pub total: usize,
    /// Entries in the current local month
    pub this_month: usize,
    pub streak: u32,
    pub most_common_mood: Option<Mood>,
}

/// Group entries by local calendar day
///
/// Days are ordered newest first and entries within a day newest first.
/// Entries with identical timestamps keep their collection order.
pub fn group_by_day<'a, Tz: TimeZone>(entries: &'a [Entry], tz: &Tz) -> Vec<DayGroup<'a>> {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut index: HashMap<NaiveDate, usize> = HashMap::new();
    let mut groups: Vec<DayGroup<'a>> = Vec::new();
    for entry in sorted {
        let day = entry.local_day(tz);
        match index.get(&day) {
            Some(&pos) => groups[pos].entries.push(entry),
            None => {
                index.insert(day, groups.len());
                groups.push(DayGroup {
                    day,
                    entries: vec![entry],
                });
            }
        }
    }

    // A zone that shifts its clock across midnight can make local days
    // arrive out of order even though instants are sorted.
    groups.sort_by(|a, b| b.day.cmp(&a.day));
    groups
}

/// Group entries by local `YYYY-MM`, months in order of first appearance
pub fn group_by_month<'a, Tz: TimeZone>(entries: &'a [Entry], tz: &Tz) -> Vec<MonthGroup<'a>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<MonthGroup<'a>> = Vec::new();
    for entry in entries {
        let key = entry.local_month_key(tz);
        match index.get(&key) {
            Some(&pos) => groups[pos].entries.push(entry),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(MonthGroup {
                    key,
                    entries: vec![entry],
                });
            }
        }
    }
    groups
}

/// Count entries per mood; unrecognized moods are skipped
pub fn mood_histogram(entries: &[Entry]) -> MoodHistogram {
    let mut histogram = MoodHistogram::default();
    for mood in entries.iter().filter_map(Entry::known_mood) {
        histogram.counts[mood.index()] += 1;
    }
    histogram
}

/// Count entries per local weekday, regardless of mood
pub fn weekday_histogram<Tz: TimeZone>(entries: &[Entry], tz: &Tz) -> WeekdayHistogram {
    let mut histogram = WeekdayHistogram::default();
    for entry in entries {
        let weekday = entry.local_day(tz).weekday();
        histogram.counts[weekday.num_days_from_sunday() as usize] += 1;
    }
    histogram
}

/// Consecutive days with at least one entry, counting back from `today`
///
/// Returns 0 when `today` has no entry.
pub fn current_streak<Tz: TimeZone>(entries: &[Entry], today: NaiveDate, tz: &Tz) -> u32 {
    let days: HashSet<NaiveDate> = entries.iter().map(|e| e.local_day(tz)).collect();

    let mut streak = 0;
    let mut cursor = today;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(previous) => cursor = previous,
            None => break,
        }
    }
    streak
}

/// Number of entries in the given local month
pub fn entries_in_month<Tz: TimeZone>(entries: &[Entry], year: i32, month: u32, tz: &Tz) -> usize {
    entries
        .iter()
        .map(|e| e.local_day(tz))
        .filter(|day| day.year() == year && day.month() == month)
        .count()
}

/// Dashboard summary as of `now`, in the zone `now` carries
pub fn summarize<Tz: TimeZone>(entries: &[Entry], now: &DateTime<Tz>) -> JournalStats {
    let tz = now.timezone();
    let today = now.date_naive();
    JournalStats {
        total: entries.len(),
        this_month: entries_in_month(entries, today.year(), today.month(), &tz),
        streak: current_streak(entries, today, &tz),
        most_common_mood: mood_histogram(entries).most_common(),
    }
}
