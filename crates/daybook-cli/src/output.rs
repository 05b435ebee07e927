//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use chrono::{Local, NaiveDate};
use serde_json::json;

use daybook_core::{
    DayGroup, Entry, JournalStats, Mood, MonthGroup, MoodHistogram, WeekdayHistogram,
    MOOD_DEFINITIONS,
};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single entry in full
    pub fn print_entry(&self, entry: &Entry) {
        match self.format {
            OutputFormat::Human => {
                let local = entry.timestamp.with_timezone(&Local);
                println!("ID:      {}", entry.id);
                println!("Date:    {}", local.format("%A, %B %-d, %Y"));
                println!("Time:    {}", local.format("%-I:%M %p"));
                println!("Mood:    {}", mood_display(&entry.mood));
                if let Some(ref image) = entry.image {
                    println!("Photo:   {}", image);
                }
                println!();
                println!("{}", entry.content);
            }
            OutputFormat::Json => {
                println!("{}", to_json(entry));
            }
            OutputFormat::Quiet => {
                println!("{}", entry.id);
            }
        }
    }

    /// Print entries grouped by day, newest first
    pub fn print_days(&self, days: &[DayGroup<'_>]) {
        match self.format {
            OutputFormat::Human => {
                if days.is_empty() {
                    println!("No entries yet. Add one with `daybook add`.");
                    return;
                }
                let mut total = 0;
                for day in days {
                    println!("── {} ──", day_heading(day.day));
                    for entry in &day.entries {
                        println!("{}", entry_line(entry));
                    }
                    println!();
                    total += day.entries.len();
                }
                println!("{} entry(s) on {} day(s)", total, days.len());
            }
            OutputFormat::Json => {
                let value: Vec<_> = days
                    .iter()
                    .map(|day| json!({ "date": day.key(), "entries": day.entries }))
                    .collect();
                println!("{}", to_json(&value));
            }
            OutputFormat::Quiet => {
                for entry in days.iter().flat_map(|day| &day.entries) {
                    println!("{}", entry.id);
                }
            }
        }
    }

    /// Print entries grouped by month
    pub fn print_months(&self, months: &[MonthGroup<'_>]) {
        match self.format {
            OutputFormat::Human => {
                if months.is_empty() {
                    println!("No entries yet. Add one with `daybook add`.");
                    return;
                }
                for month in months {
                    println!("── {} ({}) ──", month.key, month.entries.len());
                    for entry in &month.entries {
                        println!("{}", entry_line(entry));
                    }
                    println!();
                }
            }
            OutputFormat::Json => {
                let value: Vec<_> = months
                    .iter()
                    .map(|month| json!({ "month": month.key, "entries": month.entries }))
                    .collect();
                println!("{}", to_json(&value));
            }
            OutputFormat::Quiet => {
                for month in months {
                    println!("{}\t{}", month.key, month.entries.len());
                }
            }
        }
    }

    /// Print the dashboard: summary, mood distribution and weekday activity
    pub fn print_stats(
        &self,
        stats: &JournalStats,
        moods: &MoodHistogram,
        weekdays: &WeekdayHistogram,
    ) {
        match self.format {
            OutputFormat::Human => {
                println!("Journal Stats");
                println!("=============");
                println!();
                println!("  Total entries: {}", stats.total);
                println!("  This month:    {}", stats.this_month);
                println!("  Day streak:    {}", stats.streak);
                println!();

                if stats.total == 0 {
                    println!("Start journaling to see your mood trends and patterns.");
                    return;
                }

                println!("Mood Distribution:");
                let widest = moods.iter().map(|(_, count)| count).max().unwrap_or(0);
                for (mood, count) in moods.iter() {
                    let def = mood.definition();
                    println!(
                        "  {} {:<9} {:>4}  {}",
                        def.emoji,
                        def.label,
                        count,
                        bar(count, widest)
                    );
                }
                println!();

                println!("Entries by Weekday:");
                let widest = weekdays.iter().map(|(_, count)| count).max().unwrap_or(0);
                for (day, count) in weekdays.iter() {
                    println!("  {:<3} {:>4}  {}", day, count, bar(count, widest));
                }
                println!();

                for insight in insights(stats) {
                    println!("• {}", insight);
                }
            }
            OutputFormat::Json => {
                let mood_counts: Vec<_> = moods
                    .iter()
                    .map(|(mood, count)| {
                        let def = mood.definition();
                        json!({
                            "mood": mood,
                            "label": def.label,
                            "emoji": def.emoji,
                            "color": def.color,
                            "count": count
                        })
                    })
                    .collect();
                let weekday_counts: Vec<_> = weekdays
                    .iter()
                    .map(|(day, count)| json!({ "name": weekday_name(day), "count": count }))
                    .collect();
                println!(
                    "{}",
                    to_json(&json!({
                        "total": stats.total,
                        "this_month": stats.this_month,
                        "streak": stats.streak,
                        "most_common_mood": stats.most_common_mood,
                        "moods": mood_counts,
                        "weekdays": weekday_counts
                    }))
                );
            }
            OutputFormat::Quiet => {
                println!("{}", stats.streak);
            }
        }
    }

    /// Print the mood table
    pub fn print_moods(&self) {
        match self.format {
            OutputFormat::Human => {
                for def in MOOD_DEFINITIONS.iter() {
                    println!("{} {:<9} {:<9} {}", def.emoji, def.mood, def.label, def.color);
                }
            }
            OutputFormat::Json => {
                let value: Vec<_> = MOOD_DEFINITIONS
                    .iter()
                    .map(|def| {
                        json!({
                            "value": def.mood,
                            "label": def.label,
                            "emoji": def.emoji,
                            "color": def.color
                        })
                    })
                    .collect();
                println!("{}", to_json(&value));
            }
            OutputFormat::Quiet => {
                for mood in Mood::ALL {
                    println!("{}", mood);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a non-fatal warning to stderr
    pub fn warning(&self, message: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", message);
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| json!({ "error": e.to_string() }).to_string())
}

/// `😊 Good`, or the raw key for moods outside the fixed set
fn mood_display(key: &str) -> String {
    match key.parse::<Mood>() {
        Ok(mood) => {
            let def = mood.definition();
            format!("{} {}", def.emoji, def.label)
        }
        Err(_) => format!("? {}", key),
    }
}

/// `Friday, May 10, 2024`
fn day_heading(day: NaiveDate) -> String {
    day.format("%A, %B %-d, %Y").to_string()
}

/// First eight characters of an id, for display
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// One-line summary used in grouped listings
fn entry_line(entry: &Entry) -> String {
    let time = entry.timestamp.with_timezone(&Local).format("%-I:%M %p");
    let photo = if entry.image.is_some() { " 📷" } else { "" };
    format!(
        "{:<8} {:>8}  {}  {}{}",
        short_id(&entry.id),
        time.to_string(),
        mood_display(&entry.mood),
        truncate_line(&entry.content, 50),
        photo
    )
}

fn weekday_name(day: chrono::Weekday) -> &'static str {
    match day {
        chrono::Weekday::Sun => "Sunday",
        chrono::Weekday::Mon => "Monday",
        chrono::Weekday::Tue => "Tuesday",
        chrono::Weekday::Wed => "Wednesday",
        chrono::Weekday::Thu => "Thursday",
        chrono::Weekday::Fri => "Friday",
        chrono::Weekday::Sat => "Saturday",
    }
}

/// Dashboard insight sentences
fn insights(stats: &JournalStats) -> Vec<String> {
    let month = if stats.this_month > 0 {
        format!("You've made {} entries this month.", stats.this_month)
    } else {
        "Start your journaling habit this month!".to_string()
    };
    let streak = if stats.streak > 0 {
        format!("You're on a {} day streak. Keep it up!", stats.streak)
    } else {
        "Write today to start a new streak!".to_string()
    };
    let mood = match stats.most_common_mood {
        Some(mood) => format!("Your most common mood is {}.", mood.definition().label),
        None => "Track your moods to see patterns over time.".to_string(),
    };
    vec![month, streak, mood]
}

/// Proportional bar, at most 30 cells wide
fn bar(count: usize, widest: usize) -> String {
    const WIDTH: usize = 30;
    if widest == 0 {
        return String::new();
    }
    "█".repeat((count * WIDTH).div_ceil(widest))
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        // Counts characters, not bytes
        assert_eq!(truncate("ééééééééééé", 5), "éé...");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("5f0c2a9e-1b7d-4e0a-9c1f-3d2b8e6a7f10"), "5f0c2a9e");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("日記日記日記日記日記"), "日記日記日記日記");
    }

    #[test]
    fn test_truncate_line() {
        assert_eq!(truncate_line("single line", 20), "single line");
        assert_eq!(truncate_line("line one\nline two", 20), "line one");
        assert_eq!(truncate_line("", 20), "");
    }

    #[test]
    fn test_mood_display() {
        assert_eq!(mood_display("good"), "😊 Good");
        assert_eq!(mood_display("weird"), "? weird");
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(0, 0), "");
        assert_eq!(bar(5, 5).chars().count(), 30);
        assert_eq!(bar(1, 2).chars().count(), 15);
        assert_eq!(bar(0, 5), "");
    }

    #[test]
    fn test_insights() {
        let stats = JournalStats {
            total: 4,
            this_month: 3,
            streak: 2,
            most_common_mood: Some(Mood::Amazing),
        };
        let lines = insights(&stats);
        assert_eq!(lines[0], "You've made 3 entries this month.");
        assert_eq!(lines[1], "You're on a 2 day streak. Keep it up!");
        assert_eq!(lines[2], "Your most common mood is Amazing.");

        let empty = JournalStats {
            total: 0,
            this_month: 0,
            streak: 0,
            most_common_mood: None,
        };
        let lines = insights(&empty);
        assert_eq!(lines[1], "Write today to start a new streak!");
    }

    #[test]
    fn test_day_heading() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert_eq!(day_heading(day), "Friday, May 10, 2024");
    }
}
