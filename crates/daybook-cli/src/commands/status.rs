//! Status command handler

use anyhow::Result;
use chrono::Local;

use super::Journal;
use crate::output::{Output, OutputFormat};

/// Show where the journal lives and how much is in it
pub async fn show(journal: &Journal, output: &Output) -> Result<()> {
    let store = journal.store();
    let stats = store.stats().await;
    let newest = journal.entries().iter().map(|entry| entry.timestamp).max();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "path": store.path(),
                    "storage": {
                        "document_exists": stats.document_exists,
                        "document_size": stats.document_size
                    },
                    "counts": {
                        "entries": journal.len(),
                        "days": journal.group_by_day().len()
                    },
                    "last_entry": newest
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", journal.len());
        }
        OutputFormat::Human => {
            println!("Daybook Status");
            println!("==============");
            println!();
            println!("Storage:");
            println!("  Location: {}", store.path().display());
            if stats.document_exists {
                println!("  Size:     {}", stats.size_human());
            } else {
                println!("  Size:     (no journal file yet)");
            }
            println!();
            println!("Contents:");
            println!("  Entries: {}", journal.len());
            println!("  Days:    {}", journal.group_by_day().len());
            if let Some(newest) = newest {
                println!(
                    "  Latest:  {}",
                    newest.with_timezone(&Local).format("%B %-d, %Y %-I:%M %p")
                );
            }
        }
    }

    Ok(())
}
