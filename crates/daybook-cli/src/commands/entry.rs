//! Entry command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use daybook_core::{EntryUpdate, Mood};

use super::Journal;
use crate::editor::{compose_entry, confirm};
use crate::image::PathImageProvider;
use crate::output::{short_id, Output};

/// Add a new entry
pub async fn add(
    journal: &mut Journal,
    content: Option<String>,
    mood: String,
    image: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    // Check the mood before anyone spends time in the editor
    mood.parse::<Mood>()?;

    let image = pick_image(journal, image)?;

    let content = match content {
        Some(c) => c,
        None => compose_entry("How are you feeling today?", "")?,
    };

    if content.trim().is_empty() {
        bail!("Please write something in your journal entry");
    }

    let id = journal
        .add(content, &mood, image)
        .await
        .context("Failed to save your journal entry")?;

    output.success(&format!("Added entry {}", short_id(&id)));
    if let Some(entry) = journal.get_by_id(&id) {
        output.print_entry(entry);
    }

    Ok(())
}

/// List entries grouped by day, or by month
pub fn list(journal: &Journal, by_month: bool, output: &Output) -> Result<()> {
    if by_month {
        output.print_months(&journal.group_by_month());
    } else {
        output.print_days(&journal.group_by_day());
    }
    Ok(())
}

/// Show a single entry
pub fn show(journal: &Journal, id: String, output: &Output) -> Result<()> {
    let entry = journal.find_by_prefix(&id)?;
    output.print_entry(entry);
    Ok(())
}

/// Edit an entry
///
/// With no field flags the text is opened in the editor.
pub async fn edit(
    journal: &mut Journal,
    id: String,
    content: Option<String>,
    mood: Option<String>,
    image: Option<PathBuf>,
    clear_image: bool,
    output: &Output,
) -> Result<()> {
    let entry = journal.find_by_prefix(&id)?.clone();

    let mut update = EntryUpdate::default();
    if let Some(mood) = mood {
        update = update.mood(mood);
    }
    if clear_image {
        update = update.image(None);
    } else if image.is_some() {
        let picked = pick_image(journal, image)?;
        update = update.image(picked);
    }

    let content = match content {
        Some(c) => Some(c),
        None if update.is_empty() => Some(compose_entry(
            &format!("Editing entry {}", short_id(&entry.id)),
            &entry.content,
        )?),
        None => None,
    };

    if let Some(content) = content {
        if content.trim().is_empty() {
            bail!("Please write something in your journal entry");
        }
        // The editor round trip drops trailing whitespace
        if content.trim_end() != entry.content.trim_end() {
            update = update.content(content);
        }
    }

    if update.is_empty() {
        output.message("No changes.");
        return Ok(());
    }

    journal
        .update(&entry.id, update)
        .await
        .context("Failed to update your journal entry")?;

    output.success(&format!("Updated entry {}", short_id(&entry.id)));
    Ok(())
}

/// Delete an entry
pub async fn delete(journal: &mut Journal, id: String, output: &Output) -> Result<()> {
    let entry = journal.find_by_prefix(&id)?.clone();

    if output.should_prompt() {
        let preview = entry.content.lines().next().unwrap_or("");
        println!("Delete entry: {} - {}", short_id(&entry.id), preview);
        if !confirm("Are you sure you want to delete this journal entry?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    journal
        .delete(&entry.id)
        .await
        .context("Failed to delete your journal entry")?;

    output.success(&format!("Deleted entry {}", short_id(&entry.id)));
    Ok(())
}

/// List the available moods
pub fn moods(output: &Output) -> Result<()> {
    output.print_moods();
    Ok(())
}

/// Resolve `--image` through the journal's image seam
///
/// A path that was given but cannot be used is an error here, since the
/// user asked for it explicitly.
fn pick_image(journal: &mut Journal, path: Option<PathBuf>) -> Result<Option<String>> {
    let picked = journal.pick_image(&PathImageProvider::new(path));
    if let Some(err) = journal.take_error() {
        return Err(err.into());
    }
    Ok(picked)
}
