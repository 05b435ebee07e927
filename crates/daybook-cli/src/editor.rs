//! Interactive editing support
//!
//! Opens $EDITOR for writing entry text.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::Command;

/// Last line of the guidance block written above the entry text
///
/// Only the block up to this line is removed, so entry lines starting with
/// `#` survive an edit.
const SCISSORS: &str = "# ------------------------ >8 ------------------------";

/// Open content in the user's preferred editor
///
/// Uses $EDITOR, $VISUAL, or falls back to common editors.
pub fn edit_text(initial_content: &str) -> Result<String> {
    let editor = find_editor()?;

    let temp_dir = env::temp_dir();
    let temp_path = temp_dir.join(format!("daybook_entry_{}.md", std::process::id()));

    fs::write(&temp_path, initial_content)
        .with_context(|| format!("Failed to create temp file: {:?}", temp_path))?;

    let status = Command::new(&editor)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor))?;

    if !status.success() {
        let _ = fs::remove_file(&temp_path);
        bail!(
            "Editor '{}' exited with non-zero status. Check that your editor is configured correctly.",
            editor
        );
    }

    let content = fs::read_to_string(&temp_path)
        .with_context(|| format!("Failed to read edited file: {:?}", temp_path))?;

    let _ = fs::remove_file(&temp_path);

    Ok(content)
}

/// Write an entry in the editor, starting from `current`
///
/// The guidance block above the scissors line is removed; surrounding blank
/// lines and trailing whitespace are trimmed.
pub fn compose_entry(prompt: &str, current: &str) -> Result<String> {
    let edited = edit_text(&initial_text(prompt, current)).context("Failed to edit entry")?;
    Ok(strip_guidance(&edited))
}

fn initial_text(prompt: &str, current: &str) -> String {
    format!(
        "# {}\n# Everything down to the line below is ignored.\n{}\n{}",
        prompt, SCISSORS, current
    )
}

fn strip_guidance(text: &str) -> String {
    let body = match text.lines().position(|line| line.trim_end() == SCISSORS) {
        Some(pos) => text.lines().skip(pos + 1).collect::<Vec<_>>().join("\n"),
        // Scissors deleted by the user: keep everything they left
        None => text.to_string(),
    };
    body.trim_start_matches(&['\r', '\n'][..]).trim_end().to_string()
}

/// Find the user's preferred editor
fn find_editor() -> Result<String> {
    if let Ok(editor) = env::var("EDITOR") {
        if !editor.is_empty() {
            return Ok(editor);
        }
    }

    if let Ok(visual) = env::var("VISUAL") {
        if !visual.is_empty() {
            return Ok(visual);
        }
    }

    let common_editors = ["nano", "vim", "vi", "emacs", "notepad"];

    for editor in common_editors {
        if command_exists(editor) {
            return Ok(editor.to_string());
        }
    }

    bail!(
        "No editor found. Set $EDITOR environment variable, or pass the entry text as an argument.\n\
         Example: export EDITOR=nano"
    )
}

/// Check if a command exists in PATH
fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guidance_is_stripped() {
        let edited = format!("{}\n", initial_text("How are you?", "Dear diary,\nit rained."));
        assert_eq!(strip_guidance(&edited), "Dear diary,\nit rained.");
    }

    #[test]
    fn test_hash_lines_in_entry_survive() {
        let current = "#grateful\nCoffee with Sam\n\n# Weekend\nLong walk";
        let edited = initial_text("Editing entry 5f0c2a9e", current);
        assert_eq!(strip_guidance(&edited), current);
    }

    #[test]
    fn test_only_guidance_is_empty() {
        assert_eq!(strip_guidance(&initial_text("prompt", "")), "");
        assert_eq!(strip_guidance(&format!("{}\n   \n", initial_text("prompt", ""))), "");
    }

    #[test]
    fn test_missing_scissors_keeps_text() {
        assert_eq!(strip_guidance("#tag\nhello\n"), "#tag\nhello");
    }

    #[test]
    fn test_command_exists() {
        #[cfg(unix)]
        assert!(command_exists("ls"));

        assert!(!command_exists("definitely_not_a_real_command_12345"));
    }
}
