//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use daybook_core::Config;

use crate::output::{Output, OutputFormat};

/// Settings `config set` accepts, with a short description
const SETTINGS: [(&str, &str); 2] = [
    ("data_dir", "directory holding journal_entries.json"),
    ("log_file", "debug log written when DAYBOOK_LOG is set ('none' resets)"),
];

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    let file = settings_file(config_path);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "config_file": file,
                    "data_dir": config.data_dir,
                    "log_file": config.log_file,
                    "journal": config.entries_path()
                })
            );
        }
        OutputFormat::Quiet => {
            for (key, value) in values(&config) {
                println!("{}={}", key, value);
            }
        }
        OutputFormat::Human => {
            println!("Settings from {}", file.display());
            println!();
            for ((key, value), (_, about)) in values(&config).into_iter().zip(SETTINGS) {
                println!("  {:<9} {}", key, value);
                println!("  {:<9} {}", "", about);
            }
            println!();
            println!("Journal file: {}", config.entries_path().display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    let previous_journal = config.entries_path();

    apply(&mut config, &key, &value)?;

    let file = settings_file(config_path);
    config
        .save_to_path(&file)
        .with_context(|| format!("Failed to write settings to {}", file.display()))?;

    output.success(&format!("{} is now {}", key, display_value(&config, &key)));
    if config.entries_path() != previous_journal && previous_journal.exists() {
        output.warning(&format!(
            "Your existing journal stays at {}. Move it to {} to keep your entries.",
            previous_journal.display(),
            config.entries_path().display()
        ));
    }

    Ok(())
}

/// Change one setting in memory
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            if value.trim().is_empty() {
                bail!("data_dir needs a directory path");
            }
            config.data_dir = PathBuf::from(value);
        }
        "log_file" => {
            config.log_file = match value {
                "" | "none" => None,
                path => Some(PathBuf::from(path)),
            };
        }
        _ => {
            let known: Vec<&str> = SETTINGS.iter().map(|(name, _)| *name).collect();
            bail!("No setting named '{}'. Try one of: {}", key, known.join(", "));
        }
    }
    Ok(())
}

fn settings_file(config_path: Option<&PathBuf>) -> PathBuf {
    config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path)
}

fn values(config: &Config) -> [(&'static str, String); 2] {
    [
        ("data_dir", display_value(config, "data_dir")),
        ("log_file", display_value(config, "log_file")),
    ]
}

fn display_value(config: &Config, key: &str) -> String {
    match key {
        "data_dir" => config.data_dir.display().to_string(),
        "log_file" => match &config.log_file {
            Some(path) => path.display().to_string(),
            None => format!("{} (default)", config.log_path().display()),
        },
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            data_dir: PathBuf::from("/home/sam/.local/share/daybook"),
            log_file: None,
        }
    }

    #[test]
    fn test_apply_data_dir() {
        let mut config = config();
        apply(&mut config, "data_dir", "/srv/journal").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/journal"));
        assert!(apply(&mut config, "data_dir", "  ").is_err());
    }

    #[test]
    fn test_apply_log_file_and_reset() {
        let mut config = config();
        apply(&mut config, "log_file", "/tmp/daybook.log").unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/daybook.log")));
        assert_eq!(display_value(&config, "log_file"), "/tmp/daybook.log");

        apply(&mut config, "log_file", "none").unwrap();
        assert!(config.log_file.is_none());
        assert!(display_value(&config, "log_file").ends_with("debug.log (default)"));
    }

    #[test]
    fn test_apply_unknown_key() {
        let err = apply(&mut config(), "theme", "dark").unwrap_err();
        assert!(err.to_string().contains("data_dir, log_file"));
    }
}
