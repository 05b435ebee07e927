//! Daybook CLI
//!
//! Command-line interface for Daybook - a mood journal.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use daybook_core::{Config, EntryRepository, JsonFileStore};

mod commands;
mod editor;
mod image;
mod output;

use commands::Journal;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Daybook - a local mood journal")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a new entry
    #[command(alias = "new")]
    Add {
        /// Entry text (opens editor if not provided)
        content: Option<String>,
        /// How you feel: amazing, good, okay, poor, terrible
        #[arg(short, long, default_value = "okay")]
        mood: String,
        /// Attach a photo
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
    /// List entries, newest day first
    #[command(alias = "ls")]
    List {
        /// Group by month instead of by day
        #[arg(long)]
        month: bool,
    },
    /// Show an entry
    Show {
        /// Entry ID (full id or prefix)
        id: String,
    },
    /// Edit an entry (opens editor if no field is given)
    Edit {
        /// Entry ID (full id or prefix)
        id: String,
        /// Replace the entry text
        #[arg(short, long)]
        content: Option<String>,
        /// Change the mood
        #[arg(short, long)]
        mood: Option<String>,
        /// Attach a different photo
        #[arg(short, long, conflicts_with = "clear_image")]
        image: Option<PathBuf>,
        /// Remove the photo
        #[arg(long)]
        clear_image: bool,
    },
    /// Delete an entry
    #[command(alias = "rm")]
    Delete {
        /// Entry ID (full id or prefix)
        id: String,
    },
    /// Show the mood dashboard
    Stats,
    /// List the available moods
    Moods,
    /// Show where the journal is stored
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Commands that don't need the journal
    match &cli.command {
        Some(Commands::Config { command }) => {
            return handle_config_command(command.clone(), cli.config.as_ref(), &output);
        }
        Some(Commands::Moods) => return commands::entry::moods(&output),
        _ => {}
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config);

    let mut journal = open_journal(&config, &output).await;

    match cli.command {
        None => commands::entry::list(&journal, false, &output),
        Some(command) => handle_command(command, &mut journal, &output).await,
    }
}

async fn handle_command(command: Commands, journal: &mut Journal, output: &Output) -> Result<()> {
    match command {
        Commands::Add {
            content,
            mood,
            image,
        } => commands::entry::add(journal, content, mood, image, output).await,
        Commands::List { month } => commands::entry::list(journal, month, output),
        Commands::Show { id } => commands::entry::show(journal, id, output),
        Commands::Edit {
            id,
            content,
            mood,
            image,
            clear_image,
        } => commands::entry::edit(journal, id, content, mood, image, clear_image, output).await,
        Commands::Delete { id } => commands::entry::delete(journal, id, output).await,
        Commands::Stats => commands::stats::show(journal, output),
        Commands::Status => commands::status::show(journal, output).await,
        Commands::Moods | Commands::Config { .. } => unreachable!(), // Handled in main
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Load the journal, reporting a failed load as a warning
///
/// A journal that could not be read still opens empty so that the
/// dashboard and status commands keep working.
async fn open_journal(config: &Config, output: &Output) -> Journal {
    let store = JsonFileStore::from_config(config);
    debug!("Opening journal at {:?}", store.path());

    let mut journal = EntryRepository::initialize(store).await;

    if let Some(err) = journal.take_error() {
        output.warning(&format!("{} ({})", err.user_message(), err));
        if let Some(suggestion) = err.storage_error().and_then(|e| e.recovery_suggestion()) {
            output.warning(suggestion);
        }
    }

    journal
}

/// Initialize logging for the CLI
///
/// Only initializes if DAYBOOK_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("DAYBOOK_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "daybook_core={},daybook_cli={}",
        log_level, log_level
    ));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
