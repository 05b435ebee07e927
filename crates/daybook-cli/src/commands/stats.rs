//! Stats command handler

use anyhow::Result;

use super::Journal;
use crate::output::Output;

/// Show the mood dashboard
pub fn show(journal: &Journal, output: &Output) -> Result<()> {
    output.print_stats(
        &journal.stats(),
        &journal.mood_histogram(),
        &journal.weekday_histogram(),
    );
    Ok(())
}
