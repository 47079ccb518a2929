use std::{io::IsTerminal, path::PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;

use crate::{
    host::storage::log_store::{JsonLogStore, LogStore},
    utils::time::date_to_record_name,
};

use super::output::{analysis::analyze_days, render_days};

#[derive(Debug, Parser)]
pub struct SummaryCommand {
    #[arg(long, help = "Only show a single day, for example 2025-03-15")]
    date: Option<NaiveDate>,
    #[arg(short, long, help = "List every logged interval below its domain")]
    details: bool,
}

/// Command to process `summary` command. Reads the whole log once and prints time per domain for
/// every day, most recent first.
pub async fn process_summary_command(
    app_dir: PathBuf,
    SummaryCommand { date, details }: SummaryCommand,
) -> Result<()> {
    let storage = JsonLogStore::new(app_dir)?;
    let log = storage.read_all().await?;

    let only = date.map(date_to_record_name);
    let days = analyze_days(log, only.as_deref());
    if days.is_empty() {
        println!("No data yet.");
        return Ok(());
    }

    print!(
        "{}",
        render_days(&days, details, std::io::stdout().is_terminal())?
    );
    Ok(())
}
