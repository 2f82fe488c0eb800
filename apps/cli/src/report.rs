use std::{io::Write, path::PathBuf};

use anyhow::{bail, Result};
use categorizer::{read_category_file, read_note_file, Parser};
use clap::Args;
use tracing::info;

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[arg(long)]
    pub category_path: PathBuf,
    #[arg(long)]
    pub notes_path: PathBuf,
    #[arg(long)]
    pub add_times: bool,
    /// Print only this category's notes.
    #[arg(long)]
    pub category: Option<String>,
}

/// Categorizes the files in one pass and prints the report. Notes that need
/// review stay in the uncategorized section.
pub fn run_report(args: &ReportArgs, out: &mut impl Write) -> Result<()> {
    let parser = Parser::new(read_category_file(&args.category_path)?);
    let parsed = parser.categorize(read_note_file(&args.notes_path)?);
    info!(
        notes = parsed.note_count(),
        uncategorized = parsed.unknown_notes().len(),
        "categorized files"
    );

    let Some(name) = args.category.as_deref() else {
        write!(out, "{}", parsed.render_report(args.add_times))?;
        return Ok(());
    };

    if parser.category_by_name(name).is_none() {
        bail!("unknown category '{name}'");
    }
    writeln!(out, "Category {name} notes:")?;
    let notes = parsed.category_notes(name).unwrap_or_default();
    if notes.is_empty() {
        writeln!(out, "No notes for this category")?;
    }
    for note in notes {
        writeln!(out, "* {note}")?;
    }
    if args.add_times {
        let minutes = parsed.category_minutes(name).unwrap_or_default();
        writeln!(out, "Total time (minutes): {minutes}")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod tests;
