use std::{fs, path::Path};

use anyhow::Context;
use tracing::warn;

use crate::{category::Category, note::Note};

const VALID_CATEGORY_EXAMPLE: &str = "Bob Dylan: music folk concert";

/// Parses category lines, skipping blank ones and logging malformed ones.
pub fn parse_category_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<Category> {
    lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let category = Category::parse_line(line);
            if category.is_none() {
                warn!(
                    line,
                    example = VALID_CATEGORY_EXAMPLE,
                    "skipping malformed category line"
                );
            }
            category
        })
        .collect()
}

pub fn parse_note_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<Note> {
    lines.into_iter().filter_map(Note::parse_line).collect()
}

pub fn read_category_file(path: &Path) -> anyhow::Result<Vec<Category>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read category file '{}'", path.display()))?;
    Ok(parse_category_lines(raw.lines()))
}

pub fn read_note_file(path: &Path) -> anyhow::Result<Vec<Note>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read notes file '{}'", path.display()))?;
    Ok(parse_note_lines(raw.lines()))
}
