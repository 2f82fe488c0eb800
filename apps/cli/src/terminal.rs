//! Text-mode form and review surfaces.

use std::{
    fs,
    io::{BufRead, Write},
    path::Path,
};

use anyhow::{Context, Result};
use client_core::{FormSurface, ReviewSurface, Selection, SelectionOptions};
use tracing::{debug, warn};

/// Form whose inputs come from files and whose results go to a writer.
pub struct FileForm<W> {
    categories: String,
    notes: String,
    out: W,
}

impl<W: Write> FileForm<W> {
    pub fn new(categories: impl Into<String>, notes: impl Into<String>, out: W) -> Self {
        Self {
            categories: categories.into(),
            notes: notes.into(),
            out,
        }
    }

    /// Line endings are normalized and the trailing newline dropped, so the
    /// text matches what was typed into the form.
    pub fn from_paths(category_path: &Path, notes_path: &Path, out: W) -> Result<Self> {
        Ok(Self::new(
            read_form_text(category_path)?,
            read_form_text(notes_path)?,
            out,
        ))
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

fn read_form_text(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(text.lines().collect::<Vec<_>>().join("\n"))
}

impl<W: Write> FormSurface for FileForm<W> {
    fn category_text(&self) -> String {
        self.categories.clone()
    }

    fn note_text(&self) -> String {
        self.notes.clone()
    }

    fn display_results(&mut self, text: &str) {
        if let Err(err) = write!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!(%err, "failed to write results");
        }
    }

    fn set_triggers_enabled(&mut self, enabled: bool) {
        debug!(enabled, "submit triggers toggled");
    }
}

struct PromptRow {
    note: String,
    categories: Vec<String>,
}

/// Prints review rows and asks for a category number per row on collection.
pub struct TerminalReview<Rd, W> {
    input: Rd,
    out: W,
    rows: Vec<PromptRow>,
}

impl<Rd: BufRead, W: Write> TerminalReview<Rd, W> {
    pub fn new(input: Rd, out: W) -> Self {
        Self {
            input,
            out,
            rows: Vec::new(),
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn print(&mut self, text: &str) {
        if let Err(err) = write!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!(%err, "failed to write review output");
        }
    }
}

impl<Rd: BufRead, W: Write> ReviewSurface for TerminalReview<Rd, W> {
    type Row = usize;

    fn set_visible(&mut self, visible: bool) {
        if visible {
            self.print("\nReview uncategorized notes:\n");
        }
    }

    fn render_row(&mut self, index: usize, note: &str, options: &SelectionOptions) -> usize {
        let mut line = format!("[{}] {note}\n    0) {}", index + 1, options.placeholder());
        for (number, category) in options.categories().iter().enumerate() {
            line.push_str(&format!("  {}) {category}", number + 1));
        }
        line.push('\n');
        self.print(&line);

        self.rows.push(PromptRow {
            note: note.to_string(),
            categories: options.categories().to_vec(),
        });
        self.rows.len() - 1
    }

    fn clear_rows(&mut self) {
        self.rows.clear();
    }

    fn read_selection(&mut self, row: &usize) -> Selection {
        let Some(PromptRow { note, categories }) = self.rows.get(*row) else {
            return Selection::Placeholder;
        };
        let prompt = format!(
            "Category for \"{note}\" [0-{}, empty to skip]: ",
            categories.len()
        );
        let categories = categories.clone();

        loop {
            self.print(&prompt);
            let mut answer = String::new();
            match self.input.read_line(&mut answer) {
                Ok(0) => return Selection::Placeholder,
                Ok(_) => {}
                Err(err) => {
                    warn!(%err, "failed to read selection");
                    return Selection::Placeholder;
                }
            }
            match parse_answer(&answer, &categories) {
                Some(selection) => return selection,
                None => self.print("Enter a listed number or category name.\n"),
            }
        }
    }
}

/// Accepts an option number or a category name (case-insensitive). Empty
/// input and `0` keep the placeholder.
fn parse_answer(answer: &str, categories: &[String]) -> Option<Selection> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Some(Selection::Placeholder);
    }
    if let Ok(number) = answer.parse::<usize>() {
        return match number {
            0 => Some(Selection::Placeholder),
            n => categories
                .get(n - 1)
                .map(|category| Selection::Category(category.clone())),
        };
    }
    categories
        .iter()
        .find(|category| category.eq_ignore_ascii_case(answer))
        .map(|category| Selection::Category(category.clone()))
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
