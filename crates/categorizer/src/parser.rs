use std::fmt::Write as _;

use tracing::debug;

use crate::{category::Category, error::CategorizeError, note::Note};

#[derive(Debug, Clone, Default)]
pub struct Parser {
    categories: Vec<Category>,
}

impl Parser {
    pub fn new(categories: Vec<Category>) -> Self {
        let mut parser = Self::default();
        for category in categories {
            parser.add_category(category);
        }
        parser
    }

    /// Appends a category, or merges its keywords into an existing category
    /// with the same name.
    pub fn add_category(&mut self, category: Category) {
        match self
            .categories
            .iter_mut()
            .find(|existing| existing.name == category.name)
        {
            Some(existing) => existing.merge_keywords(&category.keywords),
            None => self.categories.push(category),
        }
    }

    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Assigns each note to the single category that matches it. Notes
    /// matching no category, or more than one, stay unknown.
    pub fn categorize(&self, notes: Vec<Note>) -> ParsedData {
        let mut parsed = ParsedData {
            assignments: self
                .categories
                .iter()
                .cloned()
                .map(|category| (category, Vec::new()))
                .collect(),
            unknown: Vec::new(),
        };

        for note in notes {
            let matching: Vec<usize> = parsed
                .assignments
                .iter()
                .enumerate()
                .filter(|(_, (category, _))| category.matches(note.info()))
                .map(|(idx, _)| idx)
                .collect();

            match matching.as_slice() {
                [idx] => parsed.assignments[*idx].1.push(note),
                candidates => {
                    debug!(
                        note = note.raw(),
                        candidates = candidates.len(),
                        "note left uncategorized"
                    );
                    parsed.unknown.push(note);
                }
            }
        }

        parsed
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedData {
    assignments: Vec<(Category, Vec<Note>)>,
    unknown: Vec<Note>,
}

impl ParsedData {
    pub fn is_fully_parsed(&self) -> bool {
        self.unknown.is_empty()
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.assignments
            .iter()
            .map(|(category, _)| category.name.as_str())
    }

    pub fn category_notes(&self, name: &str) -> Option<&[Note]> {
        self.assignments
            .iter()
            .find(|(category, _)| category.name == name)
            .map(|(_, notes)| notes.as_slice())
    }

    pub fn unknown_notes(&self) -> &[Note] {
        &self.unknown
    }

    pub fn category_minutes(&self, name: &str) -> Option<u64> {
        self.category_notes(name).map(total_minutes)
    }

    pub fn note_count(&self) -> usize {
        self.unknown.len()
            + self
                .assignments
                .iter()
                .map(|(_, notes)| notes.len())
                .sum::<usize>()
    }

    /// Moves every unknown note whose raw text is `note_raw` into the named
    /// category and returns how many moved.
    pub fn assign(&mut self, note_raw: &str, category_name: &str) -> Result<usize, CategorizeError> {
        let Some(idx) = self
            .assignments
            .iter()
            .position(|(category, _)| category.name == category_name)
        else {
            return Err(CategorizeError::UnknownCategory {
                name: category_name.to_string(),
            });
        };

        let (moved, kept): (Vec<Note>, Vec<Note>) = std::mem::take(&mut self.unknown)
            .into_iter()
            .partition(|note| note.raw() == note_raw);
        self.unknown = kept;

        if moved.is_empty() {
            return Err(CategorizeError::NoteNotPending {
                note: note_raw.to_string(),
            });
        }

        let count = moved.len();
        self.assignments[idx].1.extend(moved);
        Ok(count)
    }

    /// Human-readable summary; empty when there were no notes at all.
    pub fn render_report(&self, add_times: bool) -> String {
        if self.note_count() == 0 {
            return String::new();
        }

        let mut out = String::new();
        for (category, notes) in &self.assignments {
            let _ = writeln!(out, "Category {} notes:", category.name);
            if notes.is_empty() {
                out.push_str("No notes for this category\n");
            } else {
                for note in notes {
                    let _ = writeln!(out, "* {note}");
                }
            }
            if add_times {
                let _ = writeln!(out, "Total time (minutes): {}", total_minutes(notes));
            }
            out.push('\n');
        }

        if !self.unknown.is_empty() {
            out.push_str("Uncategorized notes:\n");
            for note in &self.unknown {
                let _ = writeln!(out, "* {}", note.raw());
            }
        }

        out
    }
}

/// Sums in `u64`; a single `+N` offset may already be `u32::MAX`.
fn total_minutes(notes: &[Note]) -> u64 {
    notes.iter().map(|note| u64::from(note.minutes())).sum()
}
