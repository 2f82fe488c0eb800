use shared::protocol::UncategorizedUpdate;
use tracing::debug;

use crate::surface::{ReviewSurface, Selection, SelectionOptions};

#[derive(Debug)]
pub struct ReviewRow<H> {
    index: usize,
    note: String,
    handle: H,
}

impl<H> ReviewRow<H> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }
}

/// Render/collect/teardown cycle for notes the backend could not categorize.
///
/// The container is either visible with one row per pending note, or hidden
/// with no rows at all.
pub struct ReviewWorkflow<R: ReviewSurface> {
    surface: R,
    rows: Vec<ReviewRow<R::Row>>,
}

impl<R: ReviewSurface> ReviewWorkflow<R> {
    pub fn new(surface: R) -> Self {
        Self {
            surface,
            rows: Vec::new(),
        }
    }

    /// Replaces any previous rows with one row per note, in order. An empty
    /// note list tears the review down instead.
    pub fn render(&mut self, notes: &[String], categories: &[String]) -> usize {
        self.teardown();
        if notes.is_empty() {
            return 0;
        }

        let options = SelectionOptions::new(categories.to_vec());
        self.surface.set_visible(true);
        for (index, note) in notes.iter().enumerate() {
            let handle = self.surface.render_row(index, note, &options);
            self.rows.push(ReviewRow {
                index,
                note: note.clone(),
                handle,
            });
        }
        debug!(
            rows = self.rows.len(),
            options = options.option_count(),
            "rendered uncategorized review"
        );
        self.rows.len()
    }

    pub fn teardown(&mut self) {
        self.surface.set_visible(false);
        self.surface.clear_rows();
        self.rows.clear();
    }

    /// Builds the update from every row with a real selection. Rows sharing
    /// a note text collapse into one entry and the last row wins.
    pub fn collect(&mut self) -> UncategorizedUpdate {
        let mut update = UncategorizedUpdate::new();
        for row in &self.rows {
            match self.surface.read_selection(&row.handle) {
                Selection::Placeholder => {}
                Selection::Category(category) => update.insert(row.note.clone(), category),
            }
        }
        update
    }

    pub fn is_pending(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ReviewRow<R::Row>] {
        &self.rows
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    pub fn into_surface(self) -> R {
        self.surface
    }
}

#[cfg(test)]
#[path = "tests/review_tests.rs"]
mod tests;
