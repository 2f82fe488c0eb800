//! Adapter traits between the controller and whatever renders the form.

use shared::protocol::SELECTION_PLACEHOLDER;

/// The input side of the form plus its results display.
pub trait FormSurface {
    fn category_text(&self) -> String;
    fn note_text(&self) -> String;
    fn display_results(&mut self, text: &str);
    /// Resize inputs and the results display to fit their content. Surfaces
    /// without layout may ignore this.
    fn fit_to_content(&mut self) {}
    /// Enables or disables both submit triggers.
    fn set_triggers_enabled(&mut self, enabled: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The disabled first option; nothing meaningful was chosen.
    Placeholder,
    Category(String),
}

/// Options offered by every review row: the placeholder, then each category
/// in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOptions {
    placeholder: &'static str,
    categories: Vec<String>,
}

impl SelectionOptions {
    pub fn new(categories: Vec<String>) -> Self {
        Self {
            placeholder: SELECTION_PLACEHOLDER,
            categories,
        }
    }

    pub fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Option count including the placeholder.
    pub fn option_count(&self) -> usize {
        self.categories.len() + 1
    }
}

/// The review container and its rows.
pub trait ReviewSurface {
    /// Handle to one rendered row, returned by `render_row` and handed back to
    /// `read_selection`.
    type Row;

    fn set_visible(&mut self, visible: bool);
    fn render_row(&mut self, index: usize, note: &str, options: &SelectionOptions) -> Self::Row;
    fn clear_rows(&mut self);
    fn read_selection(&mut self, row: &Self::Row) -> Selection;
}
