use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Text shown by the disabled first option of every review selection.
pub const SELECTION_PLACEHOLDER: &str = "Select the category";

pub fn healthz_route() -> &'static str {
    "/healthz"
}

pub fn submit_info_route() -> &'static str {
    "/submit_info"
}

pub fn submit_uncategorized_update_route() -> &'static str {
    "/submit_uncategorized_update"
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitInfoRequest {
    pub category_info: Vec<String>,
    pub notes: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub add_times: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub processed_data: String,
    pub are_uncategorized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncategorized_list: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_list: Option<Vec<String>>,
}

impl ProcessingResult {
    /// An empty `processed_data` tells the client there is nothing to display.
    pub fn has_output(&self) -> bool {
        !self.processed_data.is_empty()
    }
}

/// Manual category choices keyed by note text. Later inserts for the same
/// note replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UncategorizedUpdate(BTreeMap<String, String>);

impl UncategorizedUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, note: impl Into<String>, category: impl Into<String>) {
        self.0.insert(note.into(), category.into());
    }

    pub fn get(&self, note: &str) -> Option<&str> {
        self.0.get(note).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(note, category)| (note.as_str(), category.as_str()))
    }
}

impl<N, C> FromIterator<(N, C)> for UncategorizedUpdate
where
    N: Into<String>,
    C: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, C)>>(iter: T) -> Self {
        let mut update = Self::new();
        for (note, category) in iter {
            update.insert(note, category);
        }
        update
    }
}
