//! Recording surfaces and a scripted backend shared by the controller and
//! review tests.

use std::collections::{HashMap, VecDeque};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::protocol::{ProcessingResult, SubmitInfoRequest, UncategorizedUpdate};
use tokio::sync::{oneshot, Mutex};

use crate::{
    surface::{FormSurface, ReviewSurface, Selection, SelectionOptions},
    CategorizerBackend,
};

#[derive(Debug, Default)]
pub(crate) struct FakeForm {
    pub categories: String,
    pub notes: String,
    pub displayed: Vec<String>,
    pub fit_calls: usize,
    pub triggers_enabled: bool,
    pub trigger_changes: Vec<bool>,
}

impl FakeForm {
    pub fn with_text(categories: &str, notes: &str) -> Self {
        Self {
            categories: categories.to_string(),
            notes: notes.to_string(),
            ..Self::default()
        }
    }
}

impl FormSurface for FakeForm {
    fn category_text(&self) -> String {
        self.categories.clone()
    }

    fn note_text(&self) -> String {
        self.notes.clone()
    }

    fn display_results(&mut self, text: &str) {
        self.displayed.push(text.to_string());
    }

    fn fit_to_content(&mut self) {
        self.fit_calls += 1;
    }

    fn set_triggers_enabled(&mut self, enabled: bool) {
        self.triggers_enabled = enabled;
        self.trigger_changes.push(enabled);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakeRow {
    pub index: usize,
    pub note: String,
    /// Placeholder first, then the categories.
    pub options: Vec<String>,
}

#[derive(Debug, Default)]
pub(crate) struct FakeReview {
    pub visible: bool,
    pub rows: Vec<FakeRow>,
    pub selections: HashMap<usize, Selection>,
    pub clear_calls: usize,
}

impl FakeReview {
    pub fn select(&mut self, index: usize, category: &str) {
        self.selections
            .insert(index, Selection::Category(category.to_string()));
    }
}

impl ReviewSurface for FakeReview {
    type Row = usize;

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn render_row(&mut self, index: usize, note: &str, options: &SelectionOptions) -> usize {
        let mut labels = vec![options.placeholder().to_string()];
        labels.extend(options.categories().iter().cloned());
        self.rows.push(FakeRow {
            index,
            note: note.to_string(),
            options: labels,
        });
        index
    }

    fn clear_rows(&mut self) {
        self.rows.clear();
        self.selections.clear();
        self.clear_calls += 1;
    }

    fn read_selection(&mut self, row: &usize) -> Selection {
        self.selections
            .get(row)
            .cloned()
            .unwrap_or(Selection::Placeholder)
    }
}

pub(crate) fn result(
    processed_data: &str,
    uncategorized: Option<&[&str]>,
    categories: &[&str],
) -> ProcessingResult {
    ProcessingResult {
        processed_data: processed_data.to_string(),
        are_uncategorized: uncategorized.is_some(),
        uncategorized_list: uncategorized.map(owned),
        category_list: uncategorized.map(|_| owned(categories)),
    }
}

pub(crate) fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Lets a test observe the controller while a request is parked.
pub(crate) struct Gate {
    reached: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

#[derive(Default)]
pub(crate) struct ScriptedBackend {
    info_responses: Mutex<VecDeque<Result<ProcessingResult>>>,
    update_responses: Mutex<VecDeque<Result<ProcessingResult>>>,
    pub info_requests: Mutex<Vec<SubmitInfoRequest>>,
    pub updates: Mutex<Vec<UncategorizedUpdate>>,
    info_gate: Mutex<Option<Gate>>,
    update_gate: Mutex<Option<Gate>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_info(mut self, response: Result<ProcessingResult>) -> Self {
        self.info_responses.get_mut().push_back(response);
        self
    }

    pub fn with_update(mut self, response: Result<ProcessingResult>) -> Self {
        self.update_responses.get_mut().push_back(response);
        self
    }

    /// Parks the next `submit_info` call. Returns a receiver that fires once
    /// the call is parked and a sender that releases it.
    pub fn gate_info(&mut self) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (gate, reached, release) = new_gate();
        *self.info_gate.get_mut() = Some(gate);
        (reached, release)
    }

    pub fn gate_update(&mut self) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (gate, reached, release) = new_gate();
        *self.update_gate.get_mut() = Some(gate);
        (reached, release)
    }
}

fn new_gate() -> (Gate, oneshot::Receiver<()>, oneshot::Sender<()>) {
    let (reached_tx, reached_rx) = oneshot::channel();
    let (release_tx, release_rx) = oneshot::channel();
    (
        Gate {
            reached: reached_tx,
            release: release_rx,
        },
        reached_rx,
        release_tx,
    )
}

async fn pass_gate(gate: &Mutex<Option<Gate>>) {
    let gate = gate.lock().await.take();
    if let Some(gate) = gate {
        let _ = gate.reached.send(());
        let _ = gate.release.await;
    }
}

async fn next_response(queue: &Mutex<VecDeque<Result<ProcessingResult>>>) -> Result<ProcessingResult> {
    queue
        .lock()
        .await
        .pop_front()
        .unwrap_or_else(|| Err(anyhow!("no scripted response left")))
}

#[async_trait]
impl CategorizerBackend for ScriptedBackend {
    async fn submit_info(&self, request: &SubmitInfoRequest) -> Result<ProcessingResult> {
        self.info_requests.lock().await.push(request.clone());
        pass_gate(&self.info_gate).await;
        next_response(&self.info_responses).await
    }

    async fn submit_uncategorized_update(
        &self,
        update: &UncategorizedUpdate,
    ) -> Result<ProcessingResult> {
        self.updates.lock().await.push(update.clone());
        pass_gate(&self.update_gate).await;
        next_response(&self.update_responses).await
    }
}
