use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Result;
use async_trait::async_trait;
use shared::protocol::{ProcessingResult, SubmitInfoRequest, UncategorizedUpdate};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub mod error;
pub mod review;
pub mod surface;
pub mod transport;

pub use error::ControllerError;
pub use review::{ReviewRow, ReviewWorkflow};
pub use surface::{FormSurface, ReviewSurface, Selection, SelectionOptions};
pub use transport::HttpCategorizerBackend;

#[async_trait]
pub trait CategorizerBackend: Send + Sync {
    async fn submit_info(&self, request: &SubmitInfoRequest) -> Result<ProcessingResult>;
    async fn submit_uncategorized_update(
        &self,
        update: &UncategorizedUpdate,
    ) -> Result<ProcessingResult>;
}

/// When the review rows are cleared relative to the update round trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClearPolicy {
    /// Clear before sending; rows are not restored if the request fails.
    #[default]
    Optimistic,
    /// Keep rows until the backend answers, and keep them on failure.
    ConfirmThenClear,
}

#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    pub clear_policy: ClearPolicy,
    /// Ask the backend for per-category time totals.
    pub add_times: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    AwaitingFirstResponse,
    ResultsShown,
    ReviewPending,
    AwaitingSecondResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundTripOutcome {
    /// The backend returned empty `processed_data`; the UI was left alone.
    NothingToShow,
    ResultsShown,
    ReviewPending { rows: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTrip {
    /// Notes sent by `submit`, or assignments sent by `submit_update`.
    pub sent: usize,
    pub outcome: RoundTripOutcome,
}

/// Injected UI handles for `initialize`.
pub struct UiHandles<F, R> {
    pub form: F,
    pub review: R,
}

/// Splits raw textarea input on line feeds. Nothing is trimmed, so blank
/// lines become empty entries and empty input yields one empty entry.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

pub fn initialize<F, R>(
    handles: UiHandles<F, R>,
    backend: Arc<dyn CategorizerBackend>,
    options: ControllerOptions,
) -> Controller<F, R>
where
    F: FormSurface,
    R: ReviewSurface,
{
    let UiHandles { mut form, review } = handles;
    let mut review = ReviewWorkflow::new(review);
    review.teardown();
    form.set_triggers_enabled(true);

    Controller {
        backend,
        options,
        in_flight: AtomicBool::new(false),
        inner: Mutex::new(ControllerInner {
            form,
            review,
            state: WorkflowState::Idle,
            results_shown: false,
        }),
    }
}

pub struct Controller<F, R: ReviewSurface> {
    backend: Arc<dyn CategorizerBackend>,
    options: ControllerOptions,
    in_flight: AtomicBool,
    inner: Mutex<ControllerInner<F, R>>,
}

struct ControllerInner<F, R: ReviewSurface> {
    form: F,
    review: ReviewWorkflow<R>,
    state: WorkflowState,
    results_shown: bool,
}

/// Held for one round trip. A round trip dropped before it settles (e.g. by
/// a caller-side timeout) still re-enables the triggers and recomputes the
/// state on the way out.
struct InFlight<'a, F: FormSurface, R: ReviewSurface> {
    flag: &'a AtomicBool,
    inner: &'a Mutex<ControllerInner<F, R>>,
    settled: bool,
}

impl<F: FormSurface, R: ReviewSurface> InFlight<'_, F, R> {
    fn settle(&mut self) {
        self.settled = true;
    }
}

impl<F: FormSurface, R: ReviewSurface> Drop for InFlight<'_, F, R> {
    fn drop(&mut self) {
        if !self.settled {
            match self.inner.try_lock() {
                Ok(mut inner) => {
                    warn!("round trip abandoned before the backend answered");
                    inner.finish_round_trip();
                }
                Err(_) => warn!("round trip abandoned while the form was busy"),
            }
        }
        self.flag.store(false, Ordering::Release);
    }
}

impl<F, R> Controller<F, R>
where
    F: FormSurface,
    R: ReviewSurface,
{
    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub async fn state(&self) -> WorkflowState {
        self.inner.lock().await.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Note texts of the currently rendered review rows, in order.
    pub async fn pending_notes(&self) -> Vec<String> {
        let inner = self.inner.lock().await;
        inner
            .review
            .rows()
            .iter()
            .map(|row| row.note().to_string())
            .collect()
    }

    /// Sends the form's categories and notes, then routes the response.
    pub async fn submit(&self) -> Result<RoundTrip, ControllerError> {
        let mut flight = self.begin_round_trip().await?;

        let request = {
            let mut inner = self.inner.lock().await;
            inner.state = WorkflowState::AwaitingFirstResponse;
            SubmitInfoRequest {
                category_info: split_lines(&inner.form.category_text()),
                notes: split_lines(&inner.form.note_text()),
                add_times: self.options.add_times,
            }
        };
        let sent = request.notes.len();
        debug!(
            categories = request.category_info.len(),
            notes = sent,
            "submitting categories and notes"
        );

        let response = self.backend.submit_info(&request).await;

        let mut inner = self.inner.lock().await;
        let outcome = match response {
            Ok(result) => inner.route_result(result, false),
            Err(err) => Err(ControllerError::Backend(err)),
        };
        inner.finish_round_trip();
        flight.settle();
        log_outcome("submit", &outcome);
        outcome.map(|outcome| RoundTrip { sent, outcome })
    }

    /// Collects the review selections and sends them as an update.
    pub async fn submit_update(&self) -> Result<RoundTrip, ControllerError> {
        let mut flight = self.begin_round_trip().await?;
        let policy = self.options.clear_policy;

        let update = {
            let mut inner = self.inner.lock().await;
            let update = inner.review.collect();
            if policy == ClearPolicy::Optimistic {
                inner.review.teardown();
            }
            inner.state = WorkflowState::AwaitingSecondResponse;
            update
        };
        let sent = update.len();
        debug!(assignments = sent, ?policy, "submitting uncategorized update");

        let response = self.backend.submit_uncategorized_update(&update).await;

        let mut inner = self.inner.lock().await;
        let outcome = match response {
            Ok(result) => inner.route_result(result, policy == ClearPolicy::ConfirmThenClear),
            Err(err) => Err(ControllerError::Backend(err)),
        };
        inner.finish_round_trip();
        flight.settle();
        log_outcome("submit_update", &outcome);
        outcome.map(|outcome| RoundTrip { sent, outcome })
    }

    /// Gives the surfaces back, e.g. to flush output once the workflow ends.
    pub fn into_handles(self) -> UiHandles<F, R> {
        let inner = self.inner.into_inner();
        UiHandles {
            form: inner.form,
            review: inner.review.into_surface(),
        }
    }

    async fn begin_round_trip(&self) -> Result<InFlight<'_, F, R>, ControllerError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(ControllerError::RequestInFlight);
        }
        let flight = InFlight {
            flag: &self.in_flight,
            inner: &self.inner,
            settled: false,
        };
        self.inner.lock().await.form.set_triggers_enabled(false);
        Ok(flight)
    }
}

impl<F, R> ControllerInner<F, R>
where
    F: FormSurface,
    R: ReviewSurface,
{
    /// Applies a backend result to the UI. The result is validated before
    /// anything is touched, so a malformed one leaves the UI unchanged.
    fn route_result(
        &mut self,
        result: ProcessingResult,
        clear_first: bool,
    ) -> Result<RoundTripOutcome, ControllerError> {
        let review_lists = if result.are_uncategorized {
            let notes = result
                .uncategorized_list
                .as_deref()
                .ok_or(ControllerError::MalformedResult(
                    "uncategorized_list missing while are_uncategorized is set",
                ))?;
            let categories = result
                .category_list
                .as_deref()
                .ok_or(ControllerError::MalformedResult(
                    "category_list missing while are_uncategorized is set",
                ))?;
            Some((notes, categories))
        } else {
            None
        };

        if clear_first {
            self.review.teardown();
        }
        if !result.has_output() {
            return Ok(RoundTripOutcome::NothingToShow);
        }

        match review_lists {
            Some((notes, categories)) => {
                self.review.render(notes, categories);
            }
            None => self.review.teardown(),
        }
        self.form.display_results(&result.processed_data);
        self.results_shown = true;
        self.form.fit_to_content();

        Ok(if self.review.is_pending() {
            RoundTripOutcome::ReviewPending {
                rows: self.review.rows().len(),
            }
        } else {
            RoundTripOutcome::ResultsShown
        })
    }

    fn finish_round_trip(&mut self) {
        self.state = if self.review.is_pending() {
            WorkflowState::ReviewPending
        } else if self.results_shown {
            WorkflowState::ResultsShown
        } else {
            WorkflowState::Idle
        };
        self.form.set_triggers_enabled(true);
    }
}

fn log_outcome(action: &str, outcome: &Result<RoundTripOutcome, ControllerError>) {
    match outcome {
        Ok(outcome) => info!(action, ?outcome, "round trip complete"),
        Err(err) => warn!(action, %err, "round trip failed"),
    }
}

#[cfg(test)]
#[path = "tests/fakes.rs"]
mod fakes;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
