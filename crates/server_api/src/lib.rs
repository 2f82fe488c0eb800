use std::sync::Arc;

use categorizer::{parse_category_lines, parse_note_lines, CategorizeError, ParsedData, Parser};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{ProcessingResult, SubmitInfoRequest, UncategorizedUpdate},
};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// The latest categorization run. Update requests act on it until the next
/// `submit_info` replaces it.
#[derive(Debug)]
pub struct CategorizationSession {
    parsed: ParsedData,
    add_times: bool,
}

impl CategorizationSession {
    pub fn result(&self) -> ProcessingResult {
        let are_uncategorized = !self.parsed.is_fully_parsed();
        let uncategorized_list = are_uncategorized.then(|| {
            self.parsed
                .unknown_notes()
                .iter()
                .map(|note| note.raw().to_string())
                .collect()
        });
        let category_list = are_uncategorized.then(|| {
            self.parsed
                .category_names()
                .map(str::to_string)
                .collect()
        });

        ProcessingResult {
            processed_data: self.parsed.render_report(self.add_times),
            are_uncategorized,
            uncategorized_list,
            category_list,
        }
    }
}

#[derive(Clone, Default)]
pub struct ApiContext {
    pub session: Arc<Mutex<Option<CategorizationSession>>>,
}

impl ApiContext {
    pub fn new() -> Self {
        Self::default()
    }
}

pub async fn submit_info(
    ctx: &ApiContext,
    request: SubmitInfoRequest,
) -> Result<ProcessingResult, ApiError> {
    let categories = parse_category_lines(request.category_info.iter().map(String::as_str));
    let notes = parse_note_lines(request.notes.iter().map(String::as_str));
    let note_count = notes.len();

    let parsed = Parser::new(categories).categorize(notes);
    let session = CategorizationSession {
        parsed,
        add_times: request.add_times,
    };
    let result = session.result();

    info!(
        categories = result.category_list.as_ref().map_or(0, Vec::len),
        notes = note_count,
        uncategorized = result.uncategorized_list.as_ref().map_or(0, Vec::len),
        "categorized submission"
    );

    *ctx.session.lock().await = Some(session);
    Ok(result)
}

pub async fn submit_uncategorized_update(
    ctx: &ApiContext,
    update: UncategorizedUpdate,
) -> Result<ProcessingResult, ApiError> {
    let mut guard = ctx.session.lock().await;
    let Some(session) = guard.as_mut() else {
        return Err(ApiError::new(
            ErrorCode::NotFound,
            "no categorization in progress; submit categories and notes first",
        ));
    };

    // Validate every category up front so a bad entry leaves the session untouched.
    if let Some((_, unknown)) = update
        .iter()
        .find(|(_, category)| !session.parsed.category_names().any(|name| name == *category))
    {
        return Err(validation(CategorizeError::UnknownCategory {
            name: unknown.to_string(),
        }));
    }

    let mut resolved = 0;
    for (note, category) in update.iter() {
        match session.parsed.assign(note, category) {
            Ok(moved) => resolved += moved,
            Err(err @ CategorizeError::NoteNotPending { .. }) => {
                warn!(%err, "ignoring stale uncategorized update entry");
            }
            Err(err) => return Err(validation(err)),
        }
    }

    info!(
        requested = update.len(),
        resolved,
        remaining = session.parsed.unknown_notes().len(),
        "applied uncategorized update"
    );
    Ok(session.result())
}

fn validation(err: CategorizeError) -> ApiError {
    ApiError::new(ErrorCode::Validation, err.to_string())
}
