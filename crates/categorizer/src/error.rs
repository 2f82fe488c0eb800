use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategorizeError {
    #[error("unknown category '{name}'")]
    UnknownCategory { name: String },
    #[error("note '{note}' is not awaiting a category")]
    NoteNotPending { note: String },
}
