//! Keyword-driven note categorization.
//!
//! Categories are declared one per line as `<name>: <keyword> <keyword>...`
//! and notes one per line, optionally prefixed with a time range
//! (`10:25-10:45: ...`) or a duration (`+15: ...`). A note lands in a
//! category only when exactly one category matches it; everything else is
//! left for manual review.

mod category;
mod error;
mod note;
mod parser;
mod reader;

pub use category::Category;
pub use error::CategorizeError;
pub use note::{Note, NoteTime};
pub use parser::{ParsedData, Parser};
pub use reader::{parse_category_lines, parse_note_lines, read_category_file, read_note_file};
