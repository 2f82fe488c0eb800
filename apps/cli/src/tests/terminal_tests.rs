use std::io::Cursor;

use super::*;

fn options() -> SelectionOptions {
    SelectionOptions::new(vec!["Work".into(), "Home".into()])
}

fn review(input: &str) -> TerminalReview<Cursor<Vec<u8>>, Vec<u8>> {
    TerminalReview::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

#[test]
fn rows_are_printed_with_numbered_options() {
    let mut review = review("");
    review.set_visible(true);
    review.render_row(0, "Call mom", &options());

    let printed = String::from_utf8(review.into_output()).expect("utf8");
    assert!(printed.contains("Review uncategorized notes:"));
    assert!(printed.contains("[1] Call mom\n    0) Select the category  1) Work  2) Home\n"));
}

#[test]
fn answers_map_to_categories() {
    let mut review = review("2\n\nwork\n0\n");
    let rows: Vec<usize> = (0..4)
        .map(|index| review.render_row(index, &format!("note {index}"), &options()))
        .collect();

    assert_eq!(
        review.read_selection(&rows[0]),
        Selection::Category("Home".into())
    );
    assert_eq!(review.read_selection(&rows[1]), Selection::Placeholder);
    assert_eq!(
        review.read_selection(&rows[2]),
        Selection::Category("Work".into())
    );
    assert_eq!(review.read_selection(&rows[3]), Selection::Placeholder);
}

#[test]
fn invalid_answers_are_asked_again() {
    let mut review = review("7\nGarden\n1\n");
    let row = review.render_row(0, "Call mom", &options());

    assert_eq!(review.read_selection(&row), Selection::Category("Work".into()));
    let printed = String::from_utf8(review.into_output()).expect("utf8");
    assert_eq!(printed.matches("Enter a listed number").count(), 2);
}

#[test]
fn end_of_input_keeps_placeholder() {
    let mut review = review("");
    let row = review.render_row(0, "Call mom", &options());
    assert_eq!(review.read_selection(&row), Selection::Placeholder);
}

#[test]
fn cleared_rows_read_as_placeholder() {
    let mut review = review("1\n");
    let row = review.render_row(0, "Call mom", &options());
    review.clear_rows();
    assert_eq!(review.read_selection(&row), Selection::Placeholder);
}

#[test]
fn form_text_is_normalized_from_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let categories = dir.path().join("categories.txt");
    let notes = dir.path().join("notes.txt");
    std::fs::write(&categories, "Work: bug\r\nHome: milk\r\n").expect("write");
    std::fs::write(&notes, "Fix bug\n\nBuy milk\n").expect("write");

    let form = FileForm::from_paths(&categories, &notes, Vec::new()).expect("form");
    assert_eq!(form.category_text(), "Work: bug\nHome: milk");
    assert_eq!(form.note_text(), "Fix bug\n\nBuy milk");
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("missing.txt");
    let err = FileForm::from_paths(&missing, &missing, Vec::new())
        .err()
        .expect("must fail");
    assert!(err.to_string().contains("missing.txt"));
}

#[test]
fn results_are_written_verbatim() {
    let mut form = FileForm::new("", "", Vec::new());
    form.display_results("Category Work notes:\n* Fix bug\n\n");
    assert_eq!(
        String::from_utf8(form.into_output()).expect("utf8"),
        "Category Work notes:\n* Fix bug\n\n"
    );
}
