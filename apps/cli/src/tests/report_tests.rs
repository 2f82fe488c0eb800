use std::path::Path;

use super::*;

fn write_inputs(dir: &Path, categories: &str, notes: &str) -> (PathBuf, PathBuf) {
    let category_path = dir.join("categories.txt");
    let notes_path = dir.join("notes.txt");
    std::fs::write(&category_path, categories).expect("write categories");
    std::fs::write(&notes_path, notes).expect("write notes");
    (category_path, notes_path)
}

fn report(args: &ReportArgs) -> Result<String> {
    let mut out = Vec::new();
    run_report(args, &mut out)?;
    Ok(String::from_utf8(out).expect("utf8"))
}

#[test]
fn full_report_reads_both_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (category_path, notes_path) = write_inputs(
        dir.path(),
        "Work: bug\n\nHome: milk\n",
        "+30: fix bug\nBuy milk\nCall mom\n",
    );

    let printed = report(&ReportArgs {
        category_path,
        notes_path,
        add_times: true,
        category: None,
    })
    .expect("report");

    assert!(printed.starts_with("Category Work notes:\n* +30: fix bug\nTotal time (minutes): 30\n"));
    assert!(printed.contains("Category Home notes:\n* Buy milk\nTotal time (minutes): 0\n"));
    assert!(printed.ends_with("Uncategorized notes:\n* Call mom\n"));
}

#[test]
fn single_category_prints_its_notes_and_total() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (category_path, notes_path) = write_inputs(
        dir.path(),
        "Work: bug deploy\nHome: milk\n",
        "09:00-09:45: fix bug\n+4294967295: deploy\nBuy milk\n",
    );

    let printed = report(&ReportArgs {
        category_path,
        notes_path,
        add_times: true,
        category: Some("Work".into()),
    })
    .expect("report");

    assert_eq!(
        printed,
        "Category Work notes:\n\
         * 09:00-09:45: fix bug\n\
         * +4294967295: deploy\n\
         Total time (minutes): 4294967340\n"
    );
}

#[test]
fn empty_category_says_so() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (category_path, notes_path) = write_inputs(dir.path(), "Work: bug\nHome: milk\n", "fix bug\n");

    let printed = report(&ReportArgs {
        category_path,
        notes_path,
        add_times: false,
        category: Some("Home".into()),
    })
    .expect("report");
    assert_eq!(printed, "Category Home notes:\nNo notes for this category\n");
}

#[test]
fn unknown_category_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (category_path, notes_path) = write_inputs(dir.path(), "Work: bug\n", "fix bug\n");

    let err = report(&ReportArgs {
        category_path,
        notes_path,
        add_times: false,
        category: Some("Garden".into()),
    })
    .expect_err("must fail");
    assert!(err.to_string().contains("unknown category 'Garden'"));
}

#[test]
fn missing_notes_file_names_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (category_path, _) = write_inputs(dir.path(), "Work: bug\n", "");

    let err = report(&ReportArgs {
        category_path,
        notes_path: dir.path().join("absent.txt"),
        add_times: false,
        category: None,
    })
    .expect_err("must fail");
    assert!(format!("{err:#}").contains("absent.txt"));
}
