use std::path::{Path, PathBuf};

use funnel_io::{inspect_columns, parse_upload, read_file, UploadError, UploadFormat};
use rust_xlsxwriter::{Format, Workbook};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load(path: &Path) -> Result<Vec<funnel_verify::ExternalReview>, UploadError> {
    let bytes = read_file(path)?;
    parse_upload(&bytes, UploadFormat::from_file_name(path))
}

// -------------------------------------------------------------------------
// Delimited text
// -------------------------------------------------------------------------

#[test]
fn marketplace_csv_export() {
    let reviews = load(&fixtures_dir().join("sellersprite.csv")).unwrap();

    // blank review row dropped
    assert_eq!(reviews.len(), 3);

    assert_eq!(reviews[0].text, "Sturdy stand, easy to assemble, my goats love it");
    assert_eq!(reviews[0].rating, Some(5));
    assert_eq!(reviews[0].title.as_deref(), Some("Solid stand"));
    assert_eq!(reviews[0].date.as_deref(), Some("2024-05-01"));

    assert_eq!(
        reviews[1].text,
        "We use it twice a day.\r\nHeadpiece adjusts for our Nigerian Dwarf \"Daisy\" and the Boers."
    );
    assert_eq!(reviews[1].rating, Some(5));

    assert_eq!(reviews[2].text, "Wheels squeak, otherwise fine");
    assert_eq!(reviews[2].rating, Some(3));
}

#[test]
fn csv_columns_are_reported() {
    let bytes = std::fs::read(fixtures_dir().join("sellersprite.csv")).unwrap();
    let report = inspect_columns(&bytes, UploadFormat::Delimited { delimiter: None }).unwrap();

    assert_eq!(report.headers[0], "asin");
    assert_eq!(report.rows, 4);
    let cols = report.columns.unwrap();
    assert_eq!(cols.text, "reviewDescription");
    assert_eq!(cols.rating.as_deref(), Some("ratingScore"));
    assert_eq!(cols.title.as_deref(), Some("reviewTitle"));
    assert_eq!(cols.date.as_deref(), Some("date"));
}

#[test]
fn wrong_columns_name_what_was_found() {
    let err = load(&fixtures_dir().join("wrong_columns.csv")).unwrap_err();
    match err {
        UploadError::MissingColumn { role, found } => {
            assert_eq!(role, "review text");
            assert_eq!(found, vec!["Author", "Stars", "When"]);
        }
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let err = load(&fixtures_dir().join("no_such_export.csv")).unwrap_err();
    assert!(matches!(err, UploadError::Io(_)));
    assert!(err.to_string().contains("no_such_export.csv"));
}

#[test]
fn empty_file_is_empty_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "").unwrap();
    assert!(matches!(load(&path), Err(UploadError::EmptyInput)));

    std::fs::write(&path, "reviewDescription,rating\r\n").unwrap();
    assert!(matches!(load(&path), Err(UploadError::EmptyInput)));
}

// -------------------------------------------------------------------------
// Spreadsheets
// -------------------------------------------------------------------------

#[test]
fn xlsx_first_sheet_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviews.xlsx");

    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Date").unwrap();
    sheet.write_string(0, 1, "Rating Score").unwrap();
    sheet.write_string(0, 2, "Review Title").unwrap();
    sheet.write_string(0, 3, "ReviewDescription").unwrap();

    sheet.write_number_with_format(1, 0, 45292.0, &date_format).unwrap();
    sheet.write_number(1, 1, 5.0).unwrap();
    sheet.write_string(1, 2, "Great").unwrap();
    sheet.write_string(1, 3, "Sturdy stand, easy to assemble").unwrap();

    // blank review text
    sheet.write_number(2, 1, 4.0).unwrap();
    sheet.write_string(2, 2, "No body").unwrap();

    sheet.write_string(3, 1, "n/a").unwrap();
    sheet.write_string(3, 3, "Wheels squeak").unwrap();

    let other = workbook.add_worksheet();
    other.write_string(0, 0, "body").unwrap();
    other.write_string(1, 0, "from the second sheet").unwrap();

    workbook.save(&path).unwrap();

    let reviews = load(&path).unwrap();
    assert_eq!(reviews.len(), 2);

    assert_eq!(reviews[0].text, "Sturdy stand, easy to assemble");
    assert_eq!(reviews[0].rating, Some(5));
    assert_eq!(reviews[0].title.as_deref(), Some("Great"));
    assert_eq!(reviews[0].date.as_deref(), Some("2024-01-01"));

    assert_eq!(reviews[1].text, "Wheels squeak");
    assert_eq!(reviews[1].rating, None);
    assert_eq!(reviews[1].date, None);
}

#[test]
fn xlsx_without_review_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wrong.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Author").unwrap();
    sheet.write_string(0, 1, "Stars").unwrap();
    sheet.write_string(1, 0, "Bob").unwrap();
    sheet.write_number(1, 1, 5.0).unwrap();
    workbook.save(&path).unwrap();

    let err = load(&path).unwrap_err();
    assert_eq!(err.found_headers().unwrap(), &["Author".to_string(), "Stars".to_string()]);
}

#[test]
fn xlsx_header_only_is_empty_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("header_only.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "reviewDescription").unwrap();
    workbook.save(&path).unwrap();

    assert!(matches!(load(&path), Err(UploadError::EmptyInput)));
}
