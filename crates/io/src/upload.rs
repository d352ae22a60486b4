// Upload entry point: bytes + format hint -> ExternalReview list

use std::collections::HashMap;
use std::path::Path;

use funnel_verify::ExternalReview;

use crate::columns::ColumnMap;
use crate::error::UploadError;

/// Raw tabular data before column resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum TabularInput {
    /// Delimited text: the first row is the header.
    Rows(Vec<Vec<String>>),
    /// Spreadsheet sheets already keyed by header.
    Records {
        headers: Vec<String>,
        records: Vec<HashMap<String, String>>,
    },
}

impl TabularInput {
    /// Normalize to trimmed headers plus header-keyed, trimmed records.
    fn into_records(self) -> (Vec<String>, Vec<HashMap<String, String>>) {
        match self {
            Self::Rows(rows) => {
                let mut rows = rows.into_iter();
                let headers: Vec<String> = match rows.next() {
                    Some(h) => h.iter().map(|s| s.trim().to_string()).collect(),
                    None => return (Vec::new(), Vec::new()),
                };
                let records = rows
                    .map(|row| {
                        let mut record = HashMap::new();
                        for (i, h) in headers.iter().enumerate() {
                            let cell = row.get(i).map(|c| c.trim()).unwrap_or("");
                            record.entry(h.clone()).or_insert_with(|| cell.to_string());
                        }
                        record
                    })
                    .collect();
                (headers, records)
            }
            Self::Records { headers, records } => {
                let headers = headers.iter().map(|h| h.trim().to_string()).collect();
                let records = records
                    .into_iter()
                    .map(|r| {
                        r.into_iter()
                            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                            .collect()
                    })
                    .collect();
                (headers, records)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    /// Delimited text; `None` sniffs the delimiter from the content.
    Delimited { delimiter: Option<char> },
    /// First sheet of an xlsx / xls / xlsb / ods workbook.
    Spreadsheet,
}

impl UploadFormat {
    /// Spreadsheet extensions read as workbooks, everything else as delimited text.
    pub fn from_file_name(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("xlsx") | Some("xls") | Some("xlsb") | Some("xlsm") | Some("ods") => Self::Spreadsheet,
            Some("tsv") | Some("tab") => Self::Delimited { delimiter: Some('\t') },
            _ => Self::Delimited { delimiter: None },
        }
    }
}

/// Decode an upload into tabular form without interpreting columns.
pub fn read_tabular(bytes: &[u8], format: UploadFormat) -> Result<TabularInput, UploadError> {
    if bytes.is_empty() {
        return Err(UploadError::EmptyInput);
    }
    match format {
        UploadFormat::Spreadsheet => crate::xlsx::read_first_sheet(bytes),
        UploadFormat::Delimited { delimiter } => {
            let text = crate::csv::decode_bytes(bytes);
            let delimiter = delimiter.unwrap_or_else(|| crate::csv::sniff_delimiter(&text));
            Ok(TabularInput::Rows(crate::csv::parse_delimited(&text, delimiter)))
        }
    }
}

/// Read an upload from disk.
pub fn read_file(path: &Path) -> Result<Vec<u8>, UploadError> {
    std::fs::read(path).map_err(|e| UploadError::Io(format!("cannot read {}: {e}", path.display())))
}

/// Parse an upload into marketplace reviews.
///
/// Fails as a whole: no partial result on empty input or an unresolvable
/// review column.
pub fn parse_upload(bytes: &[u8], format: UploadFormat) -> Result<Vec<ExternalReview>, UploadError> {
    extract_reviews(read_tabular(bytes, format)?)
}

/// Headers present in an upload and the column picked for each role.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ColumnReport {
    pub headers: Vec<String>,
    pub rows: usize,
    pub columns: Option<ColumnMap>,
}

pub fn inspect_columns(bytes: &[u8], format: UploadFormat) -> Result<ColumnReport, UploadError> {
    let (headers, records) = read_tabular(bytes, format)?.into_records();
    if headers.is_empty() {
        return Err(UploadError::EmptyInput);
    }
    Ok(ColumnReport {
        columns: ColumnMap::resolve(&headers).ok(),
        rows: records.len(),
        headers,
    })
}

/// Resolve columns and turn data rows into reviews.
///
/// Rows with a blank review text are dropped. Rating cells that do not hold
/// a 1-5 integer become `None`.
pub fn extract_reviews(input: TabularInput) -> Result<Vec<ExternalReview>, UploadError> {
    let (headers, records) = input.into_records();
    if headers.is_empty() || records.is_empty() {
        return Err(UploadError::EmptyInput);
    }

    let columns = ColumnMap::resolve(&headers)?;
    let cell = |record: &HashMap<String, String>, column: &Option<String>| -> Option<String> {
        column
            .as_ref()
            .and_then(|c| record.get(c))
            .filter(|v| !v.is_empty())
            .cloned()
    };

    let mut reviews = Vec::new();
    let mut unrated = 0usize;
    for record in &records {
        let text = match record.get(&columns.text) {
            Some(t) if !t.trim().is_empty() => t.clone(),
            _ => continue,
        };

        let rating = cell(record, &columns.rating).and_then(|raw| {
            let parsed = parse_rating(&raw);
            if parsed.is_none() {
                unrated += 1;
            }
            parsed
        });

        reviews.push(ExternalReview {
            text,
            rating,
            title: cell(record, &columns.title),
            date: cell(record, &columns.date),
        });
    }

    if unrated > 0 {
        log::warn!("{unrated} review rows have a rating that is not a 1-5 integer");
    }
    log::debug!(
        "parsed {} reviews from {} data rows",
        reviews.len(),
        records.len()
    );
    Ok(reviews)
}

/// Leading-integer parse: `"5"`, `"5.0"` and `"4 out of 5"` all read their
/// first integer. Outside 1-5 is treated as no rating.
pub fn parse_rating(raw: &str) -> Option<u8> {
    let s = raw.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 || negative {
        return None;
    }
    digits[..end]
        .parse::<u8>()
        .ok()
        .filter(|r| (1..=5).contains(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv(text: &str) -> Result<Vec<ExternalReview>, UploadError> {
        parse_upload(text.as_bytes(), UploadFormat::Delimited { delimiter: Some(',') })
    }

    #[test]
    fn quoted_review_row() {
        let err = csv(
            "text,rating,title,date\n\"Hello, \"\"world\"\"\",5,\"Great\",\"2024-01-01\"\n",
        )
        .unwrap_err();
        // "text" alone is not a review-text header
        assert!(matches!(err, UploadError::MissingColumn { .. }));

        let reviews = csv(
            "review text,rating,title,date\n\"Hello, \"\"world\"\"\",5,\"Great\",\"2024-01-01\"\n",
        )
        .unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].text, "Hello, \"world\"");
        assert_eq!(reviews[0].rating, Some(5));
        assert_eq!(reviews[0].title.as_deref(), Some("Great"));
        assert_eq!(reviews[0].date.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn blank_review_rows_dropped() {
        let reviews = csv("body,stars\nGreat stand,5\n   ,4\n,3\nSolid,2\n").unwrap();
        let texts: Vec<&str> = reviews.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["Great stand", "Solid"]);
    }

    #[test]
    fn unparsable_rating_is_absent_not_zero() {
        let reviews = csv("body,rating\nA,five\nB,\nC,4.0\nD,0\nE,9\n").unwrap();
        let ratings: Vec<Option<u8>> = reviews.iter().map(|r| r.rating).collect();
        assert_eq!(ratings, vec![None, None, Some(4), None, None]);
    }

    #[test]
    fn no_rating_column_means_no_ratings() {
        let reviews = csv("content\nNice\n").unwrap();
        assert_eq!(reviews[0].rating, None);
        assert_eq!(reviews[0].title, None);
        assert_eq!(reviews[0].date, None);
    }

    #[test]
    fn short_rows_pad_with_empty_cells() {
        let reviews = csv("body,title,date\nNice stand\n").unwrap();
        assert_eq!(reviews[0].text, "Nice stand");
        assert_eq!(reviews[0].title, None);
    }

    #[test]
    fn cells_and_headers_are_trimmed() {
        let reviews = csv(" Body , Stars \n  Nice stand  , 5 \n").unwrap();
        assert_eq!(reviews[0].text, "Nice stand");
        assert_eq!(reviews[0].rating, Some(5));
    }

    #[test]
    fn empty_inputs() {
        assert!(matches!(csv(""), Err(UploadError::EmptyInput)));
        assert!(matches!(csv("body,rating\n"), Err(UploadError::EmptyInput)));
        assert!(matches!(csv("\u{FEFF}"), Err(UploadError::EmptyInput)));
    }

    #[test]
    fn missing_column_reports_headers() {
        let err = csv("Author,Rating\nBob,5\n").unwrap_err();
        assert_eq!(
            err.found_headers().unwrap(),
            &["Author".to_string(), "Rating".to_string()]
        );
    }

    #[test]
    fn records_input_from_spreadsheet() {
        let headers = vec!["Date".to_string(), "Rating Score".to_string(), "ReviewDescription".to_string()];
        let mut row = HashMap::new();
        row.insert("Date".to_string(), "2024-03-02".to_string());
        row.insert("Rating Score".to_string(), "4".to_string());
        row.insert("ReviewDescription".to_string(), " Works well ".to_string());

        let reviews = extract_reviews(TabularInput::Records { headers, records: vec![row] }).unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].text, "Works well");
        assert_eq!(reviews[0].rating, Some(4));
        assert_eq!(reviews[0].date.as_deref(), Some("2024-03-02"));
    }

    #[test]
    fn sniffed_semicolon_upload() {
        let text = "Body;Stars\n\"Sturdy, easy\";5\nHeavy;4\n";
        let reviews = parse_upload(text.as_bytes(), UploadFormat::Delimited { delimiter: None }).unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].text, "Sturdy, easy");
    }

    #[test]
    fn rating_prefix_parse() {
        assert_eq!(parse_rating("5"), Some(5));
        assert_eq!(parse_rating(" 3 "), Some(3));
        assert_eq!(parse_rating("4 out of 5 stars"), Some(4));
        assert_eq!(parse_rating("+2"), Some(2));
        assert_eq!(parse_rating("-1"), None);
        assert_eq!(parse_rating("stars: 5"), None);
        assert_eq!(parse_rating("300"), None);
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(UploadFormat::from_file_name(Path::new("r.XLSX")), UploadFormat::Spreadsheet);
        assert_eq!(UploadFormat::from_file_name(Path::new("r.ods")), UploadFormat::Spreadsheet);
        assert_eq!(
            UploadFormat::from_file_name(Path::new("r.tsv")),
            UploadFormat::Delimited { delimiter: Some('\t') }
        );
        assert_eq!(
            UploadFormat::from_file_name(Path::new("r.csv")),
            UploadFormat::Delimited { delimiter: None }
        );
    }

    #[test]
    fn inspect_reports_resolution() {
        let report = inspect_columns(b"Date,Body\n2024-01-01,Nice\n", UploadFormat::Delimited { delimiter: None }).unwrap();
        assert_eq!(report.headers, vec!["Date", "Body"]);
        assert_eq!(report.rows, 1);
        let cols = report.columns.unwrap();
        assert_eq!(cols.text, "Body");
        assert_eq!(cols.date.as_deref(), Some("Date"));

        let report = inspect_columns(b"Author\nBob\n", UploadFormat::Delimited { delimiter: None }).unwrap();
        assert!(report.columns.is_none());
    }
}
