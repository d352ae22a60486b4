//! `funnel columns`: show how an upload's headers map to review roles.

use std::path::PathBuf;

use funnel_io::{inspect_columns, read_file, ColumnReport, UploadFormat};

use crate::exit_codes::EXIT_MISSING_COLUMN;
use crate::CliError;

pub fn cmd_columns(file: PathBuf, format: UploadFormat, json: bool) -> Result<(), CliError> {
    let bytes = read_file(&file).map_err(CliError::upload)?;
    let report = inspect_columns(&bytes, format).map_err(CliError::upload)?;

    if json {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        print!("{}", render_report(&report));
    }

    if report.columns.is_none() {
        return Err(CliError {
            code: EXIT_MISSING_COLUMN,
            message: "review text column not found".into(),
            hint: Some("expected a header containing reviewDescription, review text, body or content".into()),
        });
    }
    Ok(())
}

fn render_report(report: &ColumnReport) -> String {
    let mut out = format!("{} columns, {} data rows\n", report.headers.len(), report.rows);
    for h in &report.headers {
        out.push_str(&format!("  {h}\n"));
    }

    let Some(ref cols) = report.columns else {
        return out;
    };
    let show = |c: &Option<String>| c.clone().unwrap_or_else(|| "-".into());
    out.push('\n');
    out.push_str(&format!("text:    {}\n", cols.text));
    out.push_str(&format!("rating:  {}\n", show(&cols.rating)));
    out.push_str(&format!("title:   {}\n", show(&cols.title)));
    out.push_str(&format!("date:    {}\n", show(&cols.date)));
    out
}
