//! `funnel export`: customer list as CSV.

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};

use funnel_verify::CustomerRecord;

use crate::customers::load_customers;
use crate::exit_codes::EXIT_INPUT;
use crate::CliError;

const HEADERS: [&str; 12] = [
    "ID", "Created At", "First Name", "Last Name", "Email",
    "Opt-in Surveys", "Review Generated", "Review Stars",
    "Review Tone", "Review Text", "Went to Amazon", "Claimed Gifts",
];

pub fn cmd_export(customers: PathBuf, output: Option<PathBuf>) -> Result<(), CliError> {
    let customers = load_customers(&customers)?;
    if customers.is_empty() {
        return Err(CliError {
            code: EXIT_INPUT,
            message: "no customers to export".into(),
            hint: None,
        });
    }

    let bytes = customers_csv(&customers)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &bytes)
                .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
            eprintln!("exported {} customers to {}", customers.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(&bytes).map_err(|e| CliError::io(e.to_string()))?;
        }
    }
    Ok(())
}

fn customers_csv(customers: &[CustomerRecord]) -> Result<Vec<u8>, CliError> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(HEADERS).map_err(|e| CliError::io(e.to_string()))?;

    for c in customers {
        writer.write_record([
            c.id.clone(),
            c.created_at.as_deref().map(iso_timestamp).unwrap_or_default(),
            c.first_name.clone(),
            c.last_name.clone(),
            c.email.clone(),
            yes_no(c.opt_in_surveys),
            yes_no(c.review_generated),
            c.review_stars.filter(|s| *s > 0).map(|s| s.to_string()).unwrap_or_default(),
            c.review_tone.clone().unwrap_or_default(),
            c.review_text.clone().unwrap_or_default(),
            yes_no(c.went_to_amazon),
            yes_no(c.claimed_gifts),
        ]).map_err(|e| CliError::io(e.to_string()))?;
    }

    writer.into_inner().map_err(|e| CliError::io(e.to_string()))
}

fn yes_no(b: bool) -> String {
    if b { "Yes" } else { "No" }.to_string()
}

/// Normalize to UTC with millisecond precision. Unparsable values pass through.
fn iso_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true),
        Err(_) => {
            log::warn!("created_at {raw:?} is not an RFC 3339 timestamp, exporting as-is");
            raw.to_string()
        }
    }
}
