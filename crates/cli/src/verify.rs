//! `funnel verify`: match generated reviews against a marketplace export.

use std::collections::HashMap;
use std::path::PathBuf;

use funnel_io::{parse_upload, read_file, UploadFormat};
use funnel_verify::{CustomerRecord, GeneratedReview, VerifyConfig, VerifyResult};

use crate::customers::load_customers;
use crate::CliError;

pub struct VerifyArgs {
    pub customers: PathBuf,
    pub reviews: PathBuf,
    pub format: UploadFormat,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

pub fn cmd_verify(args: VerifyArgs) -> Result<(), CliError> {
    let config = match args.config {
        Some(ref path) => VerifyConfig::from_path(path).map_err(CliError::config)?,
        None => VerifyConfig::default(),
    };

    let customers = load_customers(&args.customers)?;
    let generated: Vec<GeneratedReview> = customers.iter().map(|c| c.generated_review()).collect();

    let bytes = read_file(&args.reviews).map_err(CliError::upload)?;
    let external = parse_upload(&bytes, args.format).map_err(CliError::upload)?;
    log::info!("parsed {} marketplace reviews from {}", external.len(), args.reviews.display());

    let result = funnel_verify::run(&config, &generated, &external);

    // Output
    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if let Some(ref path) = args.csv {
        let table = match_table_csv(&result, &customers)?;
        std::fs::write(path, table)
            .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "{} reviews checked against {} marketplace reviews: {} confirmed, {} probable, {} not found",
        s.total, s.external_reviews, s.confirmed, s.probable, s.not_found,
    );
    eprintln!(
        "stars: {} matched, {} mismatched, {} unknown",
        s.stars_matched, s.stars_mismatched, s.stars_unknown,
    );
    if s.excluded > 0 {
        eprintln!("{} customers excluded (no review text or not sent to the marketplace)", s.excluded);
    }

    Ok(())
}

/// Render the match table the dashboard shows, one row per generated review.
fn match_table_csv(result: &VerifyResult, customers: &[CustomerRecord]) -> Result<Vec<u8>, CliError> {
    let mut by_id: HashMap<&str, &CustomerRecord> = HashMap::new();
    for c in customers {
        by_id.entry(c.id.as_str()).or_insert(c);
    }

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    writer.write_record([
        "Customer", "Email", "Generated Review", "Generated Stars",
        "Best Match", "Match Rating", "Match Date", "Score (%)", "Stars Match", "Status",
    ]).map_err(|e| CliError::io(e.to_string()))?;

    for m in &result.matches {
        let customer = by_id.get(m.generated.customer_id.as_str());
        let best = m.best_match.as_ref();
        writer.write_record([
            customer.map(|c| c.display_name()).unwrap_or_else(|| m.generated.customer_id.clone()),
            customer.map(|c| c.email.clone()).unwrap_or_default(),
            m.generated.text.clone(),
            m.generated.stars.map(|s| s.to_string()).unwrap_or_default(),
            best.map(|b| b.text.clone()).unwrap_or_default(),
            best.and_then(|b| b.rating).map(|r| r.to_string()).unwrap_or_default(),
            best.and_then(|b| b.date.clone()).unwrap_or_default(),
            format!("{:.0}", m.score * 100.0),
            m.stars_match.to_string(),
            m.status.to_string(),
        ]).map_err(|e| CliError::io(e.to_string()))?;
    }

    writer.into_inner().map_err(|e| CliError::io(e.to_string()))
}
