//! Customer record loading shared by verify, analytics and export.

use std::path::Path;

use funnel_verify::CustomerRecord;

use crate::CliError;

/// Read customer records from a JSON array.
pub fn load_customers(path: &Path) -> Result<Vec<CustomerRecord>, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::input(format!("cannot read {}: {e}", path.display())))?;
    let customers = parse_customers(&text)
        .map_err(|e| CliError::input(format!("{}: {e}", path.display())))?;
    log::info!("loaded {} customers from {}", customers.len(), path.display());
    Ok(customers)
}

fn parse_customers(text: &str) -> Result<Vec<CustomerRecord>, String> {
    serde_json::from_str(text).map_err(|e| format!("invalid customer JSON: {e}"))
}
