//! `funnel analytics`: funnel conversion counts over customer records.

use std::path::PathBuf;

use funnel_verify::analytics::compute_funnel;
use funnel_verify::model::FunnelAnalytics;

use crate::customers::load_customers;
use crate::CliError;

pub fn cmd_analytics(customers: PathBuf, json: bool) -> Result<(), CliError> {
    let customers = load_customers(&customers)?;
    let analytics = compute_funnel(&customers);

    if json {
        let json_str = serde_json::to_string_pretty(&analytics)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        print!("{}", render(&analytics));
    }
    Ok(())
}

fn render(a: &FunnelAnalytics) -> String {
    let mut out = String::new();
    out.push_str(&format!("customers:                 {}\n", a.total));
    out.push_str(&format!("reached review page:       {}\n", a.reached_review_page));
    out.push_str(&format!("went to marketplace:       {} ({}%)\n", a.went_to_marketplace, a.conversion_rate));
    out.push_str(&format!("likely submitted:          {} ({}%)\n", a.likely_submitted, a.submission_rate));
    out.push_str(&format!("claimed gifts:             {} ({}%)\n", a.claimed_gifts, a.gifts_claim_rate));
    out.push_str(&format!("  after marketplace:       {}\n", a.claimed_after_marketplace));
    out.push_str(&format!("  without marketplace:     {}\n", a.claimed_without_marketplace));
    out.push_str(&format!("average stars:             {:.1}\n", a.avg_stars));

    if !a.tone_distribution.is_empty() {
        out.push_str("tones:\n");
        for (tone, n) in &a.tone_distribution {
            out.push_str(&format!("  {tone}: {n}\n"));
        }
    }
    out
}
