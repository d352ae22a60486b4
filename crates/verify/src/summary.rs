use crate::model::{MatchResult, MatchStatus, StarsMatch, VerifySummary};

/// Compute per-status and per-stars counts for the summary table.
pub fn compute_summary(
    results: &[MatchResult],
    external_reviews: usize,
    excluded: usize,
) -> VerifySummary {
    let mut summary = VerifySummary {
        total: results.len(),
        external_reviews,
        excluded,
        ..VerifySummary::default()
    };

    for r in results {
        match r.status {
            MatchStatus::Confirmed => summary.confirmed += 1,
            MatchStatus::Probable => summary.probable += 1,
            MatchStatus::NotFound => summary.not_found += 1,
        }
        match r.stars_match {
            StarsMatch::Yes => summary.stars_matched += 1,
            StarsMatch::No => summary.stars_mismatched += 1,
            StarsMatch::Unknown => summary.stars_unknown += 1,
        }
    }

    summary
}
