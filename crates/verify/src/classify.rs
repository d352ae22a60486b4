use crate::config::Thresholds;
use crate::model::{ExternalReview, MatchStatus, StarsMatch};

/// Bucket a best score. Both thresholds are inclusive lower bounds.
pub fn classify_score(score: f64, thresholds: &Thresholds) -> MatchStatus {
    if score >= thresholds.confirmed {
        MatchStatus::Confirmed
    } else if score >= thresholds.probable {
        MatchStatus::Probable
    } else {
        MatchStatus::NotFound
    }
}

/// Compare funnel stars with the marketplace rating when both are known.
pub fn stars_match(stars: Option<u8>, best_match: Option<&ExternalReview>) -> StarsMatch {
    match (stars, best_match.and_then(|m| m.rating)) {
        (Some(s), Some(r)) if s == r => StarsMatch::Yes,
        (Some(_), Some(_)) => StarsMatch::No,
        _ => StarsMatch::Unknown,
    }
}
