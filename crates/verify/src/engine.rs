use crate::config::VerifyConfig;
use crate::matcher::match_reviews;
use crate::model::{ExternalReview, GeneratedReview, VerifyMeta, VerifyResult};
use crate::summary::compute_summary;

/// Run one verification pass over a fresh upload. Matching cannot fail:
/// an empty upload classifies every eligible review as not_found.
pub fn run(
    config: &VerifyConfig,
    generated: &[GeneratedReview],
    external: &[ExternalReview],
) -> VerifyResult {
    let eligible = generated.iter().filter(|g| g.is_eligible()).count();
    let excluded = generated.len() - eligible;
    log::debug!(
        "matching {eligible} generated reviews ({excluded} excluded) against {} external reviews",
        external.len()
    );

    let matches = match_reviews(generated, external, config);
    let summary = compute_summary(&matches, external.len(), excluded);
    log::debug!(
        "{} confirmed, {} probable, {} not found",
        summary.confirmed,
        summary.probable,
        summary.not_found
    );

    VerifyResult {
        meta: VerifyMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            confirmed_threshold: config.thresholds.confirmed,
            probable_threshold: config.thresholds.probable,
        },
        summary,
        matches,
    }
}
