use crate::classify::{classify_score, stars_match};
use crate::config::VerifyConfig;
use crate::model::{ExternalReview, GeneratedReview, MatchResult};
use crate::similarity::TokenSet;

/// Find the best external match for every eligible generated review.
///
/// Ineligible reviews (no text, or never taken to the marketplace) are
/// dropped before scoring. Each external review is tokenized once up front.
/// The running maximum only moves on a strictly greater score, so the first
/// external review wins ties and a best match exists only for scores above 0.
/// Output is sorted confirmed, probable, not_found, then by descending score.
pub fn match_reviews(
    generated: &[GeneratedReview],
    external: &[ExternalReview],
    config: &VerifyConfig,
) -> Vec<MatchResult> {
    let min_len = config.tokenizer.min_token_len;
    let external_tokens: Vec<TokenSet> = external
        .iter()
        .map(|e| TokenSet::from_text(&e.text, min_len))
        .collect();

    let mut results: Vec<MatchResult> = generated
        .iter()
        .filter(|g| g.is_eligible())
        .map(|g| {
            let tokens = TokenSet::from_text(&g.text, min_len);
            let mut best: Option<usize> = None;
            let mut best_score = 0.0;

            for (i, ext_tokens) in external_tokens.iter().enumerate() {
                let score = tokens.jaccard(ext_tokens);
                if score > best_score {
                    best_score = score;
                    best = Some(i);
                }
            }

            let best_match = best.map(|i| external[i].clone());
            MatchResult {
                generated: g.clone(),
                status: classify_score(best_score, &config.thresholds),
                stars_match: stars_match(g.stars, best_match.as_ref()),
                best_match,
                score: best_score,
            }
        })
        .collect();

    sort_for_presentation(&mut results);
    results
}

/// Status precedence, then descending score. Stable, so equal entries keep
/// input order.
pub fn sort_for_presentation(results: &mut [MatchResult]) {
    results.sort_by(|a, b| {
        a.status
            .cmp(&b.status)
            .then_with(|| b.score.total_cmp(&a.score))
    });
}
