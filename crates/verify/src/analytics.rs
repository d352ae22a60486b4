use std::collections::BTreeMap;

use crate::model::{CustomerRecord, FunnelAnalytics};

/// Funnel conversion counts over the customer list shown on the dashboard.
///
/// Rates are percentages of `total`, rounded to one decimal, and 0 for an
/// empty list. `likely_submitted` counts customers who both generated a
/// review and clicked through to the marketplace.
pub fn compute_funnel(customers: &[CustomerRecord]) -> FunnelAnalytics {
    let total = customers.len();

    let reached_review_page = count(customers, |c| c.review_generated);
    let went_to_marketplace = count(customers, |c| c.went_to_amazon);
    let claimed_gifts = count(customers, |c| c.claimed_gifts);
    let claimed_after_marketplace = count(customers, |c| c.went_to_amazon && c.claimed_gifts);
    let claimed_without_marketplace = count(customers, |c| !c.went_to_amazon && c.claimed_gifts);
    let likely_submitted = count(customers, |c| c.review_generated && c.went_to_amazon);

    let stars: Vec<u8> = customers
        .iter()
        .filter_map(|c| c.review_stars)
        .filter(|s| *s > 0)
        .collect();
    let avg_stars = if stars.is_empty() {
        0.0
    } else {
        round1(stars.iter().map(|s| *s as f64).sum::<f64>() / stars.len() as f64)
    };

    let mut tone_distribution = BTreeMap::new();
    for tone in customers.iter().filter_map(|c| c.review_tone.as_deref()) {
        if !tone.is_empty() {
            *tone_distribution.entry(tone.to_string()).or_insert(0) += 1;
        }
    }

    FunnelAnalytics {
        total,
        reached_review_page,
        went_to_marketplace,
        claimed_gifts,
        claimed_after_marketplace,
        claimed_without_marketplace,
        likely_submitted,
        avg_stars,
        tone_distribution,
        conversion_rate: percent(went_to_marketplace, total),
        gifts_claim_rate: percent(claimed_gifts, total),
        submission_rate: percent(likely_submitted, total),
    }
}

fn count(customers: &[CustomerRecord], pred: impl Fn(&CustomerRecord) -> bool) -> usize {
    customers.iter().filter(|c| pred(c)).count()
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(part as f64 / total as f64 * 100.0)
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
