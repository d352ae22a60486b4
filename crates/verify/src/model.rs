use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A customer row as the dashboard reads it from the backing store.
///
/// Every field defaults so partial exports still load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    pub created_at: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub opt_in_surveys: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub review_generated: bool,
    pub review_stars: Option<u8>,
    pub review_tone: Option<String>,
    pub review_text: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub went_to_amazon: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub claimed_gifts: bool,
    pub product_slug: Option<String>,
}

// Store exports write unset columns as null.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CustomerRecord {
    /// The review this customer drafted in the funnel.
    pub fn generated_review(&self) -> GeneratedReview {
        GeneratedReview {
            customer_id: self.id.clone(),
            text: self.review_text.clone().unwrap_or_default(),
            stars: self.review_stars,
            submitted_to_marketplace: self.went_to_amazon,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// AI-drafted review text, possibly edited by the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedReview {
    pub customer_id: String,
    pub text: String,
    pub stars: Option<u8>,
    pub submitted_to_marketplace: bool,
}

impl GeneratedReview {
    /// Only reviews with text that were taken to the marketplace are matched.
    pub fn is_eligible(&self) -> bool {
        self.submitted_to_marketplace && !self.text.is_empty()
    }
}

/// A review row parsed from an uploaded marketplace export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalReview {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Declaration order is presentation order: confirmed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Confirmed,
    Probable,
    NotFound,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirmed => write!(f, "confirmed"),
            Self::Probable => write!(f, "probable"),
            Self::NotFound => write!(f, "not_found"),
        }
    }
}

/// Whether the marketplace rating agrees with the stars picked in the funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarsMatch {
    Yes,
    No,
    Unknown,
}

impl StarsMatch {
    pub fn as_option(self) -> Option<bool> {
        match self {
            Self::Yes => Some(true),
            Self::No => Some(false),
            Self::Unknown => None,
        }
    }
}

// JSON shape is true / false / null.
impl Serialize for StarsMatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_option() {
            Some(b) => serializer.serialize_bool(b),
            None => serializer.serialize_none(),
        }
    }
}

impl std::fmt::Display for StarsMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "yes"),
            Self::No => write!(f, "no"),
            Self::Unknown => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub generated: GeneratedReview,
    pub best_match: Option<ExternalReview>,
    pub score: f64,
    pub status: MatchStatus,
    pub stars_match: StarsMatch,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VerifySummary {
    pub total: usize,
    pub confirmed: usize,
    pub probable: usize,
    pub not_found: usize,
    pub stars_matched: usize,
    pub stars_mismatched: usize,
    pub stars_unknown: usize,
    pub external_reviews: usize,
    pub excluded: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyMeta {
    pub engine_version: String,
    pub run_at: String,
    pub confirmed_threshold: f64,
    pub probable_threshold: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyResult {
    pub meta: VerifyMeta,
    pub summary: VerifySummary,
    pub matches: Vec<MatchResult>,
}

// ---------------------------------------------------------------------------
// Funnel analytics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FunnelAnalytics {
    pub total: usize,
    pub reached_review_page: usize,
    pub went_to_marketplace: usize,
    pub claimed_gifts: usize,
    pub claimed_after_marketplace: usize,
    pub claimed_without_marketplace: usize,
    pub likely_submitted: usize,
    pub avg_stars: f64,
    pub tone_distribution: BTreeMap<String, usize>,
    pub conversion_rate: f64,
    pub gifts_claim_rate: f64,
    pub submission_rate: f64,
}
