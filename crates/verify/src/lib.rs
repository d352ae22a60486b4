//! `funnel-verify`: Review verification engine.
//!
//! Pure engine crate: receives generated reviews and parsed marketplace
//! reviews, returns scored and classified matches. No CLI or IO dependencies.

pub mod analytics;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod similarity;
pub mod summary;

pub use config::VerifyConfig;
pub use engine::run;
pub use error::VerifyError;
pub use model::{
    CustomerRecord, ExternalReview, GeneratedReview, MatchResult, MatchStatus, StarsMatch,
    VerifyResult,
};
pub use similarity::similarity;
