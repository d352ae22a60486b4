use serde::Deserialize;

use crate::error::VerifyError;
use crate::similarity::DEFAULT_MIN_TOKEN_LEN;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub tokenizer: TokenizerConfig,
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Score cut-offs, both inclusive lower bounds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Thresholds {
    #[serde(default = "default_confirmed")]
    pub confirmed: f64,
    #[serde(default = "default_probable")]
    pub probable: f64,
}

fn default_confirmed() -> f64 {
    0.7
}

fn default_probable() -> f64 {
    0.4
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            confirmed: default_confirmed(),
            probable: default_probable(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenizerConfig {
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
}

fn default_min_token_len() -> usize {
    DEFAULT_MIN_TOKEN_LEN
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            min_token_len: default_min_token_len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl VerifyConfig {
    pub fn from_toml(input: &str) -> Result<Self, VerifyError> {
        let config: VerifyConfig =
            toml::from_str(input).map_err(|e| VerifyError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &std::path::Path) -> Result<Self, VerifyError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| VerifyError::Io(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&input)
    }

    pub fn validate(&self) -> Result<(), VerifyError> {
        let t = &self.thresholds;
        if !(0.0..=1.0).contains(&t.confirmed) || !(0.0..=1.0).contains(&t.probable) {
            return Err(VerifyError::ConfigValidation(format!(
                "thresholds must be within [0, 1], got confirmed={} probable={}",
                t.confirmed, t.probable
            )));
        }
        if t.probable > t.confirmed {
            return Err(VerifyError::ConfigValidation(format!(
                "probable threshold ({}) must not exceed confirmed threshold ({})",
                t.probable, t.confirmed
            )));
        }
        if self.tokenizer.min_token_len == 0 {
            return Err(VerifyError::ConfigValidation(
                "tokenizer.min_token_len must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
