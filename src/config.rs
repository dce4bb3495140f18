use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::DocsearchError;
use crate::Result;

/// Which stop-word list the tokenizer drops
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopWordList {
    /// The short English list documentation generators ship with
    #[default]
    Sphinx,
    /// The full English stopwords-iso list
    Iso,
    /// Keep every word
    None,
}

/// Stemming algorithm applied to tokens
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StemmerAlgorithm {
    /// Snowball English (Porter2)
    #[default]
    English,
    /// The original Porter algorithm, as used by generated `searchindex.js` files
    Porter,
}

/// Tokenizer configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    pub lowercase: bool,
    pub remove_stopwords: bool,
    pub stopword_list: StopWordList,
    pub stem: bool,
    pub stemmer: StemmerAlgorithm,
    pub min_token_length: usize,
    pub max_token_length: usize,
    pub language: String,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            remove_stopwords: true,
            stopword_list: StopWordList::Sphinx,
            stem: true,
            stemmer: StemmerAlgorithm::English,
            min_token_length: 2,
            max_token_length: 50,
            language: "english".to_string(),
        }
    }
}

/// Weights used by the query matcher
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Multiplier for a hit in the term table
    pub term_weight: f32,
    /// Multiplier for a hit in the title term table
    pub title_boost: f32,
    /// Match index tokens that contain the query token
    pub partial_matches: bool,
    /// Multiplier for a substring hit
    pub partial_weight: f32,
    /// Shortest query token eligible for substring matching
    pub min_partial_length: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            term_weight: 1.0,
            title_boost: 2.0,
            partial_matches: false,
            partial_weight: 0.5,
            min_partial_length: 3,
        }
    }
}

/// Top-level search configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub tokenizer: TokenizerConfig,
    pub scoring: ScoringConfig,
    /// Result count used by callers that do not pass an explicit limit
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerConfig::default(),
            scoring: ScoringConfig::default(),
            default_limit: 10,
        }
    }
}

impl SearchConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: SearchConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject weights and limits the matcher cannot honor
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("term_weight", self.scoring.term_weight),
            ("title_boost", self.scoring.title_boost),
            ("partial_weight", self.scoring.partial_weight),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(DocsearchError::InvalidConfig(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, weight
                )));
            }
        }

        if self.tokenizer.min_token_length > self.tokenizer.max_token_length {
            return Err(DocsearchError::InvalidConfig(format!(
                "min_token_length ({}) exceeds max_token_length ({})",
                self.tokenizer.min_token_length, self.tokenizer.max_token_length
            )));
        }

        if self.tokenizer.language.to_lowercase() != "english" {
            return Err(DocsearchError::InvalidConfig(format!(
                "unsupported language '{}'",
                self.tokenizer.language
            )));
        }

        Ok(())
    }

    /// Set the title boost
    pub fn with_title_boost(mut self, boost: f32) -> Self {
        self.scoring.title_boost = boost;
        self
    }

    /// Turn substring matching on or off
    pub fn with_partial_matches(mut self, enabled: bool) -> Self {
        self.scoring.partial_matches = enabled;
        self
    }

    /// Replace the tokenizer configuration
    pub fn with_tokenizer(mut self, tokenizer: TokenizerConfig) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Set the default result limit
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }
}
