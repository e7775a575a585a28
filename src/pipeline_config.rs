//! Tunable parameters of the report pipeline.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Minimum name similarity (0-100) for a line to count as a known test.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPipelineConfig")]
pub struct PipelineConfig {
    pub match_threshold: f64,
}

/// Unchecked serde shape; converted through `with_match_threshold`.
#[derive(Deserialize)]
struct RawPipelineConfig {
    #[serde(default = "default_match_threshold")]
    match_threshold: f64,
}

fn default_match_threshold() -> f64 {
    DEFAULT_MATCH_THRESHOLD
}

impl TryFrom<RawPipelineConfig> for PipelineConfig {
    type Error = ConfigError;

    fn try_from(raw: RawPipelineConfig) -> Result<Self, Self::Error> {
        PipelineConfig::default().with_match_threshold(raw.match_threshold)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl PipelineConfig {
    /// Override the match threshold. Must lie within 0..=100.
    pub fn with_match_threshold(mut self, threshold: f64) -> Result<Self, ConfigError> {
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ConfigError::Invalid {
                key: "match_threshold",
                value: threshold.to_string(),
                reason: "must be between 0 and 100".into(),
            });
        }
        self.match_threshold = threshold;
        Ok(self)
    }
}
