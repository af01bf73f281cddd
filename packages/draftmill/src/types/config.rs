//! Run configuration.
//!
//! An explicit configuration object passed into each component's
//! constructor, never ambient global state, so multiple profiles can run
//! side by side in tests.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which audience/monetization mode a run targets.
///
/// The mode selects the fallback topic pools and the label table, and
/// decides whether the affiliate disclosure is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Build topical trust: guides and research write-ups
    Approval,

    /// Monetizable comparisons and reviews
    Money,
}

impl RunMode {
    /// Display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Approval => "approval",
            RunMode::Money => "money",
        }
    }
}

impl std::str::FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "approval" => Ok(RunMode::Approval),
            "money" => Ok(RunMode::Money),
            other => Err(format!("unknown run mode: {other}")),
        }
    }
}

/// Configuration for a single article run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Run mode
    pub mode: RunMode,

    /// Model identifier passed to the provider
    pub model: String,

    /// Keyword-overlap ratio at or above which two titles are duplicates.
    ///
    /// 0.70 is carried over from observed production behavior: lower
    /// rejects legitimately distinct topics that share common nouns,
    /// higher lets near-identical rephrasings through. Kept configurable
    /// rather than hard-coded.
    pub duplicate_threshold: f64,

    /// Minimum characters for accepting a refinement stage's output.
    ///
    /// Below this, an "improved" result is treated as truncation or
    /// commentary rather than real content.
    pub min_stage_output_chars: usize,

    /// How many recent titles the topic prompt is told to avoid.
    pub recent_titles_window: usize,

    /// Maximum related articles in the cross-link block.
    pub max_related: usize,

    /// Delay between consecutive media searches, in milliseconds.
    pub media_search_delay_ms: u64,

    /// Append-only run log path. None disables the log.
    pub run_log_path: Option<PathBuf>,

    /// Seed for variation/topic/label randomness. None = entropy.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Approval,
            model: "claude-sonnet-4-5".to_string(),
            duplicate_threshold: 0.70,
            min_stage_output_chars: 500,
            recent_titles_window: 10,
            max_related: 3,
            media_search_delay_ms: 1000,
            run_log_path: None,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the run mode.
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the duplicate threshold.
    pub fn with_duplicate_threshold(mut self, threshold: f64) -> Self {
        self.duplicate_threshold = threshold;
        self
    }

    /// Set the minimum stage output length.
    pub fn with_min_stage_output_chars(mut self, chars: usize) -> Self {
        self.min_stage_output_chars = chars;
        self
    }

    /// Set the run log path.
    pub fn with_run_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.run_log_path = Some(path.into());
        self
    }

    /// Seed all randomness for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.mode, RunMode::Approval);
        assert!((config.duplicate_threshold - 0.70).abs() < f64::EPSILON);
        assert_eq!(config.min_stage_output_chars, 500);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("MONEY".parse::<RunMode>().unwrap(), RunMode::Money);
        assert_eq!("approval".parse::<RunMode>().unwrap(), RunMode::Approval);
        assert!("other".parse::<RunMode>().is_err());
    }
}
