use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, SelectionError};

/// Parameters for an incremental selection run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    /// Relevance/redundancy decision boundary.
    pub threshold: f64,

    /// Largest feature-combination cardinality explored. 0 selects nothing.
    #[serde(default = "default_max_size")]
    pub max_size: usize,

    /// Drop features that can be removed from a relevant combination without
    /// the score falling by at least `threshold`.
    #[serde(default)]
    pub remove_redundant: bool,

    /// Score cache capacity. When unset it is `n_features ^ max_size`.
    ///
    /// The default is a sizing hint, not a bound on the queried subsets: with
    /// `remove_redundant` the run also scores `max_size + 1` subsets, and
    /// evicted scores are recomputed. Each subset is scored at most once only
    /// when this is at least the number of distinct subsets the run queries.
    #[serde(default)]
    pub cache_capacity: Option<usize>,
}

fn default_max_size() -> usize {
    1
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            max_size: default_max_size(),
            remove_redundant: false,
            cache_capacity: None,
        }
    }
}

impl SelectionConfig {
    pub fn new(threshold: f64, max_size: usize, remove_redundant: bool) -> Self {
        Self {
            threshold,
            max_size,
            remove_redundant,
            cache_capacity: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_remove_redundant(mut self, remove_redundant: bool) -> Self {
        self.remove_redundant = remove_redundant;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(SelectionError::InvalidConfiguration(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    ///
    /// Missing optional fields fall back to their defaults. A negative or
    /// non-integer `max_size` is rejected.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SelectionConfig = serde_json::from_str(json).map_err(|e| {
            SelectionError::InvalidConfiguration(format!("failed to parse selection config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Cache capacity for a pool of `n_features`: the configured value, or
    /// `n_features ^ max_size` saturated to `usize::MAX`.
    pub fn cache_capacity_for(&self, n_features: usize) -> usize {
        self.cache_capacity.unwrap_or_else(|| {
            let exponent = u32::try_from(self.max_size).unwrap_or(u32::MAX);
            n_features.saturating_pow(exponent)
        })
    }
}

impl FromStr for SelectionConfig {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json_str(s)
    }
}
