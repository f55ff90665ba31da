//! Public configuration types for preference scoring and sessions.
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::ScorerConfigError;

/// Default number of items shown per round.
pub const DEFAULT_BATCH_SIZE: usize = 12;
/// Default number of rounds between exploration picks.
pub const DEFAULT_EXPLORATION_INTERVAL: u64 = 5;
/// Default number of top tags an exploration pick must avoid.
pub const DEFAULT_EXPLORATION_TOP_TAGS: usize = 10;
/// Default multiplier applied to shown-but-unliked tags.
pub const DEFAULT_DECAY_RATE: f32 = 0.95;
/// Default number of candidates drawn per round.
pub const DEFAULT_POOL_SIZE: usize = 50;

/// Tunable parameters for batch selection and score updates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Maximum number of items per batch.
    pub batch_size: usize,
    /// Every round whose index is a multiple of this value explores.
    pub exploration_interval: u64,
    /// Size of the top-tag set an exploration pick must avoid.
    pub exploration_top_tags: usize,
    /// Multiplier applied once per round to tags shown but not liked.
    pub decay_rate: f32,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            exploration_interval: DEFAULT_EXPLORATION_INTERVAL,
            exploration_top_tags: DEFAULT_EXPLORATION_TOP_TAGS,
            decay_rate: DEFAULT_DECAY_RATE,
        }
    }
}

impl ScorerConfig {
    /// Validate the configuration and return a copy.
    ///
    /// # Errors
    /// Returns [`ScorerConfigError`] when a count is zero or the decay rate
    /// is not finite and strictly inside `(0, 1)`.
    pub fn validate(self) -> Result<Self, ScorerConfigError> {
        if self.batch_size == 0 {
            return Err(ScorerConfigError::ZeroBatchSize);
        }
        if self.exploration_interval == 0 {
            return Err(ScorerConfigError::ZeroExplorationInterval);
        }
        if self.exploration_top_tags == 0 {
            return Err(ScorerConfigError::ZeroExplorationTopTags);
        }
        if !self.has_valid_decay_rate() {
            return Err(ScorerConfigError::InvalidDecayRate {
                value: self.decay_rate,
            });
        }
        Ok(self)
    }

    fn has_valid_decay_rate(self) -> bool {
        self.decay_rate.is_finite() && self.decay_rate > 0.0_f32 && self.decay_rate < 1.0_f32
    }

    /// Set the batch size while consuming `self`.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the exploration interval while consuming `self`.
    #[must_use]
    pub const fn with_exploration_interval(mut self, interval: u64) -> Self {
        self.exploration_interval = interval;
        self
    }

    /// Set the decay rate while consuming `self`.
    #[must_use]
    pub const fn with_decay_rate(mut self, decay_rate: f32) -> Self {
        self.decay_rate = decay_rate;
        self
    }
}
