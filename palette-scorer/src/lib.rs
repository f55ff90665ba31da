//! Preference scoring for tagged candidates.
//!
//! The crate learns which tags a user favours from round-by-round feedback
//! and uses that affinity to pick what to show next:
//! - [`select_batch`] ranks candidates by their aggregate tag score and, on
//!   exploration rounds, reserves the last slot for a candidate outside the
//!   user's strongest tags.
//! - [`record_interactions`] rewards the tags of liked items with a
//!   rarity-weighted increment and decays the tags that were shown but
//!   passed over.
//! - [`PreferenceScorer`] bundles both operations with a validated
//!   [`ScorerConfig`] and a pluggable [`Scorer`](palette_core::Scorer).
//! - [`Session`] owns the per-user state between rounds and applies the
//!   coin [`RewardPolicy`].
//!
//! # Examples
//!
//! ```
//! use palette_core::{AffinityState, Item};
//! use palette_scorer::{PreferenceScorer, ScorerConfig};
//!
//! let scorer = PreferenceScorer::new(ScorerConfig::default()).unwrap();
//! let candidates = vec![
//!     Item::new("1", "", ["x"]).unwrap(),
//!     Item::new("2", "", ["y"]).unwrap(),
//!     Item::new("3", "", ["x", "y"]).unwrap(),
//! ];
//! let mut affinity = AffinityState::new();
//! let batch = scorer.select_batch(&candidates, &affinity, 1);
//! scorer.record_interactions(&mut affinity, &batch, ["3"]);
//! assert_eq!(affinity.score("x"), 1.0);
//! assert_eq!(affinity.score("y"), 1.0);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use palette_core::{AffinityState, Batch, Item, Scorer, TagSumScorer};

mod error;
mod interaction;
mod reward;
mod selection;
mod session;
mod types;

pub use error::{RedeemError, ScorerConfigError, SessionError};
pub use interaction::{InteractionSummary, record_interactions};
pub use reward::{
    BackgroundTheme, DEFAULT_BACKGROUND_COST, DEFAULT_BACKGROUND_TAGS, DEFAULT_TARGET_FRACTION,
    RewardPolicy, Wallet,
};
pub use selection::{SelectionParams, is_exploration_round, select_batch};
pub use session::{RoundOutcome, Session, SessionConfig};
pub use types::{
    DEFAULT_BATCH_SIZE, DEFAULT_DECAY_RATE, DEFAULT_EXPLORATION_INTERVAL,
    DEFAULT_EXPLORATION_TOP_TAGS, DEFAULT_POOL_SIZE, ScorerConfig,
};

/// Validated configuration paired with the [`Scorer`] that ranks candidates.
#[derive(Debug, Clone)]
pub struct PreferenceScorer<S = TagSumScorer> {
    config: ScorerConfig,
    scorer: S,
}

impl PreferenceScorer<TagSumScorer> {
    /// Build a scorer that ranks by summed tag affinity.
    ///
    /// # Errors
    /// Returns [`ScorerConfigError`] when `config` is invalid.
    pub fn new(config: ScorerConfig) -> Result<Self, ScorerConfigError> {
        Self::with_scorer(config, TagSumScorer)
    }
}

impl<S: Scorer> PreferenceScorer<S> {
    /// Build a scorer with a custom ranking strategy.
    ///
    /// # Errors
    /// Returns [`ScorerConfigError`] when `config` is invalid.
    pub fn with_scorer(config: ScorerConfig, scorer: S) -> Result<Self, ScorerConfigError> {
        Ok(Self {
            config: config.validate()?,
            scorer,
        })
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Select the batch for `round` from `candidates`.
    #[must_use]
    pub fn select_batch(&self, candidates: &[Item], affinity: &AffinityState, round: u64) -> Batch {
        select_batch(
            candidates,
            affinity,
            &self.scorer,
            SelectionParams {
                batch_size: self.config.batch_size,
                exploration_interval: self.config.exploration_interval,
                exploration_top_tags: self.config.exploration_top_tags,
                round,
            },
        )
    }

    /// Apply the likes for `batch` using the configured decay rate.
    pub fn record_interactions<I, T>(
        &self,
        affinity: &mut AffinityState,
        batch: &Batch,
        liked: I,
    ) -> InteractionSummary
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        record_interactions(affinity, batch, liked, self.config.decay_rate)
    }
}
