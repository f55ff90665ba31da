//! Error types raised while configuring or driving preference rounds.
#![forbid(unsafe_code)]

use palette_core::SourceError;
use thiserror::Error;

/// Errors raised when validating scorer or session configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScorerConfigError {
    /// The batch must hold at least one item.
    #[error("batch size must be at least 1")]
    ZeroBatchSize,
    /// Exploration must recur at a positive interval.
    #[error("exploration interval must be at least 1")]
    ZeroExplorationInterval,
    /// Exploration must consider at least one top tag.
    #[error("exploration must consider at least one top tag")]
    ZeroExplorationTopTags,
    /// The decay rate must lie strictly between zero and one.
    #[error("decay rate {value} must be finite and strictly between 0 and 1")]
    InvalidDecayRate {
        /// Rejected rate.
        value: f32,
    },
    /// The reward target fraction must lie within `0.0..=1.0`.
    #[error("reward target fraction {value} must be finite and within 0..=1")]
    InvalidTargetFraction {
        /// Rejected fraction.
        value: f64,
    },
    /// A round must draw at least one candidate.
    #[error("candidate pool size must be at least 1")]
    ZeroPoolSize,
}

/// Errors raised while running a session round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Interactions were submitted while no batch was on display.
    #[error("no batch is on display; refresh before submitting interactions")]
    NoActiveBatch,
    /// The candidate supplier failed.
    #[error("failed to fetch candidates")]
    Supply {
        /// Source error from the candidate feed.
        #[source]
        source: SourceError,
    },
}

impl From<SourceError> for SessionError {
    fn from(source: SourceError) -> Self {
        Self::Supply { source }
    }
}

/// Errors raised when spending coins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RedeemError {
    /// The wallet holds fewer coins than the price.
    #[error("redeeming costs {need} coins but only {have} are available")]
    InsufficientCoins {
        /// Coins currently held.
        have: u32,
        /// Coins required.
        need: u32,
    },
}
