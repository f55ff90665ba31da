//! Virtual-currency rules layered on top of the scorer.
//!
//! A round earns one coin when the number of liked items hits the target
//! exactly; coins buy a "background" built from the user's top tags.

use serde::{Deserialize, Serialize};

use palette_core::{AffinityState, Tag};

use crate::{RedeemError, ScorerConfigError};

/// Default share of a batch the user must like to earn a coin.
pub const DEFAULT_TARGET_FRACTION: f64 = 0.4;
/// Default price of a background in coins.
pub const DEFAULT_BACKGROUND_COST: u32 = 3;
/// Default number of top tags a background is built from.
pub const DEFAULT_BACKGROUND_TAGS: usize = 5;

/// Coin award and redemption rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardPolicy {
    /// Share of the configured batch size that must be liked.
    pub target_fraction: f64,
    /// Coins spent per background.
    pub background_cost: u32,
    /// Number of top tags listed in a background.
    pub background_tags: usize,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            target_fraction: DEFAULT_TARGET_FRACTION,
            background_cost: DEFAULT_BACKGROUND_COST,
            background_tags: DEFAULT_BACKGROUND_TAGS,
        }
    }
}

impl RewardPolicy {
    /// Validate the policy and return a copy.
    ///
    /// # Errors
    /// Returns [`ScorerConfigError::InvalidTargetFraction`] when the fraction
    /// is not finite or lies outside `0.0..=1.0`.
    pub fn validate(self) -> Result<Self, ScorerConfigError> {
        if self.target_fraction.is_finite() && (0.0..=1.0).contains(&self.target_fraction) {
            Ok(self)
        } else {
            Err(ScorerConfigError::InvalidTargetFraction {
                value: self.target_fraction,
            })
        }
    }

    /// Number of likes that earns a coin for a batch of `batch_size`.
    ///
    /// The product is floored, so a batch of 12 with the default fraction
    /// expects 4 likes.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the target is a floored fraction of a small batch size"
    )]
    #[must_use]
    pub fn expected_likes(&self, batch_size: usize) -> usize {
        let target = (batch_size as f64 * self.target_fraction).floor();
        if target.is_finite() && target > 0.0 {
            target as usize
        } else {
            0
        }
    }

    /// Report whether `liked` likes on a batch of `batch_size` earn a coin.
    ///
    /// Only an exact match counts; liking more or fewer items earns nothing.
    #[must_use]
    pub fn earns_coin(&self, liked: usize, batch_size: usize) -> bool {
        liked == self.expected_likes(batch_size)
    }
}

/// Coin balance for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Wallet {
    coins: u32,
}

impl Wallet {
    /// Current balance.
    #[must_use]
    pub const fn coins(&self) -> u32 {
        self.coins
    }

    /// Add one coin and return the new balance.
    pub const fn award(&mut self) -> u32 {
        self.coins = self.coins.saturating_add(1);
        self.coins
    }

    /// Remove `cost` coins and return the new balance.
    ///
    /// # Errors
    /// Returns [`RedeemError::InsufficientCoins`] and leaves the balance
    /// unchanged when fewer than `cost` coins are held.
    pub const fn spend(&mut self, cost: u32) -> Result<u32, RedeemError> {
        match self.coins.checked_sub(cost) {
            Some(remaining) => {
                self.coins = remaining;
                Ok(remaining)
            }
            None => Err(RedeemError::InsufficientCoins {
                have: self.coins,
                need: cost,
            }),
        }
    }
}

/// A background generated from the user's strongest tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundTheme {
    /// Top tags, strongest first.
    pub tags: Vec<Tag>,
}

impl BackgroundTheme {
    /// Build a theme from the `count` highest-scoring tags.
    #[must_use]
    pub fn from_affinity(affinity: &AffinityState, count: usize) -> Self {
        Self {
            tags: affinity
                .top_tags(count)
                .into_iter()
                .map(|(tag, _)| tag.clone())
                .collect(),
        }
    }
}
