//! Explicit per-user session state driving select, observe and update rounds.
//!
//! A [`Session`] owns everything a host loop needs between rounds: the
//! affinity state, the round counter, the batch currently on display, the
//! ignore counters, the history of shown items and the coin wallet.

#![forbid(unsafe_code)]

use std::collections::HashMap;

use log::{debug, info};
use palette_core::{AffinityState, Batch, CandidateFeed, Item, Scorer, Tag, TagSumScorer};
use serde::{Deserialize, Serialize};

use crate::{
    BackgroundTheme, DEFAULT_POOL_SIZE, InteractionSummary, PreferenceScorer, RedeemError,
    RewardPolicy, ScorerConfig, ScorerConfigError, SessionError, Wallet,
};

/// Configuration for a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Selection and update parameters.
    pub scorer: ScorerConfig,
    /// Coin award and redemption rules.
    pub reward: RewardPolicy,
    /// Number of candidates drawn from the feed per round.
    pub pool_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scorer: ScorerConfig::default(),
            reward: RewardPolicy::default(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl SessionConfig {
    /// Validate every nested setting and return a copy.
    ///
    /// # Errors
    /// Returns [`ScorerConfigError`] for the first invalid setting found.
    pub fn validate(self) -> Result<Self, ScorerConfigError> {
        self.scorer.validate()?;
        self.reward.validate()?;
        if self.pool_size == 0 {
            return Err(ScorerConfigError::ZeroPoolSize);
        }
        Ok(self)
    }

    /// Replace the scorer configuration while consuming `self`.
    #[must_use]
    pub const fn with_scorer(mut self, scorer: ScorerConfig) -> Self {
        self.scorer = scorer;
        self
    }

    /// Replace the reward policy while consuming `self`.
    #[must_use]
    pub const fn with_reward(mut self, reward: RewardPolicy) -> Self {
        self.reward = reward;
        self
    }

    /// Set the candidate pool size while consuming `self`.
    #[must_use]
    pub const fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }
}

/// Result of submitting the likes for a displayed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    /// Round the submission belonged to.
    pub round: u64,
    /// Affinity changes applied.
    pub summary: InteractionSummary,
    /// Whether the round earned a coin.
    pub coin_awarded: bool,
    /// Wallet balance after the round.
    pub coins: u32,
}

/// One user's preference session.
///
/// # Examples
/// ```
/// use palette_core::Item;
/// use palette_scorer::{Session, SessionConfig};
///
/// let mut session = Session::new(SessionConfig::default()).unwrap();
/// let candidates = vec![Item::new("a", "", ["sea"]).unwrap()];
/// session.refresh_with(&candidates);
/// let outcome = session.submit(["a"]).unwrap();
/// assert_eq!(outcome.round, 1);
/// assert_eq!(session.affinity().frequency("sea"), 1);
/// ```
#[derive(Debug)]
pub struct Session<S = TagSumScorer> {
    engine: PreferenceScorer<S>,
    reward: RewardPolicy,
    pool_size: usize,
    affinity: AffinityState,
    round: u64,
    displayed: Option<Batch>,
    ignored: HashMap<String, u32>,
    history: Vec<Item>,
    wallet: Wallet,
}

impl Session<TagSumScorer> {
    /// Start a session scored with [`TagSumScorer`].
    ///
    /// # Errors
    /// Returns [`ScorerConfigError`] when `config` is invalid.
    pub fn new(config: SessionConfig) -> Result<Self, ScorerConfigError> {
        Self::with_scorer(config, TagSumScorer)
    }
}

impl<S: Scorer> Session<S> {
    /// Start a session with a custom [`Scorer`].
    ///
    /// # Errors
    /// Returns [`ScorerConfigError`] when `config` is invalid.
    pub fn with_scorer(config: SessionConfig, scorer: S) -> Result<Self, ScorerConfigError> {
        let valid = config.validate()?;
        Ok(Self {
            engine: PreferenceScorer::with_scorer(valid.scorer, scorer)?,
            reward: valid.reward,
            pool_size: valid.pool_size,
            affinity: AffinityState::new(),
            round: 0,
            displayed: None,
            ignored: HashMap::new(),
            history: Vec::new(),
            wallet: Wallet::default(),
        })
    }

    /// Advance to the next round and display a batch drawn from `feed`.
    ///
    /// The round counter advances and any undecided batch is discarded
    /// before the feed is consulted, so a failed draw still consumes a round.
    ///
    /// # Errors
    /// Returns [`SessionError::Supply`] when the feed fails.
    pub fn refresh<F>(&mut self, feed: &mut F) -> Result<&Batch, SessionError>
    where
        F: CandidateFeed + ?Sized,
    {
        self.begin_round();
        let candidates = feed.next_candidates(self.pool_size)?;
        Ok(self.display(&candidates))
    }

    /// Advance to the next round and display a batch chosen from `candidates`.
    pub fn refresh_with(&mut self, candidates: &[Item]) -> &Batch {
        self.begin_round();
        self.display(candidates)
    }

    fn begin_round(&mut self) {
        if let Some(abandoned) = self.displayed.take() {
            debug!(
                "round {}: discarding {} undecided items",
                abandoned.round(),
                abandoned.len()
            );
        }
        self.round = self.round.saturating_add(1);
    }

    fn display(&mut self, candidates: &[Item]) -> &Batch {
        let batch = self
            .engine
            .select_batch(candidates, &self.affinity, self.round);
        debug!(
            "round {}: showing {} of {} candidates",
            self.round,
            batch.len(),
            candidates.len()
        );
        self.displayed.insert(batch)
    }

    /// Record the likes for the displayed batch and close the round.
    ///
    /// Items on display that were not liked have their ignore counters
    /// incremented and every displayed item joins the history. A coin is
    /// awarded when the like count matches the reward target exactly.
    ///
    /// # Errors
    /// Returns [`SessionError::NoActiveBatch`] when nothing is on display.
    pub fn submit<I, T>(&mut self, liked: I) -> Result<RoundOutcome, SessionError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let batch = self.displayed.take().ok_or(SessionError::NoActiveBatch)?;
        let summary = self
            .engine
            .record_interactions(&mut self.affinity, &batch, liked);

        for item in batch.items() {
            if !summary.was_liked(item.id()) {
                let count = self.ignored.entry(item.id().to_owned()).or_insert(0);
                *count = count.saturating_add(1);
            }
        }

        let coin_awarded = self
            .reward
            .earns_coin(summary.liked_count(), self.engine.config().batch_size);
        if coin_awarded {
            let coins = self.wallet.award();
            info!("round {}: coin awarded, balance {coins}", batch.round());
        }

        let round = batch.round();
        self.history.extend(batch.into_items());
        Ok(RoundOutcome {
            round,
            summary,
            coin_awarded,
            coins: self.wallet.coins(),
        })
    }

    /// Spend coins on a background built from the strongest tags.
    ///
    /// # Errors
    /// Returns [`RedeemError::InsufficientCoins`] when the wallet holds fewer
    /// coins than the background costs.
    pub fn redeem_background(&mut self) -> Result<BackgroundTheme, RedeemError> {
        self.wallet.spend(self.reward.background_cost)?;
        Ok(BackgroundTheme::from_affinity(
            &self.affinity,
            self.reward.background_tags,
        ))
    }

    /// Clear all accumulated state and return to round zero.
    pub fn restart(&mut self) {
        self.affinity = AffinityState::new();
        self.round = 0;
        self.displayed = None;
        self.ignored.clear();
        self.history.clear();
        self.wallet = Wallet::default();
    }

    /// Learned tag affinity.
    #[must_use]
    pub const fn affinity(&self) -> &AffinityState {
        &self.affinity
    }

    /// Index of the most recent round; zero before the first refresh.
    #[must_use]
    pub const fn round(&self) -> u64 {
        self.round
    }

    /// Batch awaiting a submission, if any.
    #[must_use]
    pub const fn displayed(&self) -> Option<&Batch> {
        self.displayed.as_ref()
    }

    /// Items shown in submitted rounds, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Item] {
        &self.history
    }

    /// Number of submitted rounds in which the item was shown but not liked.
    #[must_use]
    pub fn ignored_count(&self, id: &str) -> u32 {
        self.ignored.get(id).copied().unwrap_or(0)
    }

    /// Coin balance.
    #[must_use]
    pub const fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// The `n` strongest tags with their scores.
    #[must_use]
    pub fn top_tags(&self, n: usize) -> Vec<(&Tag, f32)> {
        self.affinity.top_tags(n)
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> SessionConfig {
        SessionConfig {
            scorer: *self.engine.config(),
            reward: self.reward,
            pool_size: self.pool_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette_core::SourceError;
    use palette_core::test_support::{FailingFeed, MemoryFeed, item};
    use rstest::{fixture, rstest};

    fn config(batch_size: usize) -> SessionConfig {
        SessionConfig::default()
            .with_scorer(ScorerConfig::default().with_batch_size(batch_size))
            .with_pool_size(batch_size)
    }

    #[fixture]
    fn session() -> Session {
        Session::new(config(5)).expect("valid config")
    }

    #[fixture]
    fn candidates() -> Vec<Item> {
        vec![
            item("1", &["sea"]),
            item("2", &["city"]),
            item("3", &["sea", "night"]),
            item("4", &["forest"]),
            item("5", &["desert"]),
        ]
    }

    #[rstest]
    fn submit_without_batch_is_rejected(mut session: Session) {
        assert_eq!(session.submit(["1"]), Err(SessionError::NoActiveBatch));
    }

    #[rstest]
    fn refresh_advances_the_round(mut session: Session, candidates: Vec<Item>) {
        let round = session.refresh_with(&candidates).round();
        assert_eq!(round, 1);
        assert_eq!(session.round(), 1);
        assert!(session.displayed().is_some());
    }

    #[rstest]
    fn submit_tracks_ignores_and_history(mut session: Session, candidates: Vec<Item>) {
        session.refresh_with(&candidates);
        let outcome = session.submit(["3"]).expect("batch on display");
        assert_eq!(outcome.summary.liked_count(), 1);
        assert_eq!(session.ignored_count("1"), 1);
        assert_eq!(session.ignored_count("3"), 0);
        assert_eq!(session.history().len(), 5);
        assert!(session.displayed().is_none());
    }

    #[rstest]
    #[case(&["1", "2"], true)]
    #[case(&["1"], false)]
    #[case(&["1", "2", "3"], false)]
    fn coin_requires_exact_like_count(
        mut session: Session,
        candidates: Vec<Item>,
        #[case] liked: &[&str],
        #[case] awarded: bool,
    ) {
        session.refresh_with(&candidates);
        let outcome = session.submit(liked).expect("batch on display");
        assert_eq!(outcome.coin_awarded, awarded);
        assert_eq!(outcome.coins, u32::from(awarded));
    }

    #[rstest]
    fn abandoned_round_leaves_affinity_unchanged(mut session: Session, candidates: Vec<Item>) {
        session.refresh_with(&candidates);
        session.refresh_with(&candidates);
        assert!(session.affinity().is_empty());
        assert_eq!(session.round(), 2);
        assert!(session.history().is_empty());
    }

    #[rstest]
    fn refresh_draws_pool_size_from_feed(mut session: Session, candidates: Vec<Item>) {
        let mut feed = MemoryFeed::with_items(candidates);
        let shown = session.refresh(&mut feed).expect("feed succeeds").len();
        assert_eq!(shown, 5);
        assert_eq!(feed.draws(), 1);
    }

    #[rstest]
    fn supply_failure_still_advances_the_round(mut session: Session) {
        let mut feed = FailingFeed::new(SourceError::EmptyQuery);
        let err = session.refresh(&mut feed).expect_err("feed fails");
        assert!(matches!(err, SessionError::Supply { .. }));
        assert_eq!(session.round(), 1);
        assert!(session.displayed().is_none());
    }

    #[rstest]
    fn redeeming_spends_coins(mut session: Session, candidates: Vec<Item>) {
        for _ in 0..3 {
            session.refresh_with(&candidates);
            session.submit(["1", "3"]).expect("batch on display");
        }
        assert_eq!(session.wallet().coins(), 3);
        let theme = session.redeem_background().expect("enough coins");
        assert_eq!(theme.tags.first().map(Tag::as_str), Some("sea"));
        assert_eq!(session.wallet().coins(), 0);
        assert_eq!(
            session.redeem_background(),
            Err(RedeemError::InsufficientCoins { have: 0, need: 3 })
        );
    }

    #[rstest]
    fn restart_clears_everything(mut session: Session, candidates: Vec<Item>) {
        session.refresh_with(&candidates);
        session.submit(["1", "3"]).expect("batch on display");
        session.refresh_with(&candidates);
        session.restart();
        assert_eq!(session.round(), 0);
        assert!(session.affinity().is_empty());
        assert!(session.displayed().is_none());
        assert!(session.history().is_empty());
        assert_eq!(session.ignored_count("2"), 0);
        assert_eq!(session.wallet().coins(), 0);
    }

    #[rstest]
    fn rejects_zero_pool_size() {
        let err = Session::new(SessionConfig::default().with_pool_size(0))
            .expect_err("zero pool is invalid");
        assert_eq!(err, ScorerConfigError::ZeroPoolSize);
    }
}
