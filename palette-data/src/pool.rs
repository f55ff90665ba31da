//! Candidate feed built from random search queries.
//!
//! Image APIs need a query, but a fresh session has no preferences to search
//! for. [`RandomQueryPool`] fills each round with results for random short
//! lowercase words so the candidate mix is broad and unbiased.

use std::collections::HashSet;

use log::{debug, warn};
use palette_core::{CandidateFeed, CandidateSource, Item, SourceError};
use rand::Rng;
use rand::seq::SliceRandom;

/// Default number of items requested per query.
pub const DEFAULT_PER_QUERY: usize = 4;
/// Default cap on queries issued per draw.
pub const DEFAULT_MAX_ATTEMPTS: usize = 50;
/// Default length of each random query.
pub const DEFAULT_QUERY_LEN: usize = 5;

/// Configuration for [`RandomQueryPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomQueryPoolConfig {
    /// Items requested per query.
    pub per_query: usize,
    /// Queries issued at most per draw.
    pub max_attempts: usize,
    /// Letters per random query.
    pub query_len: usize,
}

impl Default for RandomQueryPoolConfig {
    fn default() -> Self {
        Self {
            per_query: DEFAULT_PER_QUERY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            query_len: DEFAULT_QUERY_LEN,
        }
    }
}

impl RandomQueryPoolConfig {
    /// Set the number of items requested per query.
    #[must_use]
    pub const fn with_per_query(mut self, per_query: usize) -> Self {
        self.per_query = per_query;
        self
    }

    /// Set the maximum number of queries per draw.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the random query length; values below one are raised to one.
    #[must_use]
    pub const fn with_query_len(mut self, query_len: usize) -> Self {
        self.query_len = if query_len == 0 { 1 } else { query_len };
        self
    }
}

/// [`CandidateFeed`] that searches a [`CandidateSource`] with random words.
///
/// Each draw issues queries until `count` distinct items are collected or
/// `max_attempts` queries have been made, then shuffles the collection and
/// truncates it to `count`. Failed queries are logged and skipped; when
/// nothing at all was collected the last failure is returned.
///
/// # Examples
///
/// ```
/// use palette_core::CandidateFeed;
/// use palette_data::RandomQueryPool;
/// use palette_data::images::test_support::StubCandidateSource;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut pool = RandomQueryPool::new(StubCandidateSource::synthetic(), StdRng::seed_from_u64(7));
/// let items = pool.next_candidates(10)?;
/// assert_eq!(items.len(), 10);
/// # Ok::<(), palette_core::SourceError>(())
/// ```
#[derive(Debug)]
pub struct RandomQueryPool<S, R> {
    source: S,
    rng: R,
    config: RandomQueryPoolConfig,
}

impl<S, R> RandomQueryPool<S, R>
where
    S: CandidateSource,
    R: Rng,
{
    /// Create a pool with default settings.
    pub fn new(source: S, rng: R) -> Self {
        Self::with_config(source, rng, RandomQueryPoolConfig::default())
    }

    /// Create a pool with explicit settings.
    pub const fn with_config(source: S, rng: R, config: RandomQueryPoolConfig) -> Self {
        Self {
            source,
            rng,
            config,
        }
    }

    /// Settings in effect.
    #[must_use]
    pub const fn config(&self) -> RandomQueryPoolConfig {
        self.config
    }

    /// Underlying source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Produce a random lowercase ASCII word of the configured length.
    pub fn random_query(&mut self) -> String {
        (0..self.config.query_len.max(1))
            .map(|_| char::from(self.rng.gen_range(b'a'..=b'z')))
            .collect()
    }
}

impl<S, R> CandidateFeed for RandomQueryPool<S, R>
where
    S: CandidateSource,
    R: Rng,
{
    fn next_candidates(&mut self, count: usize) -> Result<Vec<Item>, SourceError> {
        if count == 0 || self.config.per_query == 0 {
            return Ok(Vec::new());
        }

        let mut collected: Vec<Item> = Vec::with_capacity(count);
        let mut seen: HashSet<String> = HashSet::with_capacity(count);
        let mut last_error = None;
        let mut attempts = 0_usize;

        while collected.len() < count && attempts < self.config.max_attempts {
            attempts = attempts.saturating_add(1);
            let query = self.random_query();
            match self.source.fetch(&query, self.config.per_query) {
                Ok(items) => {
                    for item in items {
                        if seen.insert(item.id().to_owned()) {
                            collected.push(item);
                        }
                    }
                }
                Err(err) => {
                    warn!("random query {query:?} failed: {err}");
                    last_error = Some(err);
                }
            }
        }

        if collected.is_empty() {
            if let Some(err) = last_error {
                return Err(err);
            }
        }

        debug!(
            "collected {} candidates from {attempts} random queries",
            collected.len()
        );
        collected.shuffle(&mut self.rng);
        collected.truncate(count);
        Ok(collected)
    }
}
