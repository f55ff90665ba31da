//! Per-tag affinity accumulated over a session.
//!
//! Each tag owns one [`TagAffinity`] entry holding both its score and how
//! often it has been rewarded, so the two values can never drift apart.
//! Unknown tags read as a zero score and zero frequency.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::{Item, Tag};

/// Score and reward count for a single tag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagAffinity {
    /// Accumulated affinity; finite and non-negative.
    pub score: f32,
    /// Number of times the tag has been rewarded.
    pub frequency: u32,
}

/// Tag affinities for one user session.
///
/// # Examples
/// ```
/// use palette_core::{AffinityState, Tag};
///
/// let mut state = AffinityState::new();
/// let first = state.reward(&Tag::new("sea"));
/// let second = state.reward(&Tag::new("sea"));
/// assert_eq!(first, 1.0);
/// assert_eq!(second, 0.5);
/// assert_eq!(state.score("sea"), 1.5);
/// assert_eq!(state.frequency("sea"), 2);
/// assert_eq!(state.score("sky"), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffinityState {
    entries: HashMap<Tag, TagAffinity>,
}

impl AffinityState {
    /// Construct an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry, returning `self` for chaining.
    ///
    /// Non-finite or negative scores are stored as `0.0`.
    #[must_use]
    pub fn with_entry(mut self, tag: impl Into<Tag>, score: f32, frequency: u32) -> Self {
        let sanitised = if score.is_finite() {
            score.max(0.0)
        } else {
            0.0
        };
        self.entries.insert(
            tag.into(),
            TagAffinity {
                score: sanitised,
                frequency,
            },
        );
        self
    }

    /// Score for `tag`, or `0.0` when the tag has never been seen.
    #[must_use]
    pub fn score(&self, tag: &str) -> f32 {
        self.entries.get(tag).map_or(0.0, |entry| entry.score)
    }

    /// Reward count for `tag`, or `0` when the tag has never been seen.
    #[must_use]
    pub fn frequency(&self, tag: &str) -> u32 {
        self.entries.get(tag).map_or(0, |entry| entry.frequency)
    }

    /// Full entry for `tag`, if present.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<TagAffinity> {
        self.entries.get(tag).copied()
    }

    /// Report whether `tag` has an entry.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// Reward `tag` once and return the increment applied to its score.
    ///
    /// The frequency is bumped first and the score grows by
    /// `1 / max(1, frequency)`, so often-rewarded tags gain less.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "rarity weighting divides by the reward count"
    )]
    pub fn reward(&mut self, tag: &Tag) -> f32 {
        let entry = self.entries.entry(tag.clone()).or_default();
        entry.frequency = entry.frequency.saturating_add(1);
        let increment = 1.0 / entry.frequency.max(1) as f32;
        entry.score += increment;
        increment
    }

    /// Multiply the score of `tag` by `factor`.
    ///
    /// Tags without an entry are left absent. Returns whether an entry was
    /// decayed.
    #[expect(
        clippy::float_arithmetic,
        reason = "decay scales the stored score"
    )]
    pub fn decay(&mut self, tag: &str, factor: f32) -> bool {
        let Some(entry) = self.entries.get_mut(tag) else {
            return false;
        };
        entry.score *= factor;
        true
    }

    /// Sum of the scores of every tag on `item`.
    #[must_use]
    pub fn aggregate(&self, item: &Item) -> f32 {
        item.tags().iter().map(|tag| self.score(tag.as_str())).sum()
    }

    /// The `n` highest-scoring tags in descending order.
    ///
    /// Equal scores are ordered by tag text so results are reproducible.
    #[must_use]
    pub fn top_tags(&self, n: usize) -> Vec<(&Tag, f32)> {
        let mut ranked: Vec<(&Tag, f32)> = self
            .entries
            .iter()
            .map(|(tag, entry)| (tag, entry.score))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        ranked.truncate(n);
        ranked
    }

    /// Number of tags with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Report whether no tag has been seen yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over every entry in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&Tag, TagAffinity)> {
        self.entries.iter().map(|(tag, entry)| (tag, *entry))
    }
}
