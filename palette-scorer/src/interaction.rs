//! Update tag affinity from the items a user liked in a round.

use std::collections::HashSet;

use log::debug;
use palette_core::{AffinityState, Batch, Item, Tag};

/// What a call to [`record_interactions`] changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionSummary {
    /// Identifiers of the liked items that were counted, in batch order.
    pub liked: Vec<String>,
    /// Distinct tags that received a reward, in first-rewarded order.
    pub rewarded: Vec<Tag>,
    /// Distinct tags whose score was decayed.
    pub decayed: Vec<Tag>,
}

impl InteractionSummary {
    /// Number of liked items counted this round.
    #[must_use]
    pub fn liked_count(&self) -> usize {
        self.liked.len()
    }

    /// Report whether the item with `id` was counted as liked.
    #[must_use]
    pub fn was_liked(&self, id: &str) -> bool {
        self.liked.iter().any(|liked| liked == id)
    }
}

/// Apply one round of feedback to `affinity`.
///
/// Every tag on every liked item is rewarded once per item carrying it.
/// Each tag that appears in `batch` but on no liked item is decayed by
/// `decay_rate` exactly once. Tags outside the batch are untouched.
///
/// `liked` holds item identifiers. Identifiers that are not in `batch` are
/// ignored and repeats count once.
///
/// # Examples
/// ```
/// use palette_core::{AffinityState, Batch, Item};
/// use palette_scorer::record_interactions;
///
/// let batch = Batch::new(
///     1,
///     vec![
///         Item::new("1", "", ["x"]).unwrap(),
///         Item::new("2", "", ["y"]).unwrap(),
///         Item::new("3", "", ["x", "y"]).unwrap(),
///     ],
///     None,
/// );
/// let mut affinity = AffinityState::new();
/// let summary = record_interactions(&mut affinity, &batch, ["3"], 0.95);
/// assert_eq!(summary.liked_count(), 1);
/// assert_eq!(affinity.score("x"), 1.0);
/// assert_eq!(affinity.frequency("y"), 1);
/// ```
pub fn record_interactions<I, T>(
    affinity: &mut AffinityState,
    batch: &Batch,
    liked: I,
    decay_rate: f32,
) -> InteractionSummary
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let requested: HashSet<String> = liked
        .into_iter()
        .map(|id| id.as_ref().to_owned())
        .collect();
    for id in requested.iter().filter(|id| !batch.contains(id)) {
        debug!("round {}: ignoring like for unknown item {id}", batch.round());
    }

    let mut counted: HashSet<&str> = HashSet::new();
    let liked_items: Vec<&Item> = batch
        .items()
        .iter()
        .filter(|item| requested.contains(item.id()) && counted.insert(item.id()))
        .collect();

    let mut summary = InteractionSummary {
        liked: liked_items.iter().map(|item| item.id().to_owned()).collect(),
        ..InteractionSummary::default()
    };

    let mut liked_tags: HashSet<&str> = HashSet::new();
    for tag in liked_items.iter().flat_map(|item| item.tags()) {
        affinity.reward(tag);
        if liked_tags.insert(tag.as_str()) {
            summary.rewarded.push(tag.clone());
        }
    }

    let mut visited: HashSet<&str> = HashSet::new();
    for tag in batch.items().iter().flat_map(Item::tags) {
        if liked_tags.contains(tag.as_str()) || !visited.insert(tag.as_str()) {
            continue;
        }
        if affinity.decay(tag.as_str(), decay_rate) {
            summary.decayed.push(tag.clone());
        }
    }

    summary
}
