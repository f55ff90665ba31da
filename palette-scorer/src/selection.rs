//! Choose which candidates to show in a round.
//!
//! Candidates are ranked by descending aggregate score with ties kept in
//! input order. On exploration rounds one slot is reserved for the first
//! candidate whose tags avoid the user's current top tags, so the session
//! keeps surfacing material outside its established favourites.

use std::cmp::Ordering;
use std::collections::HashSet;

use log::debug;
use palette_core::{AffinityState, Batch, Item, Scorer};

/// Inputs for one call to [`select_batch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionParams {
    /// Maximum number of items to return.
    pub batch_size: usize,
    /// Rounds whose index is a multiple of this value explore. Zero never
    /// explores.
    pub exploration_interval: u64,
    /// Size of the top-tag set an exploration pick must avoid.
    pub exploration_top_tags: usize,
    /// Index of the round being selected.
    pub round: u64,
}

/// Report whether `round` reserves a slot for exploration.
#[must_use]
pub fn is_exploration_round(round: u64, interval: u64) -> bool {
    round.checked_rem(interval) == Some(0)
}

/// Select up to `params.batch_size` items from `candidates`.
///
/// Candidates sharing an identifier are considered once, keeping the first
/// occurrence. The result never holds more items than requested or than
/// distinct candidates supplied; an empty candidate list yields an empty
/// batch.
///
/// # Examples
/// ```
/// use palette_core::{AffinityState, Item, TagSumScorer};
/// use palette_scorer::{SelectionParams, select_batch};
///
/// let candidates = vec![
///     Item::new("a", "", ["city"]).unwrap(),
///     Item::new("b", "", ["sea"]).unwrap(),
/// ];
/// let affinity = AffinityState::new().with_entry("sea", 2.0, 1);
/// let params = SelectionParams {
///     batch_size: 1,
///     exploration_interval: 5,
///     exploration_top_tags: 10,
///     round: 1,
/// };
/// let batch = select_batch(&candidates, &affinity, &TagSumScorer, params);
/// assert_eq!(batch.items()[0].id(), "b");
/// ```
pub fn select_batch<S>(
    candidates: &[Item],
    affinity: &AffinityState,
    scorer: &S,
    params: SelectionParams,
) -> Batch
where
    S: Scorer + ?Sized,
{
    let distinct = distinct_candidates(candidates);
    if params.batch_size == 0 || distinct.is_empty() {
        return Batch::new(params.round, Vec::new(), None);
    }

    let ranked = rank_candidates(&distinct, affinity, scorer);
    let explorer = if is_exploration_round(params.round, params.exploration_interval) {
        find_exploration_candidate(
            &distinct,
            affinity,
            params.exploration_top_tags,
            params.round,
        )
    } else {
        None
    };

    let Some(pick) = explorer else {
        let items = ranked
            .into_iter()
            .take(params.batch_size)
            .cloned()
            .collect();
        return Batch::new(params.round, items, None);
    };

    let mut items: Vec<Item> = ranked
        .into_iter()
        .filter(|item| item.id() != pick.id())
        .take(params.batch_size.saturating_sub(1))
        .cloned()
        .collect();
    items.push(pick.clone());
    Batch::new(params.round, items, Some(pick.id().to_owned()))
}

fn distinct_candidates(candidates: &[Item]) -> Vec<&Item> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(candidates.len());
    candidates
        .iter()
        .filter(|&item| seen.insert(item.id()))
        .collect()
}

fn rank_candidates<'a, S>(
    candidates: &[&'a Item],
    affinity: &AffinityState,
    scorer: &S,
) -> Vec<&'a Item>
where
    S: Scorer + ?Sized,
{
    let mut scored: Vec<(&Item, f32)> = candidates
        .iter()
        .map(|&item| (item, scorer.score(item, affinity)))
        .collect();
    // `sort_by` is stable, which keeps equal scores in input order.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.into_iter().map(|(item, _)| item).collect()
}

fn find_exploration_candidate<'a>(
    candidates: &[&'a Item],
    affinity: &AffinityState,
    top_n: usize,
    round: u64,
) -> Option<&'a Item> {
    let top: HashSet<&str> = affinity
        .top_tags(top_n)
        .into_iter()
        .map(|(tag, _)| tag.as_str())
        .collect();
    let pick = candidates
        .iter()
        .copied()
        .find(|item| !item.tags().iter().any(|tag| top.contains(tag.as_str())));
    match pick {
        Some(item) => debug!("round {round}: exploring with {item}"),
        None => debug!("round {round}: no candidate avoids the top {top_n} tags; not exploring"),
    }
    pick
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette_core::TagSumScorer;
    use palette_core::test_support::item;
    use rstest::{fixture, rstest};

    fn params(batch_size: usize, round: u64) -> SelectionParams {
        SelectionParams {
            batch_size,
            exploration_interval: 5,
            exploration_top_tags: 10,
            round,
        }
    }

    fn ids(batch: &Batch) -> Vec<&str> {
        batch.items().iter().map(Item::id).collect()
    }

    #[fixture]
    fn candidates() -> Vec<Item> {
        vec![
            item("a", &["x"]),
            item("b", &["y"]),
            item("c", &["x", "y"]),
            item("d", &["z"]),
        ]
    }

    #[fixture]
    fn affinity() -> AffinityState {
        AffinityState::new()
            .with_entry("x", 1.0, 1)
            .with_entry("y", 2.0, 1)
    }

    #[rstest]
    #[case(1, false)]
    #[case(4, false)]
    #[case(5, true)]
    #[case(10, true)]
    #[case(0, true)]
    fn exploration_cadence(#[case] round: u64, #[case] expected: bool) {
        assert_eq!(is_exploration_round(round, 5), expected);
    }

    #[rstest]
    fn zero_interval_never_explores() {
        assert!(!is_exploration_round(0, 0));
        assert!(!is_exploration_round(7, 0));
    }

    #[rstest]
    fn ranks_by_descending_aggregate(candidates: Vec<Item>, affinity: AffinityState) {
        let batch = select_batch(&candidates, &affinity, &TagSumScorer, params(3, 1));
        assert_eq!(ids(&batch), ["c", "b", "a"]);
        assert!(batch.exploration().is_none());
    }

    #[rstest]
    fn ties_keep_input_order() {
        let candidates = vec![item("p", &["m"]), item("q", &["n"]), item("r", &["o"])];
        let batch = select_batch(
            &candidates,
            &AffinityState::new(),
            &TagSumScorer,
            params(3, 1),
        );
        assert_eq!(ids(&batch), ["p", "q", "r"]);
    }

    #[rstest]
    fn exploration_round_appends_unfamiliar_item(candidates: Vec<Item>, affinity: AffinityState) {
        let batch = select_batch(&candidates, &affinity, &TagSumScorer, params(3, 5));
        assert_eq!(ids(&batch), ["c", "b", "d"]);
        assert_eq!(batch.exploration(), Some("d"));
    }

    #[rstest]
    fn exploration_skipped_without_unfamiliar_item(affinity: AffinityState) {
        let candidates = vec![item("a", &["x"]), item("b", &["y"]), item("c", &["x", "y"])];
        let batch = select_batch(&candidates, &affinity, &TagSumScorer, params(2, 5));
        assert_eq!(ids(&batch), ["c", "b"]);
        assert!(batch.exploration().is_none());
    }

    #[rstest]
    fn exploration_pick_is_not_duplicated() {
        // With no affinity every candidate is unfamiliar and ties keep input
        // order, so the first candidate is both top-ranked and the pick.
        let candidates = vec![item("a", &["x"]), item("b", &["y"]), item("c", &["z"])];
        let batch = select_batch(
            &candidates,
            &AffinityState::new(),
            &TagSumScorer,
            params(3, 5),
        );
        assert_eq!(ids(&batch), ["b", "c", "a"]);
    }

    #[rstest]
    fn single_slot_exploration_holds_only_the_pick(candidates: Vec<Item>, affinity: AffinityState) {
        let batch = select_batch(&candidates, &affinity, &TagSumScorer, params(1, 10));
        assert_eq!(ids(&batch), ["d"]);
    }

    #[rstest]
    fn scarce_candidates_shrink_the_batch(affinity: AffinityState) {
        let candidates = vec![item("a", &["x"])];
        let batch = select_batch(&candidates, &affinity, &TagSumScorer, params(12, 1));
        assert_eq!(batch.len(), 1);
    }

    #[rstest]
    fn empty_candidates_yield_empty_batch(affinity: AffinityState) {
        let batch = select_batch(&[], &affinity, &TagSumScorer, params(12, 5));
        assert!(batch.is_empty());
        assert_eq!(batch.round(), 5);
    }

    #[rstest]
    fn zero_batch_size_yields_empty_batch(candidates: Vec<Item>, affinity: AffinityState) {
        let batch = select_batch(&candidates, &affinity, &TagSumScorer, params(0, 5));
        assert!(batch.is_empty());
    }

    #[rstest]
    fn duplicate_ids_are_considered_once(affinity: AffinityState) {
        let candidates = vec![item("a", &["y"]), item("a", &["x"]), item("b", &["x"])];
        let batch = select_batch(&candidates, &affinity, &TagSumScorer, params(3, 1));
        assert_eq!(ids(&batch), ["a", "b"]);
        assert!(batch.items()[0].has_tag("y"));
    }
}
