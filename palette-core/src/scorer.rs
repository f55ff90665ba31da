//! Score candidate items against accumulated tag affinity.
//!
//! The `Scorer` trait assigns an aggregate score to an [`Item`](crate::Item)
//! given the session's [`AffinityState`](crate::AffinityState). Batch
//! selection ranks candidates by this value.

use crate::{AffinityState, Item};

/// Calculate an aggregate score for a candidate item.
///
/// Higher scores rank earlier. Implementations must be thread-safe
/// (`Send` + `Sync`) and infallible; unseen tags contribute `0.0`.
///
/// Implementations must:
/// - Produce finite (`f32::is_finite`) scores.
/// - Return non-negative values.
///
/// Use [`Scorer::sanitise`] to apply these guards.
///
/// # Examples
///
/// ```rust
/// use palette_core::{AffinityState, Item, Scorer};
///
/// struct TagCount;
///
/// impl Scorer for TagCount {
///     fn score(&self, item: &Item, _affinity: &AffinityState) -> f32 {
///         item.tags().len() as f32
///     }
/// }
///
/// let item = Item::new("a", "", ["x", "y"]).unwrap();
/// assert_eq!(TagCount.score(&item, &AffinityState::new()), 2.0);
/// ```
pub trait Scorer: Send + Sync {
    /// Return a score for `item` according to `affinity`.
    fn score(&self, item: &Item, affinity: &AffinityState) -> f32;

    /// Validate a raw score.
    ///
    /// Returns `0.0` for non-finite values and floors negatives at `0.0`.
    fn sanitise(score: f32) -> f32
    where
        Self: Sized,
    {
        if !score.is_finite() {
            return 0.0;
        }
        score.max(0.0)
    }
}

/// Default scorer: the sum of the affinity scores of the item's tags.
#[derive(Debug, Copy, Clone, Default)]
pub struct TagSumScorer;

impl Scorer for TagSumScorer {
    fn score(&self, item: &Item, affinity: &AffinityState) -> f32 {
        Self::sanitise(affinity.aggregate(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TOLERANCE: f32 = 1e-6;

    #[rstest]
    #[case(&["x"], 1.0)]
    #[case(&["z"], 0.0)]
    #[case(&["x", "y"], 1.5)]
    #[case(&["x", "x"], 1.0)]
    #[case(&["y", "z", "x"], 1.5)]
    fn tag_sum_scenarios(#[case] tags: &[&str], #[case] expected: f32) {
        let affinity = AffinityState::new()
            .with_entry("x", 1.0, 1)
            .with_entry("y", 0.5, 2);
        let item = Item::new("i", "", tags.iter().copied()).unwrap();
        let score = TagSumScorer.score(&item, &affinity);
        assert!((score - expected).abs() <= TOLERANCE);
    }

    #[rstest]
    #[case(f32::NAN, 0.0)]
    #[case(f32::INFINITY, 0.0)]
    #[case(f32::NEG_INFINITY, 0.0)]
    #[case(-0.1, 0.0)]
    #[case(7.5, 7.5)]
    fn sanitise_filters_invalid_scores(#[case] input: f32, #[case] expected: f32) {
        assert_eq!(TagSumScorer::sanitise(input), expected);
    }
}
