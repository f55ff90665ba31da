//! Batches of items presented together in one round.

use std::collections::HashSet;

use crate::Item;

/// Items chosen for one presentation round.
///
/// A batch remembers the round that produced it and which item, if any,
/// was injected as the exploration pick.
///
/// # Examples
/// ```
/// use palette_core::{Batch, Item};
///
/// let item = Item::new("a", "https://example.com/a.jpg", ["sea"]).unwrap();
/// let batch = Batch::new(1, vec![item], None);
/// assert_eq!(batch.len(), 1);
/// assert!(batch.contains("a"));
/// assert!(batch.exploration().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Batch {
    round: u64,
    items: Vec<Item>,
    exploration: Option<String>,
}

impl Batch {
    /// Construct a batch for `round`.
    ///
    /// Items repeating an identifier already seen are dropped, so the first
    /// occurrence wins. `exploration_id` names the injected exploration item;
    /// it is dropped when no item in `items` carries that identifier.
    #[must_use]
    pub fn new(round: u64, items: Vec<Item>, exploration_id: Option<String>) -> Self {
        let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
        let distinct: Vec<Item> = items
            .into_iter()
            .filter(|item| seen.insert(item.id().to_owned()))
            .collect();
        let exploration =
            exploration_id.filter(|id| distinct.iter().any(|item| item.id() == id.as_str()));
        Self {
            round,
            items: distinct,
            exploration,
        }
    }

    /// Round index that produced this batch.
    #[must_use]
    pub const fn round(&self) -> u64 {
        self.round
    }

    /// Items in presentation order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Identifier of the exploration item, if one was injected.
    #[must_use]
    pub fn exploration(&self) -> Option<&str> {
        self.exploration.as_deref()
    }

    /// Look up an item by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Report whether an item with `id` is part of the batch.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Report whether the batch holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the batch and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_exploration_id_is_dropped() {
        let item = Item::new("a", "u", ["x"]).unwrap();
        let batch = Batch::new(5, vec![item], Some("missing".into()));
        assert!(batch.exploration().is_none());
        assert_eq!(batch.round(), 5);
    }

    #[test]
    fn lookup_by_id() {
        let a = Item::new("a", "u", ["x"]).unwrap();
        let b = Item::new("b", "u", ["y"]).unwrap();
        let batch = Batch::new(1, vec![a, b.clone()], Some("b".into()));
        assert_eq!(batch.get("b"), Some(&b));
        assert_eq!(batch.exploration(), Some("b"));
        assert!(!batch.contains("c"));
    }

    #[test]
    fn repeated_ids_keep_the_first_item() {
        let first = Item::new("a", "https://images.example/1.jpg", ["x"]).unwrap();
        let repeat = Item::new("a", "https://images.example/2.jpg", ["y"]).unwrap();
        let other = Item::new("b", "u", ["z"]).unwrap();
        let batch = Batch::new(1, vec![first.clone(), repeat, other], Some("a".into()));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.get("a"), Some(&first));
        assert_eq!(batch.exploration(), Some("a"));
    }
}
