//! Test-only, in-memory candidate suppliers used by unit and behaviour tests.

use crate::{CandidateFeed, CandidateSource, Item, SourceError};

/// In-memory `CandidateSource` that matches queries against item tags.
///
/// The source performs a linear scan and is intended only for small datasets.
#[derive(Default, Debug, Clone)]
pub struct MemorySource {
    items: Vec<Item>,
}

impl MemorySource {
    /// Create a source from a collection of items.
    pub fn with_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Item>,
    {
        Self {
            items: items.into_iter().collect(),
        }
    }
}

impl CandidateSource for MemorySource {
    fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Item>, SourceError> {
        if query.trim().is_empty() {
            return Err(SourceError::EmptyQuery);
        }
        Ok(self
            .items
            .iter()
            .filter(|item| item.has_tag(query))
            .take(limit)
            .cloned()
            .collect())
    }
}

/// In-memory `CandidateFeed` that cycles through a fixed list.
///
/// Each call continues where the previous one stopped and never returns the
/// same item twice within a single draw.
#[derive(Default, Debug, Clone)]
pub struct MemoryFeed {
    items: Vec<Item>,
    cursor: usize,
    draws: usize,
}

impl MemoryFeed {
    /// Create a feed from a collection of items.
    pub fn with_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Item>,
    {
        Self {
            items: items.into_iter().collect(),
            cursor: 0,
            draws: 0,
        }
    }

    /// Number of times the feed has been asked for candidates.
    #[must_use]
    pub const fn draws(&self) -> usize {
        self.draws
    }
}

impl CandidateFeed for MemoryFeed {
    fn next_candidates(&mut self, count: usize) -> Result<Vec<Item>, SourceError> {
        self.draws = self.draws.saturating_add(1);
        let len = self.items.len();
        if len == 0 {
            return Ok(Vec::new());
        }
        let take = count.min(len);
        let drawn: Vec<Item> = self
            .items
            .iter()
            .cycle()
            .skip(self.cursor)
            .take(take)
            .cloned()
            .collect();
        self.cursor = self.cursor.saturating_add(take).checked_rem(len).unwrap_or(0);
        Ok(drawn)
    }
}

/// `CandidateFeed` that always fails with the configured error.
#[derive(Debug, Clone)]
pub struct FailingFeed {
    error: SourceError,
}

impl FailingFeed {
    /// Create a feed returning `error` on every draw.
    #[must_use]
    pub const fn new(error: SourceError) -> Self {
        Self { error }
    }
}

impl CandidateFeed for FailingFeed {
    fn next_candidates(&mut self, _count: usize) -> Result<Vec<Item>, SourceError> {
        Err(self.error.clone())
    }
}

/// Build an item from an identifier and tag labels, panicking on bad input.
///
/// # Panics
/// Panics when `tags` is empty or `id` is blank.
#[must_use]
#[expect(clippy::expect_used, reason = "test fixtures should fail fast")]
pub fn item(id: &str, tags: &[&str]) -> Item {
    Item::new(id, format!("https://images.example/{id}.jpg"), tags.iter().copied())
        .expect("test item must have an id and tags")
}
