//! Test utilities for candidate sources.
//!
//! This module provides [`StubCandidateSource`], a deterministic test double
//! for [`CandidateSource`] that returns pre-configured responses without
//! making HTTP requests.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use palette_core::{CandidateSource, Item, SourceError};

/// Stub `CandidateSource` for testing.
///
/// Every call is recorded so tests can inspect the queries that were issued.
///
/// # Example
///
/// ```
/// use palette_core::CandidateSource;
/// use palette_data::images::test_support::StubCandidateSource;
///
/// let source = StubCandidateSource::synthetic();
/// let items = source.fetch("dune", 2).unwrap();
///
/// assert_eq!(items.len(), 2);
/// assert!(items.iter().all(|item| item.has_tag("dune")));
/// assert_eq!(source.queries(), ["dune"]);
/// ```
#[derive(Debug)]
pub struct StubCandidateSource {
    response: StubResponse,
    queries: Mutex<Vec<String>>,
}

#[derive(Debug)]
enum StubResponse {
    Items(Vec<Item>),
    Synthetic,
    Error(SourceError),
    Script(Mutex<VecDeque<Result<Vec<Item>, SourceError>>>),
}

impl StubCandidateSource {
    /// Create a source that returns up to `limit` of `items` for any query.
    #[must_use]
    pub fn with_items(items: Vec<Item>) -> Self {
        Self::from_response(StubResponse::Items(items))
    }

    /// Create a source that invents `limit` fresh items per call, each
    /// tagged with the query and identified as `{query}-{call}-{index}`.
    #[must_use]
    pub fn synthetic() -> Self {
        Self::from_response(StubResponse::Synthetic)
    }

    /// Create a source that fails every call with `error`.
    #[must_use]
    pub fn with_error(error: SourceError) -> Self {
        Self::from_response(StubResponse::Error(error))
    }

    /// Create a source that replays `responses` in order and then returns
    /// empty results.
    #[must_use]
    pub fn with_script<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = Result<Vec<Item>, SourceError>>,
    {
        Self::from_response(StubResponse::Script(Mutex::new(
            responses.into_iter().collect(),
        )))
    }

    fn from_response(response: StubResponse) -> Self {
        Self {
            response,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far, in call order.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, query: &str) -> usize {
        let mut queries = self.queries.lock().unwrap_or_else(PoisonError::into_inner);
        queries.push(query.to_owned());
        queries.len()
    }
}

fn synthetic_items(query: &str, call: usize, limit: usize) -> Result<Vec<Item>, SourceError> {
    (0..limit)
        .map(|index| {
            let id = format!("{query}-{call}-{index}");
            let url = format!("https://images.example/{id}.jpg");
            Item::new(id, url, [query]).map_err(|err| SourceError::ParseError {
                message: err.to_string(),
            })
        })
        .collect()
}

impl CandidateSource for StubCandidateSource {
    fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Item>, SourceError> {
        if query.trim().is_empty() {
            return Err(SourceError::EmptyQuery);
        }
        let call = self.record(query);

        match &self.response {
            StubResponse::Items(items) => Ok(items.iter().take(limit).cloned().collect()),
            StubResponse::Synthetic => synthetic_items(query, call, limit),
            StubResponse::Error(error) => Err(error.clone()),
            StubResponse::Script(script) => script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
                .map(|items| items.into_iter().take(limit).collect()),
        }
    }
}
