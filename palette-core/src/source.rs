//! Capabilities that supply candidate items.
//!
//! [`CandidateSource`] answers a search query, for example an image-search
//! API keyed by a tag. [`CandidateFeed`] hands out a pool of candidates for
//! the next round without the caller choosing a query. Sessions depend only
//! on these traits so network-backed suppliers can be swapped for in-memory
//! doubles in tests.

use thiserror::Error;

use crate::Item;

/// Errors raised by candidate suppliers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The search query was empty or whitespace.
    #[error("search query must not be empty")]
    EmptyQuery,
    /// The request did not complete before the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Timeout that elapsed, in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The request failed before a response arrived.
    #[error("network error contacting {url}: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Error description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse search response: {message}")]
    ParseError {
        /// Decoder message.
        message: String,
    },
}

/// Search for candidate items matching a query.
///
/// Implementations return at most `limit` items and may return fewer,
/// including none. An empty result is not an error.
///
/// # Examples
///
/// ```rust
/// use palette_core::{CandidateSource, Item, SourceError};
///
/// struct Echo;
///
/// impl CandidateSource for Echo {
///     fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Item>, SourceError> {
///         if query.trim().is_empty() {
///             return Err(SourceError::EmptyQuery);
///         }
///         let item = Item::new(query, "", [query]).map_err(|err| SourceError::ParseError {
///             message: err.to_string(),
///         })?;
///         Ok(std::iter::repeat(item).take(limit.min(1)).collect())
///     }
/// }
///
/// let items = Echo.fetch("sea", 4)?;
/// assert_eq!(items.len(), 1);
/// assert!(Echo.fetch(" ", 4).is_err());
/// # Ok::<(), SourceError>(())
/// ```
pub trait CandidateSource {
    /// Return up to `limit` items matching `query`.
    ///
    /// Implementations must return `Err(SourceError::EmptyQuery)` when the
    /// query is blank and they cannot serve unfiltered results.
    fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Item>, SourceError>;
}

impl<T: CandidateSource + ?Sized> CandidateSource for &T {
    fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Item>, SourceError> {
        (**self).fetch(query, limit)
    }
}

impl<T: CandidateSource + ?Sized> CandidateSource for Box<T> {
    fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Item>, SourceError> {
        (**self).fetch(query, limit)
    }
}

/// Supply the candidate pool for the next round.
///
/// Feeds may be stateful (a shuffling pool, a cursor over a file) and so take
/// `&mut self`. Returning fewer than `count` items is allowed.
pub trait CandidateFeed {
    /// Return up to `count` candidates.
    fn next_candidates(&mut self, count: usize) -> Result<Vec<Item>, SourceError>;
}

impl<T: CandidateFeed + ?Sized> CandidateFeed for &mut T {
    fn next_candidates(&mut self, count: usize) -> Result<Vec<Item>, SourceError> {
        (**self).next_candidates(count)
    }
}

impl<T: CandidateFeed + ?Sized> CandidateFeed for Box<T> {
    fn next_candidates(&mut self, count: usize) -> Result<Vec<Item>, SourceError> {
        (**self).next_candidates(count)
    }
}
