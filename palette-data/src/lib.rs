//! Candidate suppliers for the Palette preference engine.
//!
//! Responsibilities:
//! - Adapt external image search APIs to [`palette_core::CandidateSource`].
//! - Turn a query-driven source into a round-by-round
//!   [`palette_core::CandidateFeed`] via random queries.
//! - Load offline candidate sets from JSON files.
//!
//! Boundaries:
//! - Do not encode preference rules (live in `palette-scorer`).
//! - Keep blocking I/O off async executors; the HTTP source owns its own
//!   runtime.
//!
//! Invariants:
//! - No global mutable state; randomness is injected.

#![forbid(unsafe_code)]

mod file;
pub mod images;
mod pool;

pub use file::{FileFeedError, JsonFileFeed};
pub use images::{
    HttpImageSource, HttpImageSourceConfig, ImageApi, SourceBuildError, UnknownImageApi,
};
pub use pool::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_PER_QUERY, DEFAULT_QUERY_LEN, RandomQueryPool,
    RandomQueryPoolConfig,
};
