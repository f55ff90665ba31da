//! Core domain types for the Palette preference engine.
//!
//! Items are tagged candidates (usually images), a [`Batch`] is what one
//! round shows the user, and [`AffinityState`] records how much the user has
//! liked each tag so far. Candidate suppliers and item scoring sit behind the
//! [`CandidateSource`], [`CandidateFeed`] and [`Scorer`] traits so callers
//! can inject network-backed or in-memory implementations.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod affinity;
mod batch;
pub mod item;
pub mod scorer;
pub mod source;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use affinity::{AffinityState, TagAffinity};
pub use batch::Batch;
pub use item::{Item, ItemError, Tag};
pub use scorer::{Scorer, TagSumScorer};
pub use source::{CandidateFeed, CandidateSource, SourceError};
