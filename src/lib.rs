//! Facade crate for the Palette preference engine.
//!
//! This crate re-exports the core domain types and the preference scorer,
//! and exposes the bundled candidate suppliers behind a feature flag.

#![forbid(unsafe_code)]

pub use palette_core::{
    AffinityState, Batch, CandidateFeed, CandidateSource, Item, ItemError, Scorer, SourceError,
    Tag, TagAffinity, TagSumScorer,
};

pub use palette_scorer::{
    BackgroundTheme, InteractionSummary, PreferenceScorer, RedeemError, RewardPolicy,
    RoundOutcome, ScorerConfig, ScorerConfigError, Session, SessionConfig, SessionError, Wallet,
};

#[cfg(feature = "data")]
pub use palette_data::{
    FileFeedError, HttpImageSource, HttpImageSourceConfig, ImageApi, JsonFileFeed,
    RandomQueryPool, RandomQueryPoolConfig, SourceBuildError,
};
