//! HTTP image search sources.
//!
//! This module provides [`HttpImageSource`], an implementation of
//! [`palette_core::CandidateSource`] that searches the Pexels or Unsplash
//! photo APIs and turns each hit into an [`Item`](palette_core::Item) tagged
//! with the query that found it.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use palette_core::CandidateSource;
//! use palette_data::images::{HttpImageSource, HttpImageSourceConfig, ImageApi};
//!
//! let config = HttpImageSourceConfig::new(ImageApi::Unsplash, "access-key")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let source = HttpImageSource::with_config(config)?;
//!
//! let items = source.fetch("fjord", 4)?;
//! println!("found {} images", items.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod provider;
mod response;

#[doc(hidden)]
pub mod test_support;

pub use provider::{
    DEFAULT_USER_AGENT, HttpImageSource, HttpImageSourceConfig, ImageApi, SourceBuildError,
    UnknownImageApi,
};
