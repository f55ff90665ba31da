//! Offline candidates loaded from a JSON file.
//!
//! The file holds an array of `{"id": str, "url": str, "tags": [str, ...]}`
//! objects. It is read once at construction; afterwards the feed serves the
//! items round-robin and the source filters them by tag.
#![forbid(unsafe_code)]

use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use log::debug;
use palette_core::{CandidateFeed, CandidateSource, Item, SourceError};
use thiserror::Error;

/// Errors raised while loading a candidate file.
#[derive(Debug, Error)]
pub enum FileFeedError {
    /// Opening the file failed.
    #[error("failed to open candidate file {path:?}")]
    Open {
        /// Path that could not be opened.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading the file failed.
    #[error("failed to read candidate file {path:?}")]
    Read {
        /// Path being read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The contents were not a valid JSON array of items.
    #[error("failed to parse candidate file {path:?}")]
    Parse {
        /// Path being parsed.
        path: Utf8PathBuf,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The file held no items.
    #[error("candidate file {path:?} contains no items")]
    Empty {
        /// Path of the empty file.
        path: Utf8PathBuf,
    },
}

/// Candidates read from disk, served round-robin.
#[derive(Debug, Clone)]
pub struct JsonFileFeed {
    items: Vec<Item>,
    cursor: usize,
}

impl JsonFileFeed {
    /// Load the candidates stored at `path`.
    ///
    /// # Errors
    /// Returns [`FileFeedError`] when the file cannot be read or parsed, or
    /// holds no items.
    ///
    /// # Examples
    /// ```no_run
    /// use camino::Utf8Path;
    /// use palette_core::CandidateFeed;
    /// use palette_data::JsonFileFeed;
    ///
    /// let mut feed = JsonFileFeed::open(Utf8Path::new("candidates.json"))?;
    /// let first = feed.next_candidates(12)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(path: &Utf8Path) -> Result<Self, FileFeedError> {
        let mut file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
            FileFeedError::Open {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|source| FileFeedError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let items: Vec<Item> =
            serde_json::from_str(&contents).map_err(|source| FileFeedError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if items.is_empty() {
            return Err(FileFeedError::Empty {
                path: path.to_path_buf(),
            });
        }
        debug!("loaded {} candidates from {path}", items.len());
        Ok(Self::from_items(items))
    }

    /// Build a feed from items already in memory.
    #[must_use]
    pub const fn from_items(items: Vec<Item>) -> Self {
        Self { items, cursor: 0 }
    }

    /// Every loaded item, in file order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of loaded items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Report whether no items were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CandidateFeed for JsonFileFeed {
    /// Return the next `count` items, wrapping around at the end of the
    /// file. A draw never repeats an item, so it is capped at the number of
    /// loaded items.
    fn next_candidates(&mut self, count: usize) -> Result<Vec<Item>, SourceError> {
        let len = self.items.len();
        if len == 0 {
            return Ok(Vec::new());
        }
        let take = count.min(len);
        let drawn = self
            .items
            .iter()
            .cycle()
            .skip(self.cursor)
            .take(take)
            .cloned()
            .collect();
        self.cursor = self
            .cursor
            .saturating_add(take)
            .checked_rem(len)
            .unwrap_or(0);
        Ok(drawn)
    }
}

impl CandidateSource for JsonFileFeed {
    /// Return up to `limit` items tagged exactly `query`, in file order.
    fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Item>, SourceError> {
        let term = query.trim();
        if term.is_empty() {
            return Err(SourceError::EmptyQuery);
        }
        Ok(self
            .items
            .iter()
            .filter(|item| item.has_tag(term))
            .take(limit)
            .cloned()
            .collect())
    }
}
