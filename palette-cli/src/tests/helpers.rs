//! Test helpers for scripted explore sessions.

use super::*;
use crate::explore::{ExploreConfig, FeedBuilder};
use camino::{Utf8Path, Utf8PathBuf};
use palette_core::test_support::{MemoryFeed, item};
use palette_core::{CandidateFeed, Item};
use std::fs;
use tempfile::TempDir;

/// Six single-tag items, enough for a five-item batch.
pub(super) fn sample_items() -> Vec<Item> {
    vec![
        item("a", &["sea"]),
        item("b", &["city"]),
        item("c", &["forest"]),
        item("d", &["desert"]),
        item("e", &["snow"]),
        item("f", &["night"]),
    ]
}

/// Feed builder handing out a fresh in-memory feed over fixed items.
pub(super) struct StubFeedBuilder {
    pub(super) items: Vec<Item>,
}

impl FeedBuilder for StubFeedBuilder {
    fn build(&self, _config: &ExploreConfig) -> Result<Box<dyn CandidateFeed>, CliError> {
        Ok(Box::new(MemoryFeed::with_items(self.items.clone())))
    }
}

/// Temporary directory with UTF-8 path helpers.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Serialise `items` as an offline candidate file at `path`.
pub(super) fn write_candidates(path: &Utf8Path, items: &[Item]) {
    let payload = serde_json::to_vec_pretty(items).expect("serialise candidates");
    write_utf8(path, &payload);
}
