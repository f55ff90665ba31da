//! Error types emitted by the Palette CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use palette_data::{FileFeedError, SourceBuildError};
use palette_scorer::{ScorerConfigError, SessionError};
use thiserror::Error;

/// Errors emitted by the Palette CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// Neither an offline candidate file nor an image API key was supplied.
    #[error("no candidate supply configured (set --{file_field} or --{key_field}/{key_env})")]
    MissingSupply {
        /// Flag naming the offline candidate file.
        file_field: &'static str,
        /// Flag naming the image API key.
        key_field: &'static str,
        /// Environment variable carrying the image API key.
        key_env: &'static str,
    },
    /// The merged session settings were rejected.
    #[error("invalid session settings: {0}")]
    InvalidSettings(#[from] ScorerConfigError),
    /// Loading the offline candidate file failed.
    #[error(transparent)]
    LoadCandidates(#[from] FileFeedError),
    /// Constructing the image search client failed.
    #[error("failed to build image source: {0}")]
    BuildSource(#[from] SourceBuildError),
    /// A round could not be run.
    #[error("session round failed: {0}")]
    Session(#[from] SessionError),
    /// Reading the user's answer failed.
    #[error("failed to read input: {0}")]
    ReadInput(#[source] std::io::Error),
    /// Writing to the terminal failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
