//! Command-line interface for exploring image preferences with Palette.
//!
//! The `explore` subcommand runs an interactive session in the terminal:
//! each round shows a numbered batch of images, reads which ones the user
//! liked and reports the coin outcome together with the strongest tags.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod explore;

pub use error::CliError;
use explore::{ExploreArgs, run_explore};

const ARG_CANDIDATES: &str = "candidates";
const ARG_PROVIDER: &str = "provider";
const ARG_API_KEY: &str = "api-key";
const ARG_BATCH_SIZE: &str = "batch-size";
const ARG_EXPLORATION_INTERVAL: &str = "exploration-interval";
const ARG_DECAY_RATE: &str = "decay-rate";
const ARG_POOL_SIZE: &str = "pool-size";
const ARG_MAX_ROUNDS: &str = "max-rounds";
const ARG_SEED: &str = "seed";
const ENV_API_KEY: &str = "PALETTE_CMDS_EXPLORE_API_KEY";

/// Run the Palette CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration loading or the
/// selected command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Explore(args) => run_explore(args)?,
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "palette",
    about = "Learn image preferences from likes, one batch at a time",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run an interactive preference session in the terminal.
    Explore(ExploreArgs),
}

#[cfg(test)]
mod tests;
