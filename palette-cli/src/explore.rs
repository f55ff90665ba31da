//! Explore command implementation for the Palette CLI.

use std::io::{self, BufRead, Write};

use camino::Utf8PathBuf;
use clap::Parser;
use log::{debug, info};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use palette_core::{Batch, CandidateFeed};
use palette_data::{
    HttpImageSource, HttpImageSourceConfig, ImageApi, JsonFileFeed, RandomQueryPool,
};
use palette_scorer::{RoundOutcome, ScorerConfig, Session, SessionConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ARG_API_KEY, ARG_BATCH_SIZE, ARG_CANDIDATES, ARG_DECAY_RATE, ARG_EXPLORATION_INTERVAL,
    ARG_MAX_ROUNDS, ARG_POOL_SIZE, ARG_PROVIDER, ARG_SEED, CliError, ENV_API_KEY,
};

/// Number of tags reported after each round.
const REPORTED_TAGS: usize = 10;

/// CLI arguments for the `explore` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Run an interactive preference session. Candidates come \
                 from an offline JSON file or from random searches against \
                 the Pexels or Unsplash API. Each round prints a numbered \
                 batch; answer with the numbers you like, an empty line for \
                 none, `r` to redeem a background or `q` to quit.",
    about = "Explore image preferences interactively"
)]
#[ortho_config(prefix = "PALETTE")]
pub(crate) struct ExploreArgs {
    /// Offline JSON file of candidate items.
    #[arg(long = ARG_CANDIDATES, value_name = "path")]
    #[serde(default)]
    pub(crate) candidates: Option<Utf8PathBuf>,
    /// Image search API used when no candidate file is given.
    #[arg(long = ARG_PROVIDER, value_name = "pexels|unsplash")]
    #[serde(default)]
    pub(crate) provider: Option<ImageApi>,
    /// API key for the image search provider.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Items shown per round.
    #[arg(long = ARG_BATCH_SIZE, value_name = "n")]
    #[serde(default)]
    pub(crate) batch_size: Option<usize>,
    /// Rounds between exploration picks.
    #[arg(long = ARG_EXPLORATION_INTERVAL, value_name = "k")]
    #[serde(default)]
    pub(crate) exploration_interval: Option<u64>,
    /// Multiplier applied to shown but unliked tags.
    #[arg(long = ARG_DECAY_RATE, value_name = "rate")]
    #[serde(default)]
    pub(crate) decay_rate: Option<f32>,
    /// Candidates drawn from the supplier per round.
    #[arg(long = ARG_POOL_SIZE, value_name = "n")]
    #[serde(default)]
    pub(crate) pool_size: Option<usize>,
    /// Stop after this many rounds.
    #[arg(long = ARG_MAX_ROUNDS, value_name = "n")]
    #[serde(default)]
    pub(crate) max_rounds: Option<u64>,
    /// Seed for the random query generator.
    #[arg(long = ARG_SEED, value_name = "n")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl ExploreArgs {
    pub(crate) fn into_config(self) -> Result<ExploreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ExploreConfig::try_from(merged)
    }
}

/// Where round candidates come from.
#[derive(Debug, Clone)]
pub(crate) enum SupplyConfig {
    /// Offline candidates read from a JSON file.
    File(Utf8PathBuf),
    /// Random searches against an image API.
    Remote(HttpImageSourceConfig),
}

/// Resolved `explore` command configuration.
#[derive(Debug, Clone)]
pub(crate) struct ExploreConfig {
    /// Candidate supplier.
    pub(crate) supply: SupplyConfig,
    /// Validated session settings.
    pub(crate) session: SessionConfig,
    /// Optional cap on the number of rounds.
    pub(crate) max_rounds: Option<u64>,
    /// Optional seed for random queries.
    pub(crate) seed: Option<u64>,
}

impl TryFrom<ExploreArgs> for ExploreConfig {
    type Error = CliError;

    fn try_from(args: ExploreArgs) -> Result<Self, Self::Error> {
        let supply = match (args.candidates, args.api_key) {
            (Some(path), api_key) => {
                if api_key.is_some() {
                    debug!("candidate file {path} given; ignoring the image API key");
                }
                SupplyConfig::File(path)
            }
            (None, Some(api_key)) => SupplyConfig::Remote(HttpImageSourceConfig::new(
                args.provider.unwrap_or_default(),
                api_key,
            )),
            (None, None) => {
                return Err(CliError::MissingSupply {
                    file_field: ARG_CANDIDATES,
                    key_field: ARG_API_KEY,
                    key_env: ENV_API_KEY,
                });
            }
        };

        let defaults = SessionConfig::default();
        let mut scorer = ScorerConfig::default();
        if let Some(batch_size) = args.batch_size {
            scorer = scorer.with_batch_size(batch_size);
        }
        if let Some(interval) = args.exploration_interval {
            scorer = scorer.with_exploration_interval(interval);
        }
        if let Some(decay_rate) = args.decay_rate {
            scorer = scorer.with_decay_rate(decay_rate);
        }
        let session = defaults
            .with_scorer(scorer)
            .with_pool_size(args.pool_size.unwrap_or(defaults.pool_size))
            .validate()?;

        Ok(Self {
            supply,
            session,
            max_rounds: args.max_rounds,
            seed: args.seed,
        })
    }
}

/// Builds the candidate feed for the current explore invocation.
pub(crate) trait FeedBuilder {
    fn build(&self, config: &ExploreConfig) -> Result<Box<dyn CandidateFeed>, CliError>;
}

pub(crate) struct DefaultFeedBuilder;

impl FeedBuilder for DefaultFeedBuilder {
    fn build(&self, config: &ExploreConfig) -> Result<Box<dyn CandidateFeed>, CliError> {
        match &config.supply {
            SupplyConfig::File(path) => Ok(Box::new(JsonFileFeed::open(path)?)),
            SupplyConfig::Remote(http) => {
                let source = HttpImageSource::with_config(http.clone())?;
                let rng = config
                    .seed
                    .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
                Ok(Box::new(RandomQueryPool::new(source, rng)))
            }
        }
    }
}

/// Totals reported when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ExploreReport {
    /// Rounds whose likes were submitted.
    pub(crate) rounds: u64,
    /// Coins left in the wallet.
    pub(crate) coins: u32,
}

/// One line of user input, interpreted against the displayed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RoundInput {
    /// Zero-based positions of the liked items.
    Likes(Vec<usize>),
    /// Spend coins on a background.
    Redeem,
    /// End the session.
    Quit,
}

/// Reasons a line of input was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum InputError {
    /// A token was neither a command nor a number.
    #[error("{0:?} is not an item number")]
    NotANumber(String),
    /// A number fell outside `1..=len`.
    #[error("{index} is not between 1 and {len}")]
    OutOfRange { index: usize, len: usize },
}

/// Interpret one line typed in response to a batch of `len` items.
pub(crate) fn parse_round_input(line: &str, len: usize) -> Result<RoundInput, InputError> {
    match line.trim() {
        "q" | "quit" => return Ok(RoundInput::Quit),
        "r" | "redeem" => return Ok(RoundInput::Redeem),
        _ => {}
    }
    line.split_whitespace()
        .map(|token| {
            let index: usize = token
                .parse()
                .map_err(|_| InputError::NotANumber(token.to_owned()))?;
            index
                .checked_sub(1)
                .filter(|position| *position < len)
                .ok_or(InputError::OutOfRange { index, len })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(RoundInput::Likes)
}

pub(super) fn run_explore(args: ExploreArgs) -> Result<(), CliError> {
    let mut reader = io::stdin().lock();
    let mut writer = io::stdout().lock();
    let report = run_explore_with(args, &DefaultFeedBuilder, &mut reader, &mut writer)?;
    info!(
        "session ended after {} rounds with {} coins",
        report.rounds, report.coins
    );
    Ok(())
}

pub(super) fn run_explore_with(
    args: ExploreArgs,
    builder: &dyn FeedBuilder,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<ExploreReport, CliError> {
    let config = args.into_config()?;
    let mut feed = builder.build(&config)?;
    let mut session = Session::new(config.session)?;
    explore(&mut session, feed.as_mut(), config.max_rounds, reader, writer)
}

/// Drive rounds until the user quits, input ends, the round cap is reached
/// or the supplier runs dry.
pub(crate) fn explore(
    session: &mut Session,
    feed: &mut dyn CandidateFeed,
    max_rounds: Option<u64>,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<ExploreReport, CliError> {
    let mut rounds = 0_u64;
    loop {
        if max_rounds.is_some_and(|limit| rounds >= limit) {
            writeln!(writer, "Reached the round limit.").map_err(CliError::WriteOutput)?;
            break;
        }

        let batch = session.refresh(feed)?;
        if batch.is_empty() {
            writeln!(writer, "No candidates available.").map_err(CliError::WriteOutput)?;
            break;
        }
        render_batch(writer, batch).map_err(CliError::WriteOutput)?;

        let Some(liked) = prompt_for_likes(session, reader, writer)? else {
            break;
        };
        let outcome = session.submit(liked)?;
        rounds = rounds.saturating_add(1);
        render_outcome(writer, session, &outcome).map_err(CliError::WriteOutput)?;
    }

    let report = ExploreReport {
        rounds,
        coins: session.wallet().coins(),
    };
    writeln!(
        writer,
        "Session over after {} rounds with {} coins.",
        report.rounds, report.coins
    )
    .map_err(CliError::WriteOutput)?;
    Ok(report)
}

/// Read lines until one names the liked items; `None` means quit.
fn prompt_for_likes(
    session: &mut Session,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<Option<Vec<String>>, CliError> {
    loop {
        let Some(batch) = session.displayed() else {
            return Ok(None);
        };
        let len = batch.len();
        write!(writer, "Liked (1-{len}, empty for none, r redeem, q quit)> ")
            .and_then(|()| writer.flush())
            .map_err(CliError::WriteOutput)?;

        let mut line = String::new();
        let read = reader.read_line(&mut line).map_err(CliError::ReadInput)?;
        if read == 0 {
            return Ok(None);
        }

        match parse_round_input(&line, len) {
            Ok(RoundInput::Quit) => return Ok(None),
            Ok(RoundInput::Likes(positions)) => return Ok(Some(liked_ids(batch, &positions))),
            Ok(RoundInput::Redeem) => {
                let message = match session.redeem_background() {
                    Ok(theme) => {
                        let tags: Vec<&str> = theme.tags.iter().map(|tag| tag.as_str()).collect();
                        format!("Background unlocked: {}", tags.join(", "))
                    }
                    Err(err) => format!("Cannot redeem: {err}"),
                };
                writeln!(writer, "{message}").map_err(CliError::WriteOutput)?;
            }
            Err(err) => writeln!(writer, "{err}").map_err(CliError::WriteOutput)?,
        }
    }
}

fn liked_ids(batch: &Batch, positions: &[usize]) -> Vec<String> {
    positions
        .iter()
        .filter_map(|position| batch.items().get(*position))
        .map(|item| item.id().to_owned())
        .collect()
}

fn render_batch(writer: &mut dyn Write, batch: &Batch) -> io::Result<()> {
    writeln!(writer, "Round {}", batch.round())?;
    for (number, item) in (1_usize..).zip(batch.items()) {
        let tags: Vec<&str> = item.tags().iter().map(|tag| tag.as_str()).collect();
        let marker = if batch.exploration() == Some(item.id()) {
            " [explore]"
        } else {
            ""
        };
        writeln!(
            writer,
            "{number:>3}. {}  {}{marker}",
            tags.join(", "),
            item.url()
        )?;
    }
    Ok(())
}

fn render_outcome(
    writer: &mut dyn Write,
    session: &Session,
    outcome: &RoundOutcome,
) -> io::Result<()> {
    let config = session.config();
    if outcome.coin_awarded {
        writeln!(writer, "Coin earned! Balance: {}", outcome.coins)?;
    } else {
        writeln!(
            writer,
            "No coin this round (liked {}, target {}). Balance: {}",
            outcome.summary.liked_count(),
            config.reward.expected_likes(config.scorer.batch_size),
            outcome.coins
        )?;
    }

    let top: Vec<String> = session
        .top_tags(REPORTED_TAGS)
        .into_iter()
        .map(|(tag, score)| format!("{tag} ({score:.2})"))
        .collect();
    if top.is_empty() {
        writeln!(writer, "Top tags: none yet")
    } else {
        writeln!(writer, "Top tags: {}", top.join(", "))
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ExploreConfig, CliError> {
    let merged = ExploreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ExploreConfig::try_from(merged)
}
