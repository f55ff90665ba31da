//! Focused unit tests covering explore configuration resolution.

use super::*;
use crate::explore::{ExploreArgs, ExploreConfig, SupplyConfig, config_from_layers_for_test};
use camino::Utf8PathBuf;
use palette_data::ImageApi;
use palette_scorer::{DEFAULT_BATCH_SIZE, DEFAULT_POOL_SIZE, ScorerConfigError};
use rstest::rstest;

fn file_args() -> ExploreArgs {
    ExploreArgs {
        candidates: Some(Utf8PathBuf::from("candidates.json")),
        ..ExploreArgs::default()
    }
}

#[rstest]
fn converting_without_supply_errors() {
    let err = ExploreConfig::try_from(ExploreArgs::default()).expect_err("no supply configured");
    match err {
        CliError::MissingSupply {
            file_field,
            key_field,
            key_env,
        } => {
            assert_eq!(file_field, ARG_CANDIDATES);
            assert_eq!(key_field, ARG_API_KEY);
            assert_eq!(key_env, ENV_API_KEY);
        }
        other => panic!("expected MissingSupply, found {other:?}"),
    }
}

#[rstest]
fn candidate_file_applies_default_settings() {
    let config = ExploreConfig::try_from(file_args()).expect("config should build");
    match &config.supply {
        SupplyConfig::File(path) => assert_eq!(path.as_str(), "candidates.json"),
        other => panic!("expected file supply, found {other:?}"),
    }
    assert_eq!(config.session.scorer.batch_size, DEFAULT_BATCH_SIZE);
    assert_eq!(config.session.pool_size, DEFAULT_POOL_SIZE);
    assert_eq!(config.max_rounds, None);
    assert_eq!(config.seed, None);
}

#[rstest]
fn candidate_file_wins_over_api_key() {
    let args = ExploreArgs {
        api_key: Some("secret".to_owned()),
        ..file_args()
    };
    let config = ExploreConfig::try_from(args).expect("config should build");
    assert!(matches!(config.supply, SupplyConfig::File(_)));
}

#[rstest]
#[case::default_provider(None, ImageApi::Pexels)]
#[case::unsplash(Some(ImageApi::Unsplash), ImageApi::Unsplash)]
fn api_key_selects_remote_supply(#[case] provider: Option<ImageApi>, #[case] expected: ImageApi) {
    let args = ExploreArgs {
        api_key: Some("secret".to_owned()),
        provider,
        ..ExploreArgs::default()
    };
    let config = ExploreConfig::try_from(args).expect("config should build");
    match config.supply {
        SupplyConfig::Remote(http) => {
            assert_eq!(http.api, expected);
            assert_eq!(http.api_key, "secret");
            assert_eq!(http.base_url, expected.default_base_url());
        }
        other => panic!("expected remote supply, found {other:?}"),
    }
}

#[rstest]
fn overrides_reach_the_session_settings() {
    let args = ExploreArgs {
        batch_size: Some(6),
        exploration_interval: Some(3),
        decay_rate: Some(0.5),
        pool_size: Some(20),
        max_rounds: Some(4),
        seed: Some(9),
        ..file_args()
    };
    let config = ExploreConfig::try_from(args).expect("config should build");
    assert_eq!(config.session.scorer.batch_size, 6);
    assert_eq!(config.session.scorer.exploration_interval, 3);
    assert_eq!(config.session.scorer.decay_rate, 0.5);
    assert_eq!(config.session.pool_size, 20);
    assert_eq!(config.max_rounds, Some(4));
    assert_eq!(config.seed, Some(9));
}

#[rstest]
#[case::zero_batch(ExploreArgs { batch_size: Some(0), ..file_args() }, ScorerConfigError::ZeroBatchSize)]
#[case::zero_interval(
    ExploreArgs { exploration_interval: Some(0), ..file_args() },
    ScorerConfigError::ZeroExplorationInterval
)]
#[case::decay_of_one(
    ExploreArgs { decay_rate: Some(1.0), ..file_args() },
    ScorerConfigError::InvalidDecayRate { value: 1.0 }
)]
#[case::zero_pool(ExploreArgs { pool_size: Some(0), ..file_args() }, ScorerConfigError::ZeroPoolSize)]
fn invalid_settings_are_rejected(#[case] args: ExploreArgs, #[case] expected: ScorerConfigError) {
    let err = ExploreConfig::try_from(args).expect_err("settings should be rejected");
    match err {
        CliError::InvalidSettings(source) => assert_eq!(source, expected),
        other => panic!("expected InvalidSettings, found {other:?}"),
    }
}

#[rstest]
fn explore_arguments_parse_from_the_command_line() {
    let cli = Cli::try_parse_from([
        "palette",
        "explore",
        "--provider",
        "unsplash",
        "--api-key",
        "secret",
        "--batch-size",
        "8",
        "--max-rounds",
        "2",
    ])
    .expect("arguments should parse");
    let Command::Explore(args) = cli.command;
    assert_eq!(args.provider, Some(ImageApi::Unsplash));
    assert_eq!(args.api_key.as_deref(), Some("secret"));
    assert_eq!(args.batch_size, Some(8));
    assert_eq!(args.max_rounds, Some(2));
}

#[rstest]
fn unknown_provider_fails_to_parse() {
    let err = Cli::try_parse_from(["palette", "explore", "--provider", "flickr"])
        .expect_err("unknown provider should be rejected");
    assert!(err.to_string().contains("flickr"));
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "batch_size": "twelve" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "candidates": "from-file.json",
            "batch_size": 4,
            "decay_rate": 0.8,
        }),
        None,
    );
    composer.push_environment(json!({
        "candidates": "from-env.json",
        "batch_size": 6,
    }));
    composer.push_cli(json!({
        "batch_size": 9,
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    match &config.supply {
        SupplyConfig::File(path) => assert_eq!(path.as_str(), "from-env.json"),
        other => panic!("expected file supply, found {other:?}"),
    }
    assert_eq!(config.session.scorer.batch_size, 9);
    assert_eq!(config.session.scorer.decay_rate, 0.8);
}
