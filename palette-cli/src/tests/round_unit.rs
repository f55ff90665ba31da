//! Unit tests for round input parsing and the interactive loop.

use super::CliError;
use super::helpers::{StubFeedBuilder, sample_items};
use crate::explore::{
    ExploreArgs, ExploreReport, InputError, RoundInput, explore, parse_round_input,
    run_explore_with,
};
use camino::Utf8PathBuf;
use palette_core::SourceError;
use palette_core::test_support::{FailingFeed, MemoryFeed};
use palette_scorer::{ScorerConfig, Session, SessionConfig, SessionError};
use rstest::rstest;
use std::io::Cursor;

#[rstest]
#[case::empty("", RoundInput::Likes(Vec::new()))]
#[case::blank("   \n", RoundInput::Likes(Vec::new()))]
#[case::single("2\n", RoundInput::Likes(vec![1]))]
#[case::several(" 3 1  2 ", RoundInput::Likes(vec![2, 0, 1]))]
#[case::quit("q\n", RoundInput::Quit)]
#[case::quit_word("quit", RoundInput::Quit)]
#[case::redeem("r\n", RoundInput::Redeem)]
fn parses_round_input(#[case] line: &str, #[case] expected: RoundInput) {
    assert_eq!(parse_round_input(line, 3), Ok(expected));
}

#[rstest]
#[case::zero("0", InputError::OutOfRange { index: 0, len: 3 })]
#[case::too_large("1 4", InputError::OutOfRange { index: 4, len: 3 })]
#[case::word("1 two", InputError::NotANumber("two".to_owned()))]
#[case::negative("-1", InputError::NotANumber("-1".to_owned()))]
fn rejects_invalid_round_input(#[case] line: &str, #[case] expected: InputError) {
    assert_eq!(parse_round_input(line, 3), Err(expected));
}

fn new_session(batch_size: usize) -> Session {
    let config = SessionConfig::default()
        .with_scorer(ScorerConfig::default().with_batch_size(batch_size));
    Session::new(config).expect("valid session config")
}

fn play(session: &mut Session, input: &str, max_rounds: Option<u64>) -> (u64, String) {
    let mut feed = MemoryFeed::with_items(sample_items());
    let mut reader = Cursor::new(input.as_bytes().to_vec());
    let mut output = Vec::new();
    let report = explore(session, &mut feed, max_rounds, &mut reader, &mut output)
        .expect("session should run");
    (
        report.rounds,
        String::from_utf8(output).expect("output is utf-8"),
    )
}

#[rstest]
fn prints_numbered_batch_and_learns_likes() {
    let mut session = new_session(2);
    let (rounds, output) = play(&mut session, "1\n", None);

    assert_eq!(rounds, 1);
    assert!(output.contains("Round 1"), "{output}");
    assert!(
        output.contains("  1. sea  https://images.example/a.jpg"),
        "{output}"
    );
    assert!(
        output.contains("  2. city  https://images.example/b.jpg"),
        "{output}"
    );
    assert!(output.contains("Top tags: sea (1.00)"), "{output}");
    assert_eq!(session.affinity().frequency("sea"), 1);
}

#[rstest]
fn end_of_input_quits_after_showing_the_next_round() {
    let mut session = new_session(5);
    let (rounds, output) = play(&mut session, "\n", None);

    assert_eq!(rounds, 1);
    assert!(output.contains("Round 2"), "{output}");
    assert!(output.contains("Top tags: none yet"), "{output}");
    assert!(
        output.contains("Session over after 1 rounds with 0 coins."),
        "{output}"
    );
}

#[rstest]
fn quitting_leaves_the_batch_unsubmitted() {
    let mut session = new_session(2);
    let (rounds, _) = play(&mut session, "q\n", None);

    assert_eq!(rounds, 0);
    assert!(session.affinity().is_empty());
    assert!(session.history().is_empty());
}

#[rstest]
fn matching_the_target_awards_a_coin() {
    let mut session = new_session(5);
    let (_, output) = play(&mut session, "1 2\n", Some(1));

    assert!(output.contains("Coin earned! Balance: 1"), "{output}");
    assert!(output.contains("Reached the round limit."), "{output}");
    assert_eq!(session.wallet().coins(), 1);
}

#[rstest]
fn missing_the_target_reports_it() {
    let mut session = new_session(5);
    let (_, output) = play(&mut session, "1\n", Some(1));

    assert!(
        output.contains("No coin this round (liked 1, target 2). Balance: 0"),
        "{output}"
    );
}

#[rstest]
fn invalid_input_prompts_again() {
    let mut session = new_session(2);
    let (rounds, output) = play(&mut session, "7\n2\n", Some(1));

    assert_eq!(rounds, 1);
    assert!(output.contains("7 is not between 1 and 2"), "{output}");
    assert_eq!(session.affinity().frequency("city"), 1);
}

#[rstest]
fn redeeming_without_coins_keeps_the_round_open() {
    let mut session = new_session(2);
    let (rounds, output) = play(&mut session, "r\n1\n", Some(1));

    assert_eq!(rounds, 1);
    assert!(
        output.contains("Cannot redeem: redeeming costs 3 coins but only 0 are available"),
        "{output}"
    );
    assert_eq!(session.affinity().frequency("sea"), 1);
}

#[rstest]
fn redeeming_with_enough_coins_unlocks_a_background() {
    let mut session = new_session(5);
    let (rounds, output) = play(&mut session, "1 2\n1 2\n1 2\nr\nq\n", None);

    assert_eq!(rounds, 3);
    assert!(output.contains("Coin earned! Balance: 3"), "{output}");
    assert!(output.contains("Background unlocked: "), "{output}");
    assert!(!output.contains("Cannot redeem"), "{output}");
    assert!(
        output.contains("Session over after 3 rounds with 0 coins."),
        "{output}"
    );
    assert_eq!(session.wallet().coins(), 0);
}

#[rstest]
fn empty_supply_ends_the_session() {
    let mut session = new_session(2);
    let mut feed = MemoryFeed::default();
    let mut reader = Cursor::new(Vec::new());
    let mut output = Vec::new();

    let report = explore(&mut session, &mut feed, None, &mut reader, &mut output)
        .expect("session should run");

    assert_eq!(report.rounds, 0);
    let printed = String::from_utf8(output).expect("output is utf-8");
    assert!(printed.contains("No candidates available."), "{printed}");
}

#[rstest]
fn supplier_failures_surface_as_session_errors() {
    let error = SourceError::NetworkError {
        url: "https://api.pexels.com/v1/search".to_owned(),
        message: "connection refused".to_owned(),
    };
    let mut session = new_session(2);
    let mut feed = FailingFeed::new(error.clone());
    let mut reader = Cursor::new(Vec::new());
    let mut output = Vec::new();

    let err = explore(&mut session, &mut feed, None, &mut reader, &mut output)
        .expect_err("feed failure should propagate");
    match err {
        CliError::Session(SessionError::Supply { source }) => assert_eq!(source, error),
        other => panic!("expected supply failure, found {other:?}"),
    }
}

#[rstest]
fn run_explore_with_drives_the_built_feed() {
    let args = ExploreArgs {
        candidates: Some(Utf8PathBuf::from("unused.json")),
        batch_size: Some(3),
        max_rounds: Some(2),
        ..ExploreArgs::default()
    };
    let builder = StubFeedBuilder {
        items: sample_items(),
    };
    let mut reader = Cursor::new(b"1\n2 3\n".to_vec());
    let mut output = Vec::new();

    let report = run_explore_with(args, &builder, &mut reader, &mut output)
        .expect("session should run");

    assert_eq!(report, ExploreReport { rounds: 2, coins: 1 });
    let printed = String::from_utf8(output).expect("output is utf-8");
    assert!(printed.contains("Round 2"), "{printed}");
}
