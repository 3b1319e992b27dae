//! Tests for the round state machine.

use std::sync::Arc;
use std::time::Duration;

use spyx_missions::{
    Avatar, CountdownTicker, GameSettings, MemoryStore, Outcome, Phase, Player, PlayerId, Round,
    RoundError, Secret, SpyReveal, StoreKey, TieBreak, TimeLimit, records,
};

fn players(names: &[&str]) -> Vec<Player> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Player::new(PlayerId::new(*name), *name, Avatar::Fedora, i))
        .collect()
}

fn settings(time_limit: u32, show_actual_spy: bool) -> GameSettings {
    GameSettings::new(
        "Movie",
        vec!["SW".to_string()],
        TimeLimit::new(time_limit),
        Vec::new(),
        true,
        show_actual_spy,
    )
}

fn new_round(names: &[&str], spy: &str, tie_break: TieBreak) -> Round {
    Round::new(
        players(names),
        PlayerId::new(spy),
        "Star Wars",
        &settings(300, true),
        tie_break,
    )
    .expect("Round setup failed")
}

/// Walks every player through the reveal phase.
fn finish_reveal(round: &mut Round) {
    while *round.phase() == Phase::Reveal {
        round.reveal().expect("Reveal failed");
        round.next_player().expect("Next failed");
    }
}

/// Casts one vote per voter, in turn order.
fn vote(round: &mut Round, ballots: &[&str]) {
    round.start_voting().expect("Start voting failed");
    for ballot in ballots {
        round
            .select_vote(&PlayerId::new(*ballot))
            .expect("Select failed");
        round.cast_vote().expect("Cast failed");
    }
}

#[test]
fn test_new_round_starts_in_reveal() {
    let round = new_round(&["A", "B", "C"], "B", TieBreak::FirstInOrder);
    assert_eq!(*round.phase(), Phase::Reveal);
    assert_eq!(round.current_player().map(|p| p.name().as_str()), Some("A"));
    assert_eq!(*round.remaining(), 300);
}

#[test]
fn test_round_needs_two_players_and_a_known_spy() {
    let result = Round::new(
        players(&["A"]),
        PlayerId::new("A"),
        "Star Wars",
        &settings(300, true),
        TieBreak::FirstInOrder,
    );
    assert!(matches!(
        result,
        Err(RoundError::NotEnoughPlayers {
            required: 2,
            actual: 1
        })
    ));

    let result = Round::new(
        players(&["A", "B"]),
        PlayerId::new("Z"),
        "Star Wars",
        &settings(300, true),
        TieBreak::FirstInOrder,
    );
    assert!(matches!(result, Err(RoundError::SpyNotInRoster { .. })));
}

#[test]
fn test_reveal_shows_world_or_spy_label() {
    let mut round = new_round(&["A", "B"], "B", TieBreak::FirstInOrder);
    assert_eq!(
        round.reveal().expect("Reveal failed"),
        Secret::World("Star Wars".to_string())
    );
    round.next_player().expect("Next failed");
    assert_eq!(round.reveal().expect("Reveal failed"), Secret::Spy);
}

#[test]
fn test_next_requires_reveal() {
    let mut round = new_round(&["A", "B"], "A", TieBreak::FirstInOrder);
    assert!(matches!(round.next_player(), Err(RoundError::NotRevealed)));
    assert_eq!(*round.current_index(), 0);
}

#[test]
fn test_card_fades_in_and_hides_on_next() {
    let mut round = new_round(&["A", "B"], "A", TieBreak::FirstInOrder);
    round.reveal().expect("Reveal failed");
    assert_eq!(round.world_reveal().opacity(), 0.0);
    round.advance_animations(Duration::from_millis(500));
    assert_eq!(round.world_reveal().opacity(), 1.0);

    round.next_player().expect("Next failed");
    assert!(!round.world_reveal().is_shown());
}

#[test]
fn test_last_reveal_starts_countdown() {
    let mut round = new_round(&["A", "B", "C"], "A", TieBreak::FirstInOrder);
    finish_reveal(&mut round);
    assert_eq!(*round.phase(), Phase::Countdown);
    assert!(round.current_player().is_none());
}

#[test]
fn test_countdown_stops_at_zero_without_advancing() {
    let mut round = Round::new(
        players(&["A", "B"]),
        PlayerId::new("A"),
        "Star Wars",
        &settings(30, true),
        TieBreak::FirstInOrder,
    )
    .expect("Round setup failed");
    assert_eq!(round.tick_second(), 30, "Ticks before countdown are ignored");

    finish_reveal(&mut round);
    round.tick_second();
    assert_eq!(round.remaining_display(), "0:29");
    for _ in 0..40 {
        round.tick_second();
    }
    assert_eq!(*round.remaining(), 0);
    assert_eq!(*round.phase(), Phase::Countdown);
}

#[test]
fn test_voting_candidates_exclude_voter() {
    let mut round = new_round(&["A", "B", "C"], "A", TieBreak::FirstInOrder);
    finish_reveal(&mut round);
    round.start_voting().expect("Start voting failed");
    let candidates: Vec<&str> = round
        .candidates()
        .iter()
        .map(|p| p.name().as_str())
        .collect();
    assert_eq!(candidates, vec!["B", "C"]);
}

#[test]
fn test_self_vote_and_empty_cast_rejected() {
    let mut round = new_round(&["A", "B"], "A", TieBreak::FirstInOrder);
    finish_reveal(&mut round);
    round.start_voting().expect("Start voting failed");

    assert!(matches!(
        round.select_vote(&PlayerId::new("A")),
        Err(RoundError::InvalidCandidate { .. })
    ));
    assert!(matches!(round.cast_vote(), Err(RoundError::NoVoteSelected)));
    assert_eq!(round.vote_total(), 0);
}

#[test]
fn test_operations_check_phase() {
    let mut round = new_round(&["A", "B"], "A", TieBreak::FirstInOrder);
    assert!(matches!(
        round.start_voting(),
        Err(RoundError::WrongPhase {
            expected: Phase::Countdown,
            actual: Phase::Reveal
        })
    ));
    assert!(round.results().is_none());
}

#[test]
fn test_every_voter_casts_one_vote() {
    let mut round = new_round(&["A", "B", "C"], "C", TieBreak::FirstInOrder);
    finish_reveal(&mut round);
    vote(&mut round, &["C", "C", "A"]);
    assert_eq!(*round.phase(), Phase::Results);
    assert_eq!(round.vote_total(), 3);
    assert_eq!(*round.votes_cast(), 3);
}

#[test]
fn test_majority_on_spy_finds_spy() {
    let mut round = new_round(&["A", "B", "C"], "C", TieBreak::FirstInOrder);
    finish_reveal(&mut round);
    vote(&mut round, &["C", "C", "A"]);

    let results = round.results().expect("No results");
    assert_eq!(results.accused().as_ref().map(|p| p.name().as_str()), Some("C"));
    assert_eq!(*results.outcome(), Outcome::SpyFound);
    assert!(!round.can_reveal_spy());
    assert!(matches!(
        round.begin_spy_reveal(),
        Err(RoundError::SpyRevealUnavailable)
    ));
}

#[test]
fn test_majority_on_innocent_lets_spy_win() {
    let mut round = new_round(&["A", "B", "C"], "B", TieBreak::FirstInOrder);
    finish_reveal(&mut round);
    vote(&mut round, &["C", "C", "A"]);

    let results = round.results().expect("No results");
    assert_eq!(results.accused().as_ref().map(|p| p.name().as_str()), Some("C"));
    assert_eq!(*results.outcome(), Outcome::SpyWins);
    assert_eq!(results.spy().name(), "B");
}

#[test]
fn test_tie_first_in_order_accuses_earliest() {
    let mut round = new_round(&["A", "B", "C"], "A", TieBreak::FirstInOrder);
    finish_reveal(&mut round);
    vote(&mut round, &["B", "C", "A"]);

    let results = round.results().expect("No results");
    assert!(results.is_tie());
    assert_eq!(results.accused().as_ref().map(|p| p.name().as_str()), Some("A"));
    assert_eq!(*results.outcome(), Outcome::SpyFound);
}

#[test]
fn test_tie_spy_escapes_accuses_nobody() {
    let mut round = new_round(&["A", "B", "C"], "A", TieBreak::SpyEscapes);
    finish_reveal(&mut round);
    vote(&mut round, &["B", "C", "A"]);

    let results = round.results().expect("No results");
    assert!(results.accused().is_none());
    assert_eq!(*results.outcome(), Outcome::SpyWins);
}

#[test]
fn test_spy_reveal_sequence() {
    let mut round = new_round(&["A", "B", "C"], "B", TieBreak::FirstInOrder);
    finish_reveal(&mut round);
    vote(&mut round, &["C", "C", "A"]);
    assert!(round.can_reveal_spy());

    round.begin_spy_reveal().expect("Reveal failed");
    assert!(matches!(round.spy_reveal(), SpyReveal::FadingOut { .. }));

    round.advance_animations(Duration::from_millis(500));
    assert!(round.spy_reveal().shows_spy());
    round.advance_animations(Duration::from_millis(1500));
    assert!(round.spy_reveal().is_settled());
    assert_eq!(round.spy_reveal().opacity(), 1.0);
}

#[test]
fn test_spy_reveal_respects_setting() {
    let mut round = Round::new(
        players(&["A", "B", "C"]),
        PlayerId::new("B"),
        "Star Wars",
        &settings(300, false),
        TieBreak::FirstInOrder,
    )
    .expect("Round setup failed");
    finish_reveal(&mut round);
    vote(&mut round, &["C", "C", "A"]);
    assert!(matches!(
        round.begin_spy_reveal(),
        Err(RoundError::SpyRevealUnavailable)
    ));
}

#[test]
fn test_load_builds_round_from_records() {
    let store = Arc::new(MemoryStore::new());
    let roster = players(&["A", "B", "C"]);
    records::save(&*store, StoreKey::Players, &roster).expect("Save failed");
    records::save(&*store, StoreKey::SelectedPlayer, &roster[1]).expect("Save failed");
    records::save(&*store, StoreKey::SelectedWorld, "Star Wars").expect("Save failed");
    records::save(&*store, StoreKey::GameSettings, &settings(120, true)).expect("Save failed");

    let round = Round::load(&*store, TieBreak::FirstInOrder).expect("Load failed");
    assert!(round.is_spy(&PlayerId::new("B")));
    assert_eq!(round.world(), "Star Wars");
    assert_eq!(*round.remaining(), 120);
}

#[test]
fn test_load_without_records_fails() {
    let store = MemoryStore::new();
    let result = Round::load(&store, TieBreak::FirstInOrder);
    assert!(matches!(
        result,
        Err(RoundError::MissingRecord {
            key: StoreKey::Players
        })
    ));
}

#[tokio::test]
async fn test_countdown_ticker_delivers_ticks() {
    let mut ticker = CountdownTicker::with_period(Duration::from_millis(20));
    assert!(ticker.next().await);
    tokio::time::sleep(Duration::from_millis(70)).await;
    assert!(ticker.drain() >= 1);
    assert_eq!(ticker.drain(), 0);
}

#[tokio::test]
async fn test_countdown_ticker_with_zero_period_still_ticks() {
    let mut ticker = CountdownTicker::with_period(Duration::ZERO);
    assert!(ticker.next().await);
    assert!(ticker.next().await);
}
