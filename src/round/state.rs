//! The round itself.

use std::time::Duration;

use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};

use crate::roster::{Player, PlayerId, renumber};
use crate::round::{
    Outcome, Phase, RoundError, RoundResults, Secret, SpyReveal, TieBreak, WorldReveal,
    format_time,
};
use crate::settings::{GameSettings, MIN_PLAYERS};
use crate::store::{self, KeyValueStore, StoreKey};

/// One round over a fixed roster, a spy and a world.
///
/// Every operation checks the phase first and leaves the round untouched
/// when it refuses.
#[derive(Debug, Clone, Getters)]
pub struct Round {
    players: Vec<Player>,
    spy: PlayerId,
    world: String,
    phase: Phase,
    current_index: usize,
    world_reveal: WorldReveal,
    remaining: u32,
    selected_vote: Option<PlayerId>,
    votes_cast: u32,
    show_vote_count: bool,
    show_actual_spy: bool,
    tie_break: TieBreak,
    spy_reveal: SpyReveal,
}

impl Round {
    /// Creates a round in the reveal phase, starting with the first player.
    ///
    /// Players are put in turn order and their vote counts cleared.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError`] if there are too few players or the spy is not
    /// one of them.
    #[instrument(skip(players, spy, settings), fields(players = players.len(), spy = %spy))]
    pub fn new(
        mut players: Vec<Player>,
        spy: PlayerId,
        world: impl Into<String> + std::fmt::Debug,
        settings: &GameSettings,
        tie_break: TieBreak,
    ) -> Result<Self, RoundError> {
        if players.len() < MIN_PLAYERS {
            return Err(RoundError::NotEnoughPlayers {
                required: MIN_PLAYERS,
                actual: players.len(),
            });
        }
        if !players.iter().any(|p| p.id() == &spy) {
            return Err(RoundError::SpyNotInRoster { id: spy });
        }
        players.sort_by_key(|p| *p.order());
        renumber(&mut players);
        players.iter_mut().for_each(Player::reset_votes);

        let round = Self {
            players,
            spy,
            world: world.into(),
            phase: Phase::Reveal,
            current_index: 0,
            world_reveal: WorldReveal::Hidden,
            remaining: settings.time_limit().seconds(),
            selected_vote: None,
            votes_cast: 0,
            show_vote_count: *settings.show_vote_count(),
            show_actual_spy: *settings.show_actual_spy(),
            tie_break,
            spy_reveal: SpyReveal::Hidden,
        };
        info!(world = %round.world, "Round created");
        Ok(round)
    }

    /// Builds a round from the stored roster, spy, world and settings.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError::MissingRecord`] if any record is absent, or the
    /// errors of [`Round::new`].
    #[instrument(skip(store))]
    pub fn load(store: &dyn KeyValueStore, tie_break: TieBreak) -> Result<Self, RoundError> {
        let players: Vec<Player> = require(store, StoreKey::Players)?;
        let spy: Player = require(store, StoreKey::SelectedPlayer)?;
        let world: String = require(store, StoreKey::SelectedWorld)?;
        let settings: GameSettings = require(store, StoreKey::GameSettings)?;
        Self::new(players, spy.id().clone(), world, &settings, tie_break)
    }

    // ─────────────────────────────────────────────────────────────
    //  Queries
    // ─────────────────────────────────────────────────────────────

    /// Returns the player whose turn it is, during Reveal and Voting.
    pub fn current_player(&self) -> Option<&Player> {
        match self.phase {
            Phase::Reveal | Phase::Voting => self.players.get(self.current_index),
            Phase::Countdown | Phase::Results => None,
        }
    }

    /// Returns `true` if `id` is the spy.
    pub fn is_spy(&self, id: &PlayerId) -> bool {
        &self.spy == id
    }

    /// Returns the spy's roster entry.
    pub fn spy_player(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == &self.spy)
    }

    /// Returns what the current player's card shows once revealed.
    pub fn secret(&self) -> Option<Secret> {
        let player = self.current_player()?;
        if self.phase != Phase::Reveal {
            return None;
        }
        Some(if self.is_spy(player.id()) {
            Secret::Spy
        } else {
            Secret::World(self.world.clone())
        })
    }

    /// Returns `true` when the current player is the last in turn order.
    pub fn is_last_player(&self) -> bool {
        self.current_index + 1 == self.players.len()
    }

    /// Returns the remaining discussion time as `m:ss`.
    pub fn remaining_display(&self) -> String {
        format_time(self.remaining)
    }

    /// Returns everyone the current voter may vote for, in turn order.
    pub fn candidates(&self) -> Vec<&Player> {
        if self.phase != Phase::Voting {
            return Vec::new();
        }
        self.players
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != self.current_index)
            .map(|(_, player)| player)
            .collect()
    }

    /// Returns the sum of every player's vote count.
    pub fn vote_total(&self) -> u32 {
        self.players.iter().map(|p| *p.vote_count()).sum()
    }

    /// Tallies the votes. Only available in the results phase.
    pub fn results(&self) -> Option<RoundResults> {
        if self.phase != Phase::Results {
            return None;
        }
        let spy = self.spy_player()?;
        Some(RoundResults::tally(&self.players, spy, self.tie_break))
    }

    /// Returns `true` when the real spy may be revealed.
    pub fn can_reveal_spy(&self) -> bool {
        self.show_actual_spy
            && self
                .results()
                .is_some_and(|r| *r.outcome() == Outcome::SpyWins)
    }

    // ─────────────────────────────────────────────────────────────
    //  Reveal
    // ─────────────────────────────────────────────────────────────

    /// Shows the current player's card. Revealing twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError::WrongPhase`] outside the reveal phase.
    #[instrument(skip(self), fields(index = self.current_index))]
    pub fn reveal(&mut self) -> Result<Secret, RoundError> {
        self.expect_phase(Phase::Reveal)?;
        if !self.world_reveal.is_shown() {
            self.world_reveal = WorldReveal::Shown {
                elapsed: Duration::ZERO,
            };
            debug!("Card revealed");
        }
        self.secret().ok_or(RoundError::WrongPhase {
            expected: Phase::Reveal,
            actual: self.phase,
        })
    }

    /// Hides the card and passes the device on. After the last player the
    /// countdown begins.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError`] outside the reveal phase or before the current
    /// player has revealed.
    #[instrument(skip(self), fields(index = self.current_index))]
    pub fn next_player(&mut self) -> Result<Phase, RoundError> {
        self.expect_phase(Phase::Reveal)?;
        if !self.world_reveal.is_shown() {
            return Err(RoundError::NotRevealed);
        }
        self.world_reveal = WorldReveal::Hidden;
        if self.is_last_player() {
            self.current_index = 0;
            self.phase = Phase::Countdown;
            info!(remaining = self.remaining, "Everyone has seen their card, countdown started");
        } else {
            self.current_index += 1;
            debug!(index = self.current_index, "Next player");
        }
        Ok(self.phase)
    }

    // ─────────────────────────────────────────────────────────────
    //  Countdown
    // ─────────────────────────────────────────────────────────────

    /// Takes one second off the clock. Stops at zero and never ends the
    /// phase on its own. Outside the countdown this does nothing.
    pub fn tick_second(&mut self) -> u32 {
        if self.phase == Phase::Countdown && self.remaining > 0 {
            self.remaining -= 1;
            if self.remaining == 0 {
                info!("Time is up");
            }
        }
        self.remaining
    }

    /// Ends the discussion and hands the device to the first voter.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError::WrongPhase`] outside the countdown.
    #[instrument(skip(self), fields(remaining = self.remaining))]
    pub fn start_voting(&mut self) -> Result<(), RoundError> {
        self.expect_phase(Phase::Countdown)?;
        self.current_index = 0;
        self.selected_vote = None;
        self.phase = Phase::Voting;
        info!("Voting started");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Voting
    // ─────────────────────────────────────────────────────────────

    /// Stages a vote for `id`, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError`] outside voting, or if `id` is the voter or not
    /// in the round.
    #[instrument(skip(self), fields(voter = self.current_index))]
    pub fn select_vote(&mut self, id: &PlayerId) -> Result<(), RoundError> {
        self.expect_phase(Phase::Voting)?;
        if !self.candidates().iter().any(|p| p.id() == id) {
            warn!(candidate = %id, "Rejected vote candidate");
            return Err(RoundError::InvalidCandidate { id: id.clone() });
        }
        self.selected_vote = Some(id.clone());
        debug!(candidate = %id, "Vote staged");
        Ok(())
    }

    /// Counts the staged vote and moves to the next voter. After the last
    /// voter the results are shown.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError`] outside voting or with no vote staged.
    #[instrument(skip(self), fields(voter = self.current_index))]
    pub fn cast_vote(&mut self) -> Result<Phase, RoundError> {
        self.expect_phase(Phase::Voting)?;
        let candidate = self.selected_vote.clone().ok_or(RoundError::NoVoteSelected)?;
        let Some(player) = self.players.iter_mut().find(|p| p.id() == &candidate) else {
            return Err(RoundError::InvalidCandidate { id: candidate });
        };
        player.add_vote();
        self.selected_vote = None;
        self.votes_cast += 1;
        debug!(candidate = %candidate, votes_cast = self.votes_cast, "Vote cast");

        if self.is_last_player() {
            self.phase = Phase::Results;
            info!(votes = self.votes_cast, "Voting finished");
        } else {
            self.current_index += 1;
        }
        Ok(self.phase)
    }

    // ─────────────────────────────────────────────────────────────
    //  Results
    // ─────────────────────────────────────────────────────────────

    /// Starts revealing the real spy after the spy escaped.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError`] outside results, when the spy was found, or
    /// when revealing is switched off.
    #[instrument(skip(self))]
    pub fn begin_spy_reveal(&mut self) -> Result<(), RoundError> {
        self.expect_phase(Phase::Results)?;
        if !self.can_reveal_spy() {
            return Err(RoundError::SpyRevealUnavailable);
        }
        if self.spy_reveal == SpyReveal::Hidden {
            self.spy_reveal = SpyReveal::FadingOut {
                elapsed: Duration::ZERO,
            };
            info!("Revealing the spy");
        }
        Ok(())
    }

    /// Advances the card fade and the spy reveal by `dt`.
    pub fn advance_animations(&mut self, dt: Duration) {
        self.world_reveal.advance(dt);
        self.spy_reveal.advance(dt);
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), RoundError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(RoundError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }
}

fn require<T: serde::de::DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: StoreKey,
) -> Result<T, RoundError> {
    store::load(store, key)?.ok_or(RoundError::MissingRecord { key })
}
