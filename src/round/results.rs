//! Tallying votes into an outcome.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, instrument};

use crate::roster::Player;

/// How a tie for most votes is settled.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TieBreak {
    /// The tied player earliest in turn order is accused.
    #[default]
    FirstInOrder,
    /// Nobody is accused, so the spy escapes.
    SpyEscapes,
}

/// Who won the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Outcome {
    /// The accused player is the spy.
    #[strum(to_string = "Spy found!")]
    SpyFound,
    /// The accused player is innocent, or nobody was accused.
    #[strum(to_string = "The spy wins!")]
    SpyWins,
}

/// The tally at the end of voting.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct RoundResults {
    accused: Option<Player>,
    spy: Player,
    outcome: Outcome,
    tied: Vec<Player>,
    total_votes: u32,
}

impl RoundResults {
    /// Tallies `players`, which must be in turn order.
    ///
    /// With several players sharing the top count, `tie_break` decides who
    /// (if anyone) is accused. A round where nobody received a vote accuses
    /// nobody.
    #[instrument(skip(players, spy), fields(players = players.len(), spy = %spy.id()))]
    pub fn tally(players: &[Player], spy: &Player, tie_break: TieBreak) -> Self {
        let total_votes = players.iter().map(|p| *p.vote_count()).sum();
        let top = players.iter().map(|p| *p.vote_count()).max().unwrap_or(0);
        let tied: Vec<Player> = if top == 0 {
            Vec::new()
        } else {
            players
                .iter()
                .filter(|p| *p.vote_count() == top)
                .cloned()
                .collect()
        };

        let accused = match (tied.as_slice(), tie_break) {
            ([], _) => None,
            ([only], _) => Some(only.clone()),
            ([first, ..], TieBreak::FirstInOrder) => Some(first.clone()),
            (_, TieBreak::SpyEscapes) => None,
        };
        let outcome = match &accused {
            Some(player) if player.id() == spy.id() => Outcome::SpyFound,
            _ => Outcome::SpyWins,
        };
        debug!(
            top,
            tied = tied.len(),
            accused = ?accused.as_ref().map(|p| p.id().clone()),
            %outcome,
            "Votes tallied"
        );
        Self {
            accused,
            spy: spy.clone(),
            outcome,
            tied: if tied.len() > 1 { tied } else { Vec::new() },
            total_votes,
        }
    }

    /// Returns `true` when more than one player shared the top count.
    pub fn is_tie(&self) -> bool {
        !self.tied.is_empty()
    }
}
