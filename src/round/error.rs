//! Round errors.

use derive_more::{Display, Error};

use crate::roster::PlayerId;
use crate::round::Phase;
use crate::store::{StoreError, StoreKey};

/// Why a round operation was refused.
///
/// A refused operation never changes the round.
#[derive(Debug, Clone, Display, Error)]
pub enum RoundError {
    /// The operation belongs to another phase.
    #[display("Not allowed during {} (needs {})", actual, expected)]
    WrongPhase {
        /// Phase the operation needs.
        expected: Phase,
        /// Phase the round is in.
        actual: Phase,
    },
    /// The current player has not looked at their card yet.
    #[display("Reveal your card first")]
    NotRevealed,
    /// No candidate is staged.
    #[display("Please select a player to vote for")]
    NoVoteSelected,
    /// The candidate is the voter or not in the round.
    #[display("{} cannot be voted for", id)]
    InvalidCandidate {
        /// Rejected candidate.
        id: PlayerId,
    },
    /// The spy was found, or revealing the spy is switched off.
    #[display("The spy cannot be revealed for this round")]
    SpyRevealUnavailable,
    /// Too few players for a round.
    #[display("At least {} players are needed (have {})", required, actual)]
    NotEnoughPlayers {
        /// Minimum roster size.
        required: usize,
        /// Roster size.
        actual: usize,
    },
    /// The drawn spy is not part of the roster.
    #[display("Spy {} is not in the roster", id)]
    SpyNotInRoster {
        /// Spy id from the stored record.
        id: PlayerId,
    },
    /// A record needed to build the round is absent.
    #[display("No '{}' record stored", key)]
    MissingRecord {
        /// Missing key.
        key: StoreKey,
    },
    /// A record could not be read.
    #[display("Failed to read round setup: {}", _0)]
    Store(StoreError),
}

impl From<StoreError> for RoundError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}
