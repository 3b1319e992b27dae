//! Roster validation errors.

use derive_more::{Display, Error};

use crate::roster::{MAX_NAME_LEN, PlayerId};

/// Why a roster operation was refused.
///
/// Validation failures leave the roster untouched.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RosterError {
    /// The trimmed name was empty.
    #[display("Please enter a name")]
    EmptyName,
    /// The name exceeded [`MAX_NAME_LEN`] characters.
    #[display("Name must be {} characters or less (got {})", MAX_NAME_LEN, length)]
    NameTooLong {
        /// Character count of the rejected name.
        length: usize,
    },
    /// No avatar was chosen.
    #[display("Please select an avatar")]
    MissingAvatar,
    /// No player with this id exists.
    #[display("Unknown player '{}'", id)]
    UnknownPlayer {
        /// The id that was looked up.
        id: PlayerId,
    },
    /// A reorder target was outside the roster.
    #[display("Target slot {} is outside the roster of {}", index, len)]
    TargetOutOfRange {
        /// Requested slot.
        index: usize,
        /// Roster size.
        len: usize,
    },
}
