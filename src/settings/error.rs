//! Settings errors.

use derive_more::{Display, Error};

use crate::catalog::ProviderError;
use crate::store::StoreError;

/// Why a settings operation failed.
#[derive(Debug, Clone, Display, Error)]
pub enum SettingsError {
    /// Reference data could not be loaded.
    #[display("Failed to load data. Please try again. ({})", _0)]
    Load(ProviderError),
    /// No universe is selected.
    #[display("Please select a universe")]
    NoUniverseSelected,
    /// The universe is not in the reference data.
    #[display("Unknown universe '{}'", name)]
    UnknownUniverse {
        /// Requested universe name.
        name: String,
    },
    /// The world is not part of the selected universe.
    #[display("Unknown world '{}'", short_name)]
    UnknownWorld {
        /// Requested world short name.
        short_name: String,
    },
    /// The genre does not occur in the selected universe.
    #[display("Unknown genre '{}'", genre)]
    UnknownGenre {
        /// Requested genre.
        genre: String,
    },
    /// Every world has been switched off.
    #[display("Please select at least one world")]
    NoWorldsAvailable,
    /// Every available world is hidden by the genre filter.
    #[display("Every available world is excluded by the genre filter")]
    NoPlayableWorld,
    /// Not enough players to vote.
    #[display("At least {} players are needed (have {})", required, actual)]
    NotEnoughPlayers {
        /// Minimum roster size.
        required: usize,
        /// Current roster size.
        actual: usize,
    },
    /// The round setup could not be stored.
    #[display("Failed to start game: {}", _0)]
    Persist(StoreError),
}

impl From<ProviderError> for SettingsError {
    fn from(err: ProviderError) -> Self {
        Self::Load(err)
    }
}

impl From<StoreError> for SettingsError {
    fn from(err: StoreError) -> Self {
        Self::Persist(err)
    }
}
