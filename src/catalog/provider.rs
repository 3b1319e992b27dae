//! Reference data provider trait.

use crate::catalog::{UniversesResponse, World};

location_error!(
    /// Reference data could not be fetched.
    ProviderError,
    "Failed to fetch reference data"
);

impl From<reqwest::Error> for ProviderError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("HTTP error: {}", err))
    }
}

/// Source of universes and worlds.
///
/// Passed explicitly to whoever needs reference data, so tests can swap in
/// their own implementation.
#[async_trait::async_trait]
pub trait UniverseProvider: Send + Sync + std::fmt::Debug {
    /// Lists every universe with its worlds.
    async fn get_universes(&self) -> Result<UniversesResponse, ProviderError>;

    /// Lists the worlds of one universe. Unknown universes yield no worlds.
    async fn get_worlds_by_universe(&self, universe: &str) -> Result<Vec<World>, ProviderError>;
}
