//! Built-in reference data with simulated latency.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, instrument};

use crate::catalog::{Attribution, ProviderError, Universe, UniverseProvider, UniversesResponse, World};

/// Default artificial latency, matching a typical network round trip.
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(500);

/// Provider serving a fixed catalog after an artificial delay.
#[derive(Debug, Clone)]
pub struct MockUniverseProvider {
    universes: Vec<Universe>,
    delay: Duration,
}

impl MockUniverseProvider {
    /// Creates a provider with the built-in catalog and the default delay.
    #[instrument]
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_MOCK_DELAY)
    }

    /// Creates a provider with the built-in catalog and a custom delay.
    #[instrument]
    pub fn with_delay(delay: Duration) -> Self {
        info!(delay_ms = delay.as_millis() as u64, "Creating MockUniverseProvider");
        Self {
            universes: builtin_catalog(),
            delay,
        }
    }

    /// Creates a provider serving `universes` with no delay.
    pub fn from_universes(universes: Vec<Universe>) -> Self {
        Self {
            universes,
            delay: Duration::ZERO,
        }
    }
}

impl Default for MockUniverseProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl UniverseProvider for MockUniverseProvider {
    #[instrument(skip(self))]
    async fn get_universes(&self) -> Result<UniversesResponse, ProviderError> {
        sleep(self.delay).await;
        debug!(count = self.universes.len(), "Serving mock universes");
        Ok(UniversesResponse::new(self.universes.clone()))
    }

    #[instrument(skip(self))]
    async fn get_worlds_by_universe(&self, universe: &str) -> Result<Vec<World>, ProviderError> {
        sleep(self.delay).await;
        let worlds = self
            .universes
            .iter()
            .find(|u| u.name() == universe)
            .map(|u| u.worlds().clone())
            .unwrap_or_default();
        debug!(count = worlds.len(), "Serving mock worlds");
        Ok(worlds)
    }
}

fn builtin_catalog() -> Vec<Universe> {
    vec![
        Universe::new(
            "Games",
            vec![
                World::new(
                    "Red Dead Redemption",
                    "RDR",
                    "Western",
                    Attribution::Developer("Rockstar Games".into()),
                ),
                World::new(
                    "Assassin's Creed",
                    "AC",
                    "Action-Adventure",
                    Attribution::Developer("Ubisoft".into()),
                ),
                World::new(
                    "Grand Theft Auto",
                    "GTA",
                    "Open World",
                    Attribution::Developer("Rockstar Games".into()),
                ),
            ],
        ),
        Universe::new(
            "Movie",
            vec![
                World::new(
                    "Marvel Cinematic Universe",
                    "MCU",
                    "Superhero",
                    Attribution::Studio("Marvel Studios".into()),
                ),
                World::new("Star Wars", "SW", "Sci-Fi", Attribution::Studio("Lucasfilm".into())),
            ],
        ),
        Universe::new(
            "TV Show",
            vec![
                World::new("Game of Thrones", "GoT", "Fantasy", Attribution::Network("HBO".into())),
                World::new(
                    "Stranger Things",
                    "ST",
                    "Sci-Fi Horror",
                    Attribution::Network("Netflix".into()),
                ),
            ],
        ),
    ]
}
