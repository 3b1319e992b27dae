//! Universe and world records as served by the provider.

use derive_getters::Getters;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Who made a world: exactly one of developer, studio or network.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribution {
    /// Game developer.
    Developer(String),
    /// Film studio.
    Studio(String),
    /// TV network.
    Network(String),
}

/// A secret location players may be assigned.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    name: String,
    short_name: String,
    genre: String,
    #[serde(flatten)]
    attribution: Attribution,
}

impl World {
    /// Creates a world record.
    pub fn new(
        name: impl Into<String>,
        short_name: impl Into<String>,
        genre: impl Into<String>,
        attribution: Attribution,
    ) -> Self {
        Self {
            name: name.into(),
            short_name: short_name.into(),
            genre: genre.into(),
            attribution,
        }
    }
}

/// A themed group of worlds.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Universe {
    name: String,
    worlds: Vec<World>,
}

impl Universe {
    /// Creates a universe.
    pub fn new(name: impl Into<String>, worlds: Vec<World>) -> Self {
        Self {
            name: name.into(),
            worlds,
        }
    }

    /// Looks up a world by short name.
    pub fn world(&self, short_name: &str) -> Option<&World> {
        self.worlds.iter().find(|w| w.short_name == short_name)
    }

    /// Returns the short names of every world, in order.
    pub fn short_names(&self) -> Vec<String> {
        self.worlds.iter().map(|w| w.short_name.clone()).collect()
    }

    /// Returns the distinct genres, in first-seen order.
    pub fn genres(&self) -> Vec<String> {
        let mut genres: Vec<String> = Vec::new();
        for world in &self.worlds {
            if !genres.contains(&world.genre) {
                genres.push(world.genre.clone());
            }
        }
        genres
    }
}

/// Response body of the universe listing.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct UniversesResponse {
    universes: Vec<Universe>,
}

impl UniversesResponse {
    /// Wraps a universe list.
    pub fn new(universes: Vec<Universe>) -> Self {
        Self { universes }
    }

    /// Consumes the response, returning the universes.
    pub fn into_universes(self) -> Vec<Universe> {
        self.universes
    }
}
