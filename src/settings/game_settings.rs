//! The persisted settings record.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

use crate::settings::TimeLimit;

/// Settings for the next round, stored under `gameSettings`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    universe: String,
    #[serde(default)]
    available_worlds: Vec<String>,
    #[serde(default)]
    time_limit: TimeLimit,
    #[serde(default)]
    selected_genres: Vec<String>,
    #[serde(default = "enabled")]
    show_vote_count: bool,
    #[serde(default = "enabled")]
    show_actual_spy: bool,
}

fn enabled() -> bool {
    true
}

impl GameSettings {
    /// Creates a settings record.
    pub fn new(
        universe: impl Into<String>,
        available_worlds: Vec<String>,
        time_limit: TimeLimit,
        selected_genres: Vec<String>,
        show_vote_count: bool,
        show_actual_spy: bool,
    ) -> Self {
        Self {
            universe: universe.into(),
            available_worlds,
            time_limit,
            selected_genres,
            show_vote_count,
            show_actual_spy,
        }
    }
}
