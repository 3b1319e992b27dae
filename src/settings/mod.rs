//! Game settings: the persisted record and the aggregator that edits it.

mod aggregator;
mod error;
mod game_settings;
mod time_limit;

pub use aggregator::{GameStart, MIN_PLAYERS, SettingsAggregator};
pub use error::SettingsError;
pub use game_settings::GameSettings;
pub use time_limit::TimeLimit;
