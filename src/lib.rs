//! SpyX Missions library - a pass-the-device "find the spy" party game
//!
//! Players take turns looking at a secret world on one shared device. One
//! of them is the spy and sees no world. After a timed discussion everyone
//! votes, and the most-voted player is revealed.
//!
//! # Architecture
//!
//! - **Flow**: which screen is active and the cross-fade between screens
//! - **Roster**: ordered players with add/edit/delete and drag-to-reorder
//! - **Round**: the reveal, countdown, voting and results state machine
//! - **Settings**: universe, worlds, time limit and display toggles
//! - **Catalog**: universe and world reference data behind a provider trait
//! - **Store**: JSON records in SQLite or in memory
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use spyx_missions::{Avatar, MemoryStore, MockUniverseProvider, RosterManager, SettingsAggregator};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = Arc::new(MemoryStore::new());
//! let mut roster = RosterManager::load(store.clone());
//! roster.add("Ada", Some(Avatar::Fox))?;
//! roster.add("Grace", Some(Avatar::Owl))?;
//!
//! let mut settings =
//!     SettingsAggregator::load(Arc::new(MockUniverseProvider::new()), store.clone()).await?;
//! settings.select_universe("Movie")?;
//! let start = settings.start_game(roster.players(), &mut rand::thread_rng())?;
//! println!("{} is the spy", start.spy().name());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
#[macro_use]
mod error;
mod catalog;
mod config;
mod flow;
mod roster;
mod round;
mod settings;
mod store;
mod tui;

// Crate-level exports - Configuration
pub use config::{
    AppConfig, ConfigError, DEFAULT_CONFIG_FILE, ProviderConfig, ProviderKind, RulesConfig,
    TimingConfig,
};

// Crate-level exports - Reference data
pub use catalog::{
    Attribution, HttpUniverseProvider, MockUniverseProvider, ProviderError, Universe,
    UniverseProvider, UniversesResponse, World,
};

// Crate-level exports - Screen flow
pub use flow::{DEFAULT_FADE, FlowController, ScreenId, Transition};

// Crate-level exports - Roster
pub use roster::{
    Avatar, DragOutcome, DragSession, DropTarget, GridLayout, MAX_NAME_LEN, Player, PlayerId,
    Pointer, RosterError, RosterManager,
};

// Crate-level exports - Round
pub use round::{
    CountdownTicker, Outcome, Phase, Round, RoundError, RoundResults, Secret, SpyReveal, TieBreak,
    WorldReveal, format_time,
};

// Crate-level exports - Settings
pub use settings::{
    GameSettings, GameStart, MIN_PLAYERS, SettingsAggregator, SettingsError, TimeLimit,
};

// Crate-level exports - Storage
pub use store::{KeyValueStore, KvEntry, MemoryStore, SqliteStore, StoreError, StoreKey};

// Crate-level exports - Terminal UI
pub use tui::{
    App, AppContext, AssetError, BACKDROP_COLOR, Backdrops, Screen, ScreenTransition,
    run as run_tui,
};

/// Typed record helpers over any [`KeyValueStore`].
pub mod records {
    pub use crate::store::{load, remove, save};
}
