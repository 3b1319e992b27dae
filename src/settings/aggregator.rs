//! Settings aggregator: reference data plus the editable settings record.

use std::sync::Arc;

use derive_getters::Getters;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, instrument, warn};

use crate::catalog::{Universe, UniverseProvider, World};
use crate::roster::Player;
use crate::settings::{GameSettings, SettingsError, TimeLimit};
use crate::store::{self, KeyValueStore, StoreKey};

/// Smallest roster that can play: every voter needs someone else to vote for.
pub const MIN_PLAYERS: usize = 2;

/// The records written when a round is prepared.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GameStart {
    spy: Player,
    world: World,
    settings: GameSettings,
}

/// Holds the reference data and the settings being edited.
///
/// Every change is written straight back to the store while a universe is
/// selected. Writes are not coalesced; the last one wins.
#[derive(Debug, Getters)]
pub struct SettingsAggregator {
    #[getter(skip)]
    provider: Arc<dyn UniverseProvider>,
    #[getter(skip)]
    store: Arc<dyn KeyValueStore>,
    universes: Vec<Universe>,
    selected_universe: Option<String>,
    available_worlds: Vec<String>,
    time_limit: TimeLimit,
    selected_genres: Vec<String>,
    show_vote_count: bool,
    show_actual_spy: bool,
}

impl SettingsAggregator {
    /// Fetches universes and the stored settings concurrently, then validates
    /// the stored selection against the fresh reference data.
    ///
    /// An unreadable settings record is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] if the reference data cannot be fetched.
    #[instrument(skip(provider, store))]
    pub async fn load(
        provider: Arc<dyn UniverseProvider>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, SettingsError> {
        info!("Loading settings and reference data");
        let (universes, stored) = tokio::join!(provider.get_universes(), async {
            store::load::<GameSettings>(store.as_ref(), StoreKey::GameSettings)
        });
        let universes = universes?.into_universes();
        let stored = stored.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read stored settings, using defaults");
            None
        });

        let mut aggregator = Self {
            provider,
            store,
            universes,
            selected_universe: None,
            available_worlds: Vec::new(),
            time_limit: TimeLimit::default(),
            selected_genres: Vec::new(),
            show_vote_count: true,
            show_actual_spy: true,
        };
        if let Some(stored) = stored {
            aggregator.restore(stored);
        }
        info!(
            universes = aggregator.universes.len(),
            selected = ?aggregator.selected_universe,
            "Settings ready"
        );
        Ok(aggregator)
    }

    /// Applies a stored record, dropping anything the reference data no
    /// longer knows about.
    #[instrument(skip(self, stored), fields(universe = %stored.universe()))]
    fn restore(&mut self, stored: GameSettings) {
        self.time_limit = *stored.time_limit();
        self.show_vote_count = *stored.show_vote_count();
        self.show_actual_spy = *stored.show_actual_spy();

        let Some(universe) = self.universe_named(stored.universe()) else {
            info!("Stored universe no longer exists, clearing selection");
            return;
        };
        let worlds = universe.short_names();
        let genres = universe.genres();
        let name = universe.name().clone();

        self.available_worlds = stored
            .available_worlds()
            .iter()
            .filter(|w| worlds.contains(w))
            .cloned()
            .collect();
        self.selected_genres = stored
            .selected_genres()
            .iter()
            .filter(|g| genres.contains(g))
            .cloned()
            .collect();
        debug!(
            worlds = self.available_worlds.len(),
            genres = self.selected_genres.len(),
            "Restored stored selection"
        );
        self.selected_universe = Some(name);
    }

    /// Returns the provider this aggregator was built with.
    pub fn provider(&self) -> &Arc<dyn UniverseProvider> {
        &self.provider
    }

    /// Returns the selected universe's reference data.
    pub fn universe(&self) -> Option<&Universe> {
        self.selected_universe
            .as_deref()
            .and_then(|name| self.universe_named(name))
    }

    fn universe_named(&self, name: &str) -> Option<&Universe> {
        self.universes.iter().find(|u| u.name() == name)
    }

    /// Returns the distinct genres of the selected universe.
    pub fn genres(&self) -> Vec<String> {
        self.universe().map(Universe::genres).unwrap_or_default()
    }

    /// Returns the worlds not hidden by the genre filter.
    pub fn visible_worlds(&self) -> Vec<&World> {
        self.universe()
            .map(|u| {
                u.worlds()
                    .iter()
                    .filter(|w| !self.selected_genres.contains(w.genre()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the worlds a round can be assigned: available and visible.
    pub fn playable_worlds(&self) -> Vec<&World> {
        self.visible_worlds()
            .into_iter()
            .filter(|w| self.available_worlds.contains(w.short_name()))
            .collect()
    }

    /// Returns `true` if the world with this short name is switched on.
    pub fn is_world_available(&self, short_name: &str) -> bool {
        self.available_worlds.iter().any(|w| w == short_name)
    }

    /// Returns `true` if worlds of this genre are hidden.
    pub fn is_genre_excluded(&self, genre: &str) -> bool {
        self.selected_genres.iter().any(|g| g == genre)
    }

    /// Returns the current record, if a universe is selected.
    pub fn current(&self) -> Option<GameSettings> {
        self.selected_universe.as_ref().map(|universe| {
            GameSettings::new(
                universe.clone(),
                self.available_worlds.clone(),
                self.time_limit,
                self.selected_genres.clone(),
                self.show_vote_count,
                self.show_actual_spy,
            )
        })
    }

    /// Selects a universe.
    ///
    /// If the stored record belongs to this exact universe its worlds and
    /// genre filters are reused; otherwise every world is switched on and the
    /// genre filter is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnknownUniverse`] if `name` is not known.
    #[instrument(skip(self))]
    pub fn select_universe(&mut self, name: &str) -> Result<(), SettingsError> {
        let universe = self
            .universe_named(name)
            .ok_or_else(|| SettingsError::UnknownUniverse {
                name: name.to_string(),
            })?;
        if self.selected_universe.as_deref() == Some(name) {
            debug!("Universe already selected");
            return Ok(());
        }
        let all_worlds = universe.short_names();
        let genres = universe.genres();

        let stored = store::load::<GameSettings>(self.store.as_ref(), StoreKey::GameSettings)
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to read stored settings");
                None
            })
            .filter(|s| s.universe() == name);

        match stored {
            Some(stored) => {
                debug!("Reusing stored worlds for this universe");
                self.available_worlds = stored
                    .available_worlds()
                    .iter()
                    .filter(|w| all_worlds.contains(w))
                    .cloned()
                    .collect();
                self.selected_genres = stored
                    .selected_genres()
                    .iter()
                    .filter(|g| genres.contains(g))
                    .cloned()
                    .collect();
            }
            None => {
                self.available_worlds = all_worlds;
                self.selected_genres.clear();
            }
        }
        info!(universe = %name, worlds = self.available_worlds.len(), "Universe selected");
        self.selected_universe = Some(name.to_string());
        self.persist();
        Ok(())
    }

    /// Switches a world of the selected universe on or off.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if no universe is selected or the world is
    /// not part of it.
    #[instrument(skip(self))]
    pub fn toggle_world(&mut self, short_name: &str) -> Result<bool, SettingsError> {
        let universe = self.universe().ok_or(SettingsError::NoUniverseSelected)?;
        if universe.world(short_name).is_none() {
            return Err(SettingsError::UnknownWorld {
                short_name: short_name.to_string(),
            });
        }
        let now_available = match self.available_worlds.iter().position(|w| w == short_name) {
            Some(index) => {
                self.available_worlds.remove(index);
                false
            }
            None => {
                self.available_worlds.push(short_name.to_string());
                true
            }
        };
        debug!(short_name, now_available, "Toggled world");
        self.persist();
        Ok(now_available)
    }

    /// Adds or removes a genre from the exclusion filter.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if no universe is selected or the genre does
    /// not occur in it.
    #[instrument(skip(self))]
    pub fn toggle_genre(&mut self, genre: &str) -> Result<bool, SettingsError> {
        if self.selected_universe.is_none() {
            return Err(SettingsError::NoUniverseSelected);
        }
        if !self.genres().iter().any(|g| g == genre) {
            return Err(SettingsError::UnknownGenre {
                genre: genre.to_string(),
            });
        }
        let now_excluded = match self.selected_genres.iter().position(|g| g == genre) {
            Some(index) => {
                self.selected_genres.remove(index);
                false
            }
            None => {
                self.selected_genres.push(genre.to_string());
                true
            }
        };
        debug!(genre, now_excluded, "Toggled genre filter");
        self.persist();
        Ok(now_excluded)
    }

    /// Moves the time limit one step up or down.
    #[instrument(skip(self))]
    pub fn adjust_time_limit(&mut self, increase: bool) -> TimeLimit {
        self.time_limit = if increase {
            self.time_limit.increased()
        } else {
            self.time_limit.decreased()
        };
        debug!(seconds = self.time_limit.seconds(), "Time limit changed");
        self.persist();
        self.time_limit
    }

    /// Flips whether vote counts are shown.
    #[instrument(skip(self))]
    pub fn toggle_show_vote_count(&mut self) -> bool {
        self.show_vote_count = !self.show_vote_count;
        debug!(show_vote_count = self.show_vote_count, "Toggled vote count display");
        self.persist();
        self.show_vote_count
    }

    /// Flips whether the real spy can be revealed after a spy win.
    #[instrument(skip(self))]
    pub fn toggle_show_actual_spy(&mut self) -> bool {
        self.show_actual_spy = !self.show_actual_spy;
        debug!(show_actual_spy = self.show_actual_spy, "Toggled spy reveal");
        self.persist();
        self.show_actual_spy
    }

    /// Writes the current record. Skipped while no universe is selected.
    #[instrument(skip(self))]
    fn persist(&self) {
        let Some(settings) = self.current() else {
            debug!("No universe selected, not storing settings");
            return;
        };
        match store::save(self.store.as_ref(), StoreKey::GameSettings, &settings) {
            Ok(()) => debug!("Settings stored after change"),
            Err(e) => warn!(error = %e, "Failed to store settings"),
        }
    }

    /// Prepares a round: draws the spy and the world, and stores
    /// `selectedPlayer`, `selectedWorld` and `gameSettings`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if no universe or world is selected, the
    /// roster is too small, or the records cannot be stored.
    #[instrument(skip(self, roster, rng), fields(players = roster.len()))]
    pub fn start_game<R: Rng + ?Sized>(
        &self,
        roster: &[Player],
        rng: &mut R,
    ) -> Result<GameStart, SettingsError> {
        let settings = self.current().ok_or(SettingsError::NoUniverseSelected)?;
        if self.available_worlds.is_empty() {
            return Err(SettingsError::NoWorldsAvailable);
        }
        if roster.len() < MIN_PLAYERS {
            return Err(SettingsError::NotEnoughPlayers {
                required: MIN_PLAYERS,
                actual: roster.len(),
            });
        }
        let playable = self.playable_worlds();
        let world = (*playable.choose(rng).ok_or(SettingsError::NoPlayableWorld)?).clone();
        let spy = roster
            .choose(rng)
            .cloned()
            .ok_or(SettingsError::NotEnoughPlayers {
                required: MIN_PLAYERS,
                actual: 0,
            })?;

        store::save(self.store.as_ref(), StoreKey::SelectedPlayer, &spy)?;
        store::save(self.store.as_ref(), StoreKey::SelectedWorld, world.name())?;
        store::save(self.store.as_ref(), StoreKey::GameSettings, &settings)?;

        info!(spy = %spy.id(), world = %world.short_name(), "Round prepared");
        Ok(GameStart {
            spy,
            world,
            settings,
        })
    }
}
