//! Typed access to the well-known records.

use serde::Serialize;
use serde::de::DeserializeOwned;
use strum::{AsRefStr, Display, EnumIter};
use tracing::{debug, instrument};

use crate::store::{KeyValueStore, StoreError};

/// Keys of the records the game persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
pub enum StoreKey {
    /// Ordered list of roster players.
    #[strum(serialize = "players")]
    Players,
    /// Name of the world assigned for the prepared round.
    #[strum(serialize = "selectedWorld")]
    SelectedWorld,
    /// The settings record.
    #[strum(serialize = "gameSettings")]
    GameSettings,
    /// The player drawn as the spy for the prepared round.
    #[strum(serialize = "selectedPlayer")]
    SelectedPlayer,
}

/// Loads and decodes the JSON record under `key`.
///
/// # Errors
///
/// Returns [`StoreError`] if the store cannot be read or the value is not
/// valid JSON for `T`.
#[instrument(skip(store))]
pub fn load<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: StoreKey,
) -> Result<Option<T>, StoreError> {
    match store.get(key.as_ref())? {
        Some(raw) => {
            let value = serde_json::from_str(&raw)?;
            debug!(%key, "Decoded record");
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Encodes `value` as JSON and stores it under `key`.
///
/// # Errors
///
/// Returns [`StoreError`] if encoding or writing fails.
#[instrument(skip(store, value))]
pub fn save<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: StoreKey,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key.as_ref(), raw)
}

/// Removes the record under `key`.
///
/// # Errors
///
/// Returns [`StoreError`] if the store cannot be written.
#[instrument(skip(store))]
pub fn remove(store: &dyn KeyValueStore, key: StoreKey) -> Result<(), StoreError> {
    store.remove(key.as_ref())
}
