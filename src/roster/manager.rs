//! Roster manager: the ordered player list and its persisted copy.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::roster::{Avatar, Player, PlayerId, RosterError};
use crate::store::{self, KeyValueStore, StoreKey};

/// Longest accepted player name, in characters.
pub const MAX_NAME_LEN: usize = 9;

/// Owns the roster and writes it back after every mutation.
///
/// Invariant: `order` values are always `0..len` and match list position.
/// Storage failures are logged and the in-memory roster stays authoritative.
#[derive(Debug, Clone)]
pub struct RosterManager {
    players: Vec<Player>,
    store: Arc<dyn KeyValueStore>,
}

impl RosterManager {
    /// Loads the roster from `store`.
    ///
    /// A missing or unreadable record yields an empty roster. Stored players
    /// without an order keep their list position, and orders are renumbered.
    #[instrument(skip(store))]
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut players: Vec<Player> = match store::load(store.as_ref(), StoreKey::Players) {
            Ok(Some(players)) => players,
            Ok(None) => {
                debug!("No stored roster");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to load roster, starting empty");
                Vec::new()
            }
        };
        // Stable sort keeps list position for players missing an order.
        players.sort_by_key(|p| *p.order());
        renumber(&mut players);
        info!(count = players.len(), "Roster loaded");
        Self { players, store }
    }

    /// Returns the players in turn order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Returns the number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns `true` if the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Looks up a player by id.
    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    /// Returns the list position of a player.
    pub fn position(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id() == id)
    }

    /// Appends a new player after validating name and avatar.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError`] if the name is empty or too long, or no avatar
    /// is given.
    #[instrument(skip(self))]
    pub fn add(&mut self, name: &str, avatar: Option<Avatar>) -> Result<&Player, RosterError> {
        let (name, avatar) = validate(name, avatar)?;
        let id = self.next_id();
        let order = self.players.len();
        info!(player_id = %id, name = %name, order, "Adding player");
        self.players.push(Player::new(id, name, avatar, order));
        self.persist();
        let index = self.players.len() - 1;
        Ok(&self.players[index])
    }

    /// Replaces a player's name and avatar in place.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError`] on validation failure or unknown id.
    #[instrument(skip(self))]
    pub fn edit(
        &mut self,
        id: &PlayerId,
        name: &str,
        avatar: Option<Avatar>,
    ) -> Result<(), RosterError> {
        let (name, avatar) = validate(name, avatar)?;
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or_else(|| RosterError::UnknownPlayer { id: id.clone() })?;
        info!(player_id = %id, name = %name, "Editing player");
        player.set_profile(name, avatar);
        self.persist();
        Ok(())
    }

    /// Removes a player and renumbers the rest.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::UnknownPlayer`] if the id is not in the roster.
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: &PlayerId) -> Result<Player, RosterError> {
        let index = self
            .position(id)
            .ok_or_else(|| RosterError::UnknownPlayer { id: id.clone() })?;
        let removed = self.players.remove(index);
        renumber(&mut self.players);
        info!(player_id = %id, remaining = self.players.len(), "Deleted player");
        self.persist();
        Ok(removed)
    }

    /// Moves a player to `target_index` and renumbers everyone.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError`] for an unknown id or an out-of-range target.
    #[instrument(skip(self))]
    pub fn reorder(&mut self, id: &PlayerId, target_index: usize) -> Result<(), RosterError> {
        let from = self
            .position(id)
            .ok_or_else(|| RosterError::UnknownPlayer { id: id.clone() })?;
        if target_index >= self.players.len() {
            return Err(RosterError::TargetOutOfRange {
                index: target_index,
                len: self.players.len(),
            });
        }
        if from == target_index {
            debug!(player_id = %id, "Reorder onto own slot, nothing to do");
            return Ok(());
        }
        let player = self.players.remove(from);
        self.players.insert(target_index, player);
        renumber(&mut self.players);
        info!(player_id = %id, from, to = target_index, "Reordered player");
        self.persist();
        Ok(())
    }

    /// Removes every player and the stored record.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        info!(count = self.players.len(), "Clearing roster");
        self.players.clear();
        if let Err(e) = store::remove(self.store.as_ref(), StoreKey::Players) {
            warn!(error = %e, "Failed to clear stored roster");
        }
    }

    /// Writes the full roster back to the store.
    #[instrument(skip(self))]
    fn persist(&self) {
        match store::save(self.store.as_ref(), StoreKey::Players, &self.players) {
            Ok(()) => debug!(count = self.players.len(), "Roster saved"),
            Err(e) => warn!(error = %e, "Failed to save roster, keeping in-memory copy"),
        }
    }

    /// Generates an id from the current timestamp, skipping ids in use.
    fn next_id(&self) -> PlayerId {
        let mut millis = chrono::Utc::now().timestamp_millis();
        loop {
            let candidate = PlayerId::new(millis.to_string());
            if self.get(&candidate).is_none() {
                return candidate;
            }
            millis += 1;
        }
    }
}

/// Assigns `order = position` to every player.
pub fn renumber(players: &mut [Player]) {
    for (index, player) in players.iter_mut().enumerate() {
        player.set_order(index);
    }
}

/// Checks a name/avatar pair, returning the trimmed name.
fn validate(name: &str, avatar: Option<Avatar>) -> Result<(String, Avatar), RosterError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RosterError::EmptyName);
    }
    let length = trimmed.chars().count();
    if length > MAX_NAME_LEN {
        return Err(RosterError::NameTooLong { length });
    }
    let avatar = avatar.ok_or(RosterError::MissingAvatar)?;
    Ok((trimmed.to_string(), avatar))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_name() {
        let (name, _) = validate("  Ann  ", Some(Avatar::Fox)).expect("valid");
        assert_eq!(name, "Ann");
    }

    #[test]
    fn test_validate_counts_characters_not_bytes() {
        assert!(validate("ÅÅÅÅÅÅÅÅÅ", Some(Avatar::Owl)).is_ok());
        assert_eq!(
            validate("ÅÅÅÅÅÅÅÅÅÅ", Some(Avatar::Owl)),
            Err(RosterError::NameTooLong { length: 10 })
        );
    }

    #[test]
    fn test_validate_checks_name_before_avatar() {
        assert_eq!(validate("   ", None), Err(RosterError::EmptyName));
    }
}
