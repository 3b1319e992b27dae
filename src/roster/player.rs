//! Player and avatar types.

use derive_getters::Getters;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};
use tracing::instrument;

/// Unique player identifier, derived from the creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wraps an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The fixed set of avatars a player can pick.
///
/// Stored as the string ids `"1"` through `"6"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum Avatar {
    /// Fedora agent.
    #[serde(rename = "1")]
    Fedora,
    /// Sunglasses agent.
    #[serde(rename = "2")]
    Shades,
    /// Mustache agent.
    #[serde(rename = "3")]
    Mustache,
    /// Fox mask.
    #[serde(rename = "4")]
    Fox,
    /// Owl mask.
    #[serde(rename = "5")]
    Owl,
    /// Cat mask.
    #[serde(rename = "6")]
    Cat,
}

impl Avatar {
    /// Returns the stored identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::Fedora => "1",
            Self::Shades => "2",
            Self::Mustache => "3",
            Self::Fox => "4",
            Self::Owl => "5",
            Self::Cat => "6",
        }
    }

    /// Returns the glyph drawn for this avatar.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Fedora => "🕵",
            Self::Shades => "😎",
            Self::Mustache => "🥸",
            Self::Fox => "🦊",
            Self::Owl => "🦉",
            Self::Cat => "🐱",
        }
    }

    /// Returns the avatar with the given stored id.
    #[instrument]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::iter().find(|a| a.id() == id)
    }

    /// Returns every avatar in picker order.
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}

/// A roster player.
///
/// `vote_count` is transient: it is reset when a round starts and is never
/// meaningful in the stored roster.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    id: PlayerId,
    name: String,
    avatar: Option<Avatar>,
    #[serde(default = "unordered")]
    order: usize,
    #[serde(default)]
    vote_count: u32,
}

fn unordered() -> usize {
    usize::MAX
}

impl Player {
    /// Creates a player. Callers are responsible for validation.
    pub fn new(id: PlayerId, name: impl Into<String>, avatar: Avatar, order: usize) -> Self {
        Self {
            id,
            name: name.into(),
            avatar: Some(avatar),
            order,
            vote_count: 0,
        }
    }

    /// Returns the avatar glyph, or the name's first letter if none is set.
    pub fn badge(&self) -> String {
        match self.avatar {
            Some(avatar) => avatar.glyph().to_string(),
            None => self
                .name
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect())
                .unwrap_or_default(),
        }
    }

    pub(crate) fn set_order(&mut self, order: usize) {
        self.order = order;
    }

    pub(crate) fn set_profile(&mut self, name: String, avatar: Avatar) {
        self.name = name;
        self.avatar = Some(avatar);
    }

    pub(crate) fn reset_votes(&mut self) {
        self.vote_count = 0;
    }

    pub(crate) fn add_vote(&mut self) {
        self.vote_count += 1;
    }
}
