//! Screen identifiers and the back-navigation table.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The six top-level screens.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, Serialize, Deserialize,
)]
pub enum ScreenId {
    /// Title screen.
    #[default]
    Main,
    /// Local, LAN or multiplayer.
    Mode,
    /// Roster editor.
    Players,
    /// Universe, worlds and rules.
    Settings,
    /// Mission briefing.
    Intro,
    /// The round.
    Game,
}

impl ScreenId {
    /// Returns the screen that "back" leads to. `Main` has none.
    pub fn predecessor(self) -> Option<Self> {
        match self {
            Self::Main => None,
            Self::Mode => Some(Self::Main),
            Self::Players => Some(Self::Mode),
            Self::Settings => Some(Self::Players),
            Self::Intro => Some(Self::Settings),
            Self::Game => Some(Self::Intro),
        }
    }
}
