//! Screen implementations.

mod game;
mod game_mode;
mod intro;
mod main_menu;
mod players;
mod settings;

pub use game::GameScreen;
pub use game_mode::GameModeScreen;
pub use intro::IntroScreen;
pub use main_menu::MainMenuScreen;
pub use players::PlayersScreen;
pub use settings::SettingsScreen;
