//! Which screen is active and how the app moves between screens.

mod controller;
mod screen_id;

pub use controller::{DEFAULT_FADE, FlowController, Transition};
pub use screen_id::ScreenId;
