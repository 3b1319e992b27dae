//! Screen trait and the transitions screens can request.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Frame, layout::Rect};

use crate::catalog::UniverseProvider;
use crate::flow::ScreenId;
use crate::round::TieBreak;
use crate::store::KeyValueStore;

/// What the app should do after a screen handled an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenTransition {
    /// Stay on the current screen.
    Stay,
    /// Cross-fade to another screen.
    GoTo(ScreenId),
    /// Cross-fade to the current screen's predecessor.
    Back,
    /// Leave the app.
    Quit,
}

/// Services every screen may use.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Persisted records.
    pub store: Arc<dyn KeyValueStore>,
    /// Universe and world reference data.
    pub provider: Arc<dyn UniverseProvider>,
    /// How tied votes are settled.
    pub tie_break: TieBreak,
}

/// A top-level screen.
///
/// Each screen owns its own state. The app mounts a fresh screen on every
/// swap, so state that must outlive a screen goes through the store.
pub trait Screen {
    /// Draws the screen into `area`.
    fn render(&self, frame: &mut Frame, area: Rect);

    /// Handles a key press.
    fn handle_key(&mut self, key: KeyEvent, ctx: &AppContext) -> ScreenTransition;

    /// Handles a mouse event. Ignored by default.
    fn handle_mouse(&mut self, _mouse: MouseEvent, _ctx: &AppContext) -> ScreenTransition {
        ScreenTransition::Stay
    }

    /// Advances timers and polls background work.
    fn tick(&mut self, _dt: Duration, _ctx: &AppContext) -> ScreenTransition {
        ScreenTransition::Stay
    }
}
