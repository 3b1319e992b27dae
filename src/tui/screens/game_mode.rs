//! Game mode picker. Only local play is available.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
};
use tracing::{debug, info, instrument};

use crate::flow::ScreenId;
use crate::tui::screen::{AppContext, Screen, ScreenTransition};
use crate::tui::widgets::{self, ACCENT, MUTED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameMode {
    Local,
    Lan,
    Multiplayer,
}

impl GameMode {
    fn name(self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::Lan => "LAN",
            Self::Multiplayer => "Multiplayer",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Local => "Play with friends on the same device. Pass it to the next player.",
            Self::Lan => "Play with friends on the same network",
            Self::Multiplayer => "Play with friends online",
        }
    }

    fn all() -> &'static [GameMode] {
        &[Self::Local, Self::Lan, Self::Multiplayer]
    }
}

/// State for the game mode screen.
#[derive(Debug)]
pub struct GameModeScreen {
    list_state: ListState,
    notice: Option<String>,
}

impl GameModeScreen {
    /// Creates the mode picker with local play selected.
    #[instrument]
    pub fn new() -> Self {
        debug!("Initializing GameModeScreen");
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            list_state,
            notice: None,
        }
    }

    fn selected_mode(&self) -> GameMode {
        let modes = GameMode::all();
        let idx = self.list_state.selected().unwrap_or(0);
        modes[idx.min(modes.len() - 1)]
    }
}

impl Default for GameModeScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for GameModeScreen {
    fn render(&self, frame: &mut Frame, area: Rect) {
        let [header, body, help] = widgets::screen_chunks(area);
        widgets::render_header(frame, header, "Game Mode");

        let items: Vec<ListItem> = GameMode::all()
            .iter()
            .map(|mode| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        mode.name(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(mode.description(), Style::default().fg(MUTED))),
                    Line::from(""),
                ])
            })
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().fg(ACCENT))
            .highlight_symbol("▶ ");
        let mut list_state = self.list_state;
        frame.render_stateful_widget(list, widgets::centered(body, 72, 9), &mut list_state);

        widgets::render_help(frame, help, "↑↓: Navigate | Enter: Select | Esc: Back");

        if let Some(notice) = &self.notice {
            widgets::render_modal(frame, "Coming soon", notice, "Press any key");
        }
    }

    #[instrument(skip(self, key, _ctx))]
    fn handle_key(&mut self, key: KeyEvent, _ctx: &AppContext) -> ScreenTransition {
        if self.notice.take().is_some() {
            return ScreenTransition::Stay;
        }
        match key.code {
            KeyCode::Up => {
                self.list_state.select_previous();
                ScreenTransition::Stay
            }
            KeyCode::Down => {
                let last = GameMode::all().len() - 1;
                let next = self.list_state.selected().map_or(0, |i| (i + 1).min(last));
                self.list_state.select(Some(next));
                ScreenTransition::Stay
            }
            KeyCode::Enter => {
                let mode = self.selected_mode();
                info!(mode = mode.name(), "Game mode selected");
                match mode {
                    GameMode::Local => ScreenTransition::GoTo(ScreenId::Players),
                    GameMode::Lan | GameMode::Multiplayer => {
                        self.notice = Some(format!("{} play is not available yet.", mode.name()));
                        ScreenTransition::Stay
                    }
                }
            }
            KeyCode::Esc | KeyCode::Backspace => ScreenTransition::Back,
            _ => ScreenTransition::Stay,
        }
    }
}
