//! Game settings: universe, worlds, time limit and display toggles.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, List, ListItem, ListState, Paragraph},
};
use tokio::sync::oneshot;
use tracing::{debug, error, info, instrument, warn};

use crate::flow::ScreenId;
use crate::roster::RosterManager;
use crate::settings::{SettingsAggregator, SettingsError};
use crate::tui::screen::{AppContext, Screen, ScreenTransition};
use crate::tui::widgets::{self, ACCENT, MUTED, SPY};

type LoadResult = Result<SettingsAggregator, SettingsError>;

#[derive(Debug)]
enum LoadState {
    Pending(oneshot::Receiver<LoadResult>),
    Failed(String),
    Ready(SettingsAggregator),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Universe,
    Worlds,
    TimeLimit,
    ShowVoteCount,
    ShowActualSpy,
    StartGame,
}

impl Row {
    fn all() -> &'static [Row] {
        &[
            Self::Universe,
            Self::Worlds,
            Self::TimeLimit,
            Self::ShowVoteCount,
            Self::ShowActualSpy,
            Self::StartGame,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PickerItem {
    Genre(String),
    World(String),
}

#[derive(Debug)]
enum Overlay {
    None,
    Universes(ListState),
    Worlds(ListState),
    Alert(String),
}

/// State for the settings screen.
#[derive(Debug)]
pub struct SettingsScreen {
    load: LoadState,
    list_state: ListState,
    overlay: Overlay,
}

impl SettingsScreen {
    /// Starts loading settings and reference data in the background.
    #[instrument(skip(ctx))]
    pub fn new(ctx: &AppContext) -> Self {
        debug!("Initializing SettingsScreen");
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            load: Self::spawn_load(ctx),
            list_state,
            overlay: Overlay::None,
        }
    }

    fn spawn_load(ctx: &AppContext) -> LoadState {
        let (tx, rx) = oneshot::channel();
        let provider = ctx.provider.clone();
        let store = ctx.store.clone();
        tokio::spawn(async move {
            let result = SettingsAggregator::load(provider, store).await;
            if tx.send(result).is_err() {
                debug!("Settings screen gone before load finished");
            }
        });
        LoadState::Pending(rx)
    }

    fn selected_row(&self) -> Row {
        let rows = Row::all();
        rows[self.list_state.selected().unwrap_or(0).min(rows.len() - 1)]
    }

    fn picker_items(settings: &SettingsAggregator) -> Vec<PickerItem> {
        let mut items: Vec<PickerItem> = settings.genres().into_iter().map(PickerItem::Genre).collect();
        items.extend(
            settings
                .visible_worlds()
                .into_iter()
                .map(|w| PickerItem::World(w.short_name().clone())),
        );
        items
    }

    #[instrument(skip(settings, ctx))]
    fn start_game(settings: &SettingsAggregator, ctx: &AppContext) -> Result<(), SettingsError> {
        let roster = RosterManager::load(ctx.store.clone());
        let start = settings.start_game(roster.players(), &mut rand::thread_rng())?;
        info!(world = %start.world().name(), "Game prepared");
        Ok(())
    }

    fn handle_row(&mut self, key: KeyEvent, ctx: &AppContext) -> ScreenTransition {
        let row = self.selected_row();
        let LoadState::Ready(settings) = &mut self.load else {
            return ScreenTransition::Stay;
        };
        let result = match (row, key.code) {
            (Row::Universe, KeyCode::Enter) => {
                let mut state = ListState::default();
                let current = settings
                    .selected_universe()
                    .as_ref()
                    .and_then(|name| settings.universes().iter().position(|u| u.name() == name));
                state.select(Some(current.unwrap_or(0)));
                self.overlay = Overlay::Universes(state);
                Ok(())
            }
            (Row::Worlds, KeyCode::Enter) => {
                if settings.selected_universe().is_none() {
                    Err(SettingsError::NoUniverseSelected)
                } else {
                    let mut state = ListState::default();
                    state.select(Some(0));
                    self.overlay = Overlay::Worlds(state);
                    Ok(())
                }
            }
            (Row::TimeLimit, KeyCode::Left | KeyCode::Char('-')) => {
                settings.adjust_time_limit(false);
                Ok(())
            }
            (Row::TimeLimit, KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=')) => {
                settings.adjust_time_limit(true);
                Ok(())
            }
            (Row::ShowVoteCount, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) => {
                settings.toggle_show_vote_count();
                Ok(())
            }
            (Row::ShowActualSpy, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) => {
                settings.toggle_show_actual_spy();
                Ok(())
            }
            (Row::StartGame, KeyCode::Enter) => match Self::start_game(settings, ctx) {
                Ok(()) => return ScreenTransition::GoTo(ScreenId::Intro),
                Err(e) => Err(e),
            },
            _ => Ok(()),
        };
        if let Err(e) = result {
            debug!(error = %e, "Settings action refused");
            self.overlay = Overlay::Alert(e.to_string());
        }
        ScreenTransition::Stay
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) {
        let LoadState::Ready(settings) = &mut self.load else {
            self.overlay = Overlay::None;
            return;
        };
        match &mut self.overlay {
            Overlay::None => {}
            Overlay::Alert(_) => self.overlay = Overlay::None,
            Overlay::Universes(state) => match key.code {
                KeyCode::Up => state.select_previous(),
                KeyCode::Down => {
                    let last = settings.universes().len().saturating_sub(1);
                    state.select(Some(state.selected().map_or(0, |i| (i + 1).min(last))));
                }
                KeyCode::Enter => {
                    let name = state
                        .selected()
                        .and_then(|i| settings.universes().get(i))
                        .map(|u| u.name().clone());
                    self.overlay = match name.map(|n| settings.select_universe(&n)) {
                        Some(Err(e)) => Overlay::Alert(e.to_string()),
                        _ => Overlay::None,
                    };
                }
                KeyCode::Esc => self.overlay = Overlay::None,
                _ => {}
            },
            Overlay::Worlds(state) => {
                let items = Self::picker_items(settings);
                match key.code {
                    KeyCode::Up => state.select_previous(),
                    KeyCode::Down => {
                        let last = items.len().saturating_sub(1);
                        state.select(Some(state.selected().map_or(0, |i| (i + 1).min(last))));
                    }
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        let outcome = match state.selected().and_then(|i| items.get(i)) {
                            Some(PickerItem::Genre(genre)) => settings.toggle_genre(genre).map(|_| ()),
                            Some(PickerItem::World(world)) => settings.toggle_world(world).map(|_| ()),
                            None => Ok(()),
                        };
                        let len = Self::picker_items(settings).len();
                        if let Some(i) = state.selected()
                            && i >= len
                        {
                            state.select(Some(len.saturating_sub(1)));
                        }
                        if let Err(e) = outcome {
                            self.overlay = Overlay::Alert(e.to_string());
                        }
                    }
                    KeyCode::Esc => self.overlay = Overlay::None,
                    _ => {}
                }
            }
        }
    }

    fn render_rows(&self, frame: &mut Frame, area: Rect, settings: &SettingsAggregator) {
        let on_off = |on: bool| if on { "On" } else { "Off" };
        let items: Vec<ListItem> = Row::all()
            .iter()
            .map(|row| {
                let (label, value) = match row {
                    Row::Universe => (
                        "Universe",
                        settings
                            .selected_universe()
                            .clone()
                            .unwrap_or_else(|| "Select…".to_string()),
                    ),
                    Row::Worlds => (
                        "World",
                        match settings.universe() {
                            Some(universe) => format!(
                                "{} of {} available",
                                settings.available_worlds().len(),
                                universe.worlds().len()
                            ),
                            None => "Select a universe first".to_string(),
                        },
                    ),
                    Row::TimeLimit => ("Time Limit", format!("◀ {} ▶", settings.time_limit())),
                    Row::ShowVoteCount => {
                        ("Show Vote Count", on_off(*settings.show_vote_count()).to_string())
                    }
                    Row::ShowActualSpy => (
                        "Show The Spy at the end",
                        on_off(*settings.show_actual_spy()).to_string(),
                    ),
                    Row::StartGame => ("", "[ Start Game ]".to_string()),
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<26}", label), Style::default().fg(MUTED)),
                    Span::raw(value),
                ]))
            })
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        let mut list_state = self.list_state;
        frame.render_stateful_widget(list, widgets::centered(area, 60, 6), &mut list_state);
    }

    fn render_overlay(&self, frame: &mut Frame, settings: &SettingsAggregator) {
        match &self.overlay {
            Overlay::None => {}
            Overlay::Alert(message) => widgets::render_modal(frame, "Error", message, "Press any key"),
            Overlay::Universes(state) => {
                let area = widgets::centered(frame.area(), 40, 12);
                frame.render_widget(Clear, area);
                let items: Vec<ListItem> = settings
                    .universes()
                    .iter()
                    .map(|u| ListItem::new(u.name().as_str()))
                    .collect();
                let list = List::new(items)
                    .block(widgets::titled_block("Select Universe"))
                    .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
                    .highlight_symbol("> ");
                let mut state = *state;
                frame.render_stateful_widget(list, area, &mut state);
            }
            Overlay::Worlds(state) => {
                let area = widgets::centered(frame.area(), 56, 20);
                frame.render_widget(Clear, area);
                let items: Vec<ListItem> = Self::picker_items(settings)
                    .into_iter()
                    .map(|item| match item {
                        PickerItem::Genre(genre) => {
                            let mark = if settings.is_genre_excluded(&genre) { "✗" } else { "✓" };
                            ListItem::new(format!("Genre {} {}", mark, genre))
                                .style(Style::default().fg(MUTED))
                        }
                        PickerItem::World(short) => {
                            let mark = if settings.is_world_available(&short) { "[x]" } else { "[ ]" };
                            let name = settings
                                .universe()
                                .and_then(|u| u.world(&short))
                                .map(|w| format!("{} ({})", w.name(), w.attribution()))
                                .unwrap_or(short);
                            ListItem::new(format!("{} {}", mark, name))
                        }
                    })
                    .collect();
                let list = List::new(items)
                    .block(widgets::titled_block("Available Worlds"))
                    .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
                    .highlight_symbol("> ");
                let mut state = *state;
                frame.render_stateful_widget(list, area, &mut state);
            }
        }
    }
}

impl Screen for SettingsScreen {
    fn render(&self, frame: &mut Frame, area: Rect) {
        let [header, body, help] = widgets::screen_chunks(area);
        widgets::render_header(frame, header, "Game Settings");
        match &self.load {
            LoadState::Pending(_) => {
                frame.render_widget(
                    Paragraph::new("Loading universes...")
                        .style(Style::default().fg(MUTED))
                        .alignment(Alignment::Center),
                    widgets::centered(body, 30, 1),
                );
                widgets::render_help(frame, help, "Esc: Back");
            }
            LoadState::Failed(message) => {
                frame.render_widget(
                    Paragraph::new(message.as_str())
                        .style(Style::default().fg(SPY))
                        .alignment(Alignment::Center),
                    widgets::centered(body, 60, 2),
                );
                widgets::render_help(frame, help, "r: Retry | Esc: Back");
            }
            LoadState::Ready(settings) => {
                self.render_rows(frame, body, settings);
                widgets::render_help(
                    frame,
                    help,
                    "↑↓: Navigate | Enter: Select | ←→: Adjust | Esc: Back",
                );
                self.render_overlay(frame, settings);
            }
        }
    }

    #[instrument(skip(self, key, ctx))]
    fn handle_key(&mut self, key: KeyEvent, ctx: &AppContext) -> ScreenTransition {
        if !matches!(self.overlay, Overlay::None) {
            self.handle_overlay_key(key);
            return ScreenTransition::Stay;
        }
        match (&self.load, key.code) {
            (_, KeyCode::Esc | KeyCode::Backspace) => ScreenTransition::Back,
            (LoadState::Failed(_), KeyCode::Char('r') | KeyCode::Char('R')) => {
                info!("Retrying settings load");
                self.load = Self::spawn_load(ctx);
                ScreenTransition::Stay
            }
            (LoadState::Ready(_), KeyCode::Up) => {
                self.list_state.select_previous();
                ScreenTransition::Stay
            }
            (LoadState::Ready(_), KeyCode::Down) => {
                let last = Row::all().len() - 1;
                let next = self.list_state.selected().map_or(0, |i| (i + 1).min(last));
                self.list_state.select(Some(next));
                ScreenTransition::Stay
            }
            (LoadState::Ready(_), _) => self.handle_row(key, ctx),
            _ => ScreenTransition::Stay,
        }
    }

    fn tick(&mut self, _dt: Duration, _ctx: &AppContext) -> ScreenTransition {
        if let LoadState::Pending(rx) = &mut self.load {
            match rx.try_recv() {
                Ok(Ok(settings)) => self.load = LoadState::Ready(settings),
                Ok(Err(e)) => {
                    warn!(error = %e, "Settings load failed");
                    self.load = LoadState::Failed(e.to_string());
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    error!("Settings load task ended without a result");
                    self.load = LoadState::Failed("Failed to load data. Please try again.".to_string());
                }
            }
        }
        ScreenTransition::Stay
    }
}
