//! Title screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    widgets::{List, ListItem, ListState, Paragraph},
};
use tracing::{debug, info, instrument};

use crate::flow::ScreenId;
use crate::tui::screen::{AppContext, Screen, ScreenTransition};
use crate::tui::widgets::{self, ACCENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuOption {
    WhereAmI,
    Elimination,
    Quit,
}

impl MenuOption {
    fn label(self) -> &'static str {
        match self {
            Self::WhereAmI => "Where Am I?",
            Self::Elimination => "Elimination",
            Self::Quit => "Quit",
        }
    }

    fn all() -> &'static [MenuOption] {
        &[Self::WhereAmI, Self::Elimination, Self::Quit]
    }
}

/// State for the title screen.
#[derive(Debug)]
pub struct MainMenuScreen {
    list_state: ListState,
    notice: Option<&'static str>,
}

impl MainMenuScreen {
    /// Creates the title screen with the first entry selected.
    #[instrument]
    pub fn new() -> Self {
        debug!("Initializing MainMenuScreen");
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            list_state,
            notice: None,
        }
    }

    fn selected_option(&self) -> MenuOption {
        let options = MenuOption::all();
        let idx = self.list_state.selected().unwrap_or(0);
        options[idx.min(options.len() - 1)]
    }
}

impl Default for MainMenuScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for MainMenuScreen {
    fn render(&self, frame: &mut Frame, area: Rect) {
        let [_, title_area, menu_area, _, help_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        let title = Paragraph::new("S P Y X   M I S S I O N S")
            .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(title, title_area);

        let items: Vec<ListItem> = MenuOption::all()
            .iter()
            .map(|opt| ListItem::new(opt.label()))
            .collect();
        let menu = List::new(items)
            .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        let mut list_state = self.list_state;
        frame.render_stateful_widget(menu, widgets::centered(menu_area, 20, 5), &mut list_state);

        widgets::render_help(frame, help_area, "↑↓: Navigate | Enter: Select | q: Quit");

        if let Some(notice) = self.notice {
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
                let last = MenuOption::all().len() - 1;
                let next = self.list_state.selected().map_or(0, |i| (i + 1).min(last));
                self.list_state.select(Some(next));
                ScreenTransition::Stay
            }
            KeyCode::Enter => {
                let option = self.selected_option();
                info!(option = ?option, "Menu option selected");
                match option {
                    MenuOption::WhereAmI => ScreenTransition::GoTo(ScreenId::Mode),
                    MenuOption::Elimination => {
                        self.notice = Some("Elimination is not available yet.");
                        ScreenTransition::Stay
                    }
                    MenuOption::Quit => ScreenTransition::Quit,
                }
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }
}
