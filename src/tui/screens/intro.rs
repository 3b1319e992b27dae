//! Mission briefing shown before the round.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};
use tracing::{debug, info, instrument};

use crate::flow::ScreenId;
use crate::tui::screen::{AppContext, Screen, ScreenTransition};
use crate::tui::widgets::{self, ACCENT};

const INTRODUCTION: &str = "Welcome to your first mission, agent. You are about to embark on \
a thrilling journey of espionage and strategy. Your skills, wit, and quick thinking will be \
put to the test as you navigate through complex scenarios and challenges.";

const TIPS: &[&str] = &[
    "Stay alert and observe your surroundings carefully",
    "Use your resources wisely",
    "Think before you act",
    "Remember your training",
    "Trust your instincts",
];

/// State for the briefing screen.
#[derive(Debug, Default)]
pub struct IntroScreen;

impl IntroScreen {
    /// Creates the briefing screen.
    #[instrument]
    pub fn new() -> Self {
        debug!("Initializing IntroScreen");
        Self
    }
}

impl Screen for IntroScreen {
    fn render(&self, frame: &mut Frame, area: Rect) {
        let [header, body, help] = widgets::screen_chunks(area);
        widgets::render_header(frame, header, "Mission Briefing");

        let section = |title: &'static str| {
            Line::from(Span::styled(
                title,
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ))
        };
        let mut lines = vec![
            section("Introduction"),
            Line::from(INTRODUCTION),
            Line::from(""),
            section("Mission Tips"),
        ];
        lines.extend(TIPS.iter().map(|tip| Line::from(format!("• {}", tip))));

        let briefing = Paragraph::new(Text::from(lines))
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(briefing, widgets::centered(body, 70, 14));

        widgets::render_help(frame, help, "Enter: Start Mission | Esc: Back");
    }

    #[instrument(skip(self, key, _ctx))]
    fn handle_key(&mut self, key: KeyEvent, _ctx: &AppContext) -> ScreenTransition {
        match key.code {
            KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => {
                info!("Mission started");
                ScreenTransition::GoTo(ScreenId::Game)
            }
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => ScreenTransition::Back,
            _ => ScreenTransition::Stay,
        }
    }
}
