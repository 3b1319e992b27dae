//! The round: pass the device, discuss, vote, see who the spy was.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{List, ListItem, ListState, Paragraph},
};
use tracing::{debug, info, instrument, warn};

use crate::flow::ScreenId;
use crate::round::{CountdownTicker, Outcome, Phase, Round, RoundError, Secret};
use crate::tui::screen::{AppContext, Screen, ScreenTransition};
use crate::tui::widgets::{self, ACCENT, MUTED, SPY};

/// State for the game screen.
#[derive(Debug)]
pub struct GameScreen {
    round: Result<Round, String>,
    ticker: Option<CountdownTicker>,
    vote_cursor: usize,
    alert: Option<String>,
}

impl GameScreen {
    /// Builds the round from the records written at game start.
    #[instrument(skip(ctx))]
    pub fn new(ctx: &AppContext) -> Self {
        let round = Round::load(ctx.store.as_ref(), ctx.tie_break).map_err(|e| {
            warn!(error = %e, "Could not set up the round");
            e.to_string()
        });
        debug!(ok = round.is_ok(), "Initializing GameScreen");
        Self {
            round,
            ticker: None,
            vote_cursor: 0,
            alert: None,
        }
    }

    /// Keeps the ticker alive exactly while the countdown runs.
    fn sync_ticker(&mut self) {
        let counting = matches!(&self.round, Ok(round) if *round.phase() == Phase::Countdown);
        match (counting, self.ticker.is_some()) {
            (true, false) => self.ticker = Some(CountdownTicker::start()),
            (false, true) => self.ticker = None,
            _ => {}
        }
    }

    fn stage_vote(round: &mut Round, cursor: usize) -> Result<(), RoundError> {
        let Some(id) = round.candidates().get(cursor).map(|p| p.id().clone()) else {
            return Ok(());
        };
        round.select_vote(&id)
    }

    fn handle_round_key(&mut self, key: KeyEvent) -> Result<ScreenTransition, RoundError> {
        let Ok(round) = &mut self.round else {
            return Ok(ScreenTransition::Stay);
        };
        match (*round.phase(), key.code) {
            (_, KeyCode::Esc) => return Ok(ScreenTransition::Back),
            (Phase::Reveal, KeyCode::Enter | KeyCode::Char(' ')) => {
                if round.world_reveal().is_shown() {
                    round.next_player()?;
                } else {
                    round.reveal()?;
                }
            }
            (Phase::Countdown, KeyCode::Enter | KeyCode::Char('v') | KeyCode::Char('V')) => {
                round.start_voting()?;
                self.vote_cursor = 0;
            }
            (Phase::Voting, KeyCode::Left | KeyCode::Up) => {
                self.vote_cursor = self.vote_cursor.saturating_sub(1);
                Self::stage_vote(round, self.vote_cursor)?;
            }
            (Phase::Voting, KeyCode::Right | KeyCode::Down) => {
                let last = round.candidates().len().saturating_sub(1);
                self.vote_cursor = (self.vote_cursor + 1).min(last);
                Self::stage_vote(round, self.vote_cursor)?;
            }
            (Phase::Voting, KeyCode::Char(' ')) => Self::stage_vote(round, self.vote_cursor)?,
            (Phase::Voting, KeyCode::Enter) => {
                round.cast_vote()?;
                self.vote_cursor = 0;
            }
            (Phase::Results, KeyCode::Char('s') | KeyCode::Char('S')) => round.begin_spy_reveal()?,
            (Phase::Results, KeyCode::Char('r') | KeyCode::Char('R')) => {
                info!("Restarting from settings");
                return Ok(ScreenTransition::GoTo(ScreenId::Settings));
            }
            (Phase::Results, KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter) => {
                info!("Game ended");
                return Ok(ScreenTransition::GoTo(ScreenId::Main));
            }
            _ => {}
        }
        Ok(ScreenTransition::Stay)
    }

    fn render_reveal(frame: &mut Frame, area: Rect, round: &Round) {
        let Some(player) = round.current_player() else {
            return;
        };
        let mut lines = vec![
            Line::from(player.badge()),
            Line::from(Span::styled(
                player.name().clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        let opacity = round.world_reveal().opacity();
        if round.world_reveal().is_shown() {
            let (caption, value, color) = match round.secret() {
                Some(Secret::Spy) => ("You are", "The Spy".to_string(), SPY),
                Some(Secret::World(world)) => ("Your World", world, ACCENT),
                None => ("", String::new(), MUTED),
            };
            lines.push(Line::from(Span::styled(
                caption,
                widgets::faded(Style::default().fg(MUTED), opacity),
            )));
            lines.push(Line::from(Span::styled(
                value,
                widgets::faded(Style::default().fg(color).add_modifier(Modifier::BOLD), opacity),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Only you should look. Press Enter to reveal.",
                Style::default().fg(MUTED),
            )));
        }
        frame.render_widget(
            Paragraph::new(Text::from(lines)).alignment(Alignment::Center),
            widgets::centered(area, 50, 7),
        );
    }

    fn render_countdown(frame: &mut Frame, area: Rect, round: &Round) {
        let style = if *round.remaining() == 0 {
            Style::default().fg(SPY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        };
        let text = Text::from(vec![
            Line::from("Find The Spy"),
            Line::from(""),
            Line::from(Span::styled(round.remaining_display(), style)),
        ]);
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center),
            widgets::centered(area, 30, 3),
        );
    }

    fn render_voting(&self, frame: &mut Frame, area: Rect, round: &Round) {
        let Some(voter) = round.current_player() else {
            return;
        };
        let [voter_area, list_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(area);
        frame.render_widget(
            Paragraph::new(Text::from(vec![
                Line::from(format!("{} {}", voter.badge(), voter.name())),
                Line::from(Span::styled("Who is the spy?", Style::default().fg(MUTED))),
            ]))
            .alignment(Alignment::Center),
            voter_area,
        );

        let items: Vec<ListItem> = round
            .candidates()
            .into_iter()
            .map(|player| {
                let staged = round.selected_vote().as_ref() == Some(player.id());
                let mut spans = vec![Span::raw(format!("{} {}", player.badge(), player.name()))];
                if *round.show_vote_count() {
                    spans.push(Span::styled(
                        format!("  ({})", player.vote_count()),
                        Style::default().fg(MUTED),
                    ));
                }
                if staged {
                    spans.push(Span::styled("  ✓", Style::default().fg(ACCENT)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(self.vote_cursor));
        frame.render_stateful_widget(list, widgets::centered(list_area, 36, 12), &mut state);
    }

    fn render_results(frame: &mut Frame, area: Rect, round: &Round) {
        let Some(results) = round.results() else {
            return;
        };
        let reveal = round.spy_reveal();
        let opacity = reveal.opacity();
        let mut lines: Vec<Line> = Vec::new();

        if reveal.shows_spy() {
            let spy = results.spy();
            let style = |s: Style| widgets::faded(s, opacity);
            lines.push(Line::from(Span::styled(spy.badge(), style(Style::default()))));
            lines.push(Line::from(Span::styled(
                spy.name().clone(),
                style(Style::default().add_modifier(Modifier::BOLD)),
            )));
            lines.push(Line::from(Span::styled("was", style(Style::default().fg(MUTED)))));
            lines.push(Line::from(Span::styled(
                "The Spy",
                style(Style::default().fg(SPY).add_modifier(Modifier::BOLD)),
            )));
        } else {
            let style = |s: Style| widgets::faded(s, opacity);
            match results.accused() {
                Some(accused) => {
                    lines.push(Line::from(Span::styled(accused.badge(), style(Style::default()))));
                    lines.push(Line::from(Span::styled(
                        accused.name().clone(),
                        style(Style::default().add_modifier(Modifier::BOLD)),
                    )));
                    lines.push(Line::from(Span::styled("was", style(Style::default().fg(MUTED)))));
                    let verdict = match results.outcome() {
                        Outcome::SpyFound => "The Spy",
                        Outcome::SpyWins => "Not The Spy",
                    };
                    lines.push(Line::from(Span::styled(
                        verdict,
                        style(Style::default().fg(SPY).add_modifier(Modifier::BOLD)),
                    )));
                }
                None => lines.push(Line::from(Span::styled(
                    "Nobody could agree",
                    style(Style::default().fg(MUTED)),
                ))),
            }
            lines.push(Line::from(""));
            let summary = match results.outcome() {
                Outcome::SpyFound => "Locals have found the spy",
                Outcome::SpyWins => "The Spy has won",
            };
            lines.push(Line::from(Span::styled(
                summary,
                style(Style::default().fg(ACCENT)),
            )));
        }

        if *round.show_vote_count() {
            lines.push(Line::from(""));
            for player in round.players() {
                lines.push(Line::from(Span::styled(
                    format!("{} {}: {}", player.badge(), player.name(), player.vote_count()),
                    Style::default().fg(MUTED),
                )));
            }
        }
        frame.render_widget(
            Paragraph::new(Text::from(lines)).alignment(Alignment::Center),
            widgets::centered(area, 50, 18),
        );
    }

    fn help(round: &Round) -> &'static str {
        match round.phase() {
            Phase::Reveal if round.world_reveal().is_shown() => "Enter: Next player | Esc: Back",
            Phase::Reveal => "Enter: Reveal | Esc: Back",
            Phase::Countdown => "Enter: Start Voting | Esc: Back",
            Phase::Voting => "↑↓: Choose | Enter: Vote | Esc: Back",
            Phase::Results if round.can_reveal_spy() => "s: Reveal the spy | r: Restart Game | e: End",
            Phase::Results => "r: Restart Game | e: End",
        }
    }
}

impl Screen for GameScreen {
    fn render(&self, frame: &mut Frame, area: Rect) {
        let [header, body, help] = widgets::screen_chunks(area);
        match &self.round {
            Err(message) => {
                widgets::render_header(frame, header, "Game");
                frame.render_widget(
                    Paragraph::new(message.as_str())
                        .style(Style::default().fg(SPY))
                        .alignment(Alignment::Center),
                    widgets::centered(body, 60, 2),
                );
                widgets::render_help(frame, help, "Esc: Back | Enter: Main menu");
            }
            Ok(round) => {
                let title = match round.phase() {
                    Phase::Reveal | Phase::Countdown => "Game",
                    Phase::Voting => "Voting Phase",
                    Phase::Results => "Voting Results",
                };
                widgets::render_header(frame, header, title);
                match round.phase() {
                    Phase::Reveal => Self::render_reveal(frame, body, round),
                    Phase::Countdown => Self::render_countdown(frame, body, round),
                    Phase::Voting => self.render_voting(frame, body, round),
                    Phase::Results => Self::render_results(frame, body, round),
                }
                widgets::render_help(frame, help, Self::help(round));
            }
        }
        if let Some(alert) = &self.alert {
            widgets::render_modal(frame, "Hold on", alert, "Press any key");
        }
    }

    #[instrument(skip(self, key, _ctx))]
    fn handle_key(&mut self, key: KeyEvent, _ctx: &AppContext) -> ScreenTransition {
        if self.alert.take().is_some() {
            return ScreenTransition::Stay;
        }
        if self.round.is_err() {
            return match key.code {
                KeyCode::Esc => ScreenTransition::Back,
                KeyCode::Enter => ScreenTransition::GoTo(ScreenId::Main),
                _ => ScreenTransition::Stay,
            };
        }
        let transition = match self.handle_round_key(key) {
            Ok(transition) => transition,
            Err(e) => {
                debug!(error = %e, "Round action refused");
                self.alert = Some(e.to_string());
                ScreenTransition::Stay
            }
        };
        self.sync_ticker();
        transition
    }

    fn tick(&mut self, dt: Duration, _ctx: &AppContext) -> ScreenTransition {
        self.sync_ticker();
        let ticks = self.ticker.as_mut().map_or(0, CountdownTicker::drain);
        if let Ok(round) = &mut self.round {
            for _ in 0..ticks {
                round.tick_second();
            }
            round.advance_animations(dt);
        }
        ScreenTransition::Stay
    }
}
