//! Roster editor: a three-column grid with drag-to-reorder.

use std::cell::Cell;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tracing::{debug, info, instrument, warn};

use crate::flow::ScreenId;
use crate::roster::{
    Avatar, DragOutcome, DragSession, DropTarget, GridLayout, MAX_NAME_LEN, PlayerId, Pointer,
    RosterManager,
};
use crate::settings::MIN_PLAYERS;
use crate::tui::screen::{AppContext, Screen, ScreenTransition};
use crate::tui::widgets::{self, ACCENT, MUTED, SPY};

const CELL_WIDTH: u16 = 18;
const CELL_HEIGHT: u16 = 5;
const TRASH_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Name,
    Avatar,
}

#[derive(Debug, Clone)]
struct PlayerForm {
    editing: Option<PlayerId>,
    name: String,
    avatar: Option<Avatar>,
    cursor: usize,
    focus: FormField,
    error: Option<String>,
}

impl PlayerForm {
    fn add() -> Self {
        Self {
            editing: None,
            name: String::new(),
            avatar: None,
            cursor: 0,
            focus: FormField::Name,
            error: None,
        }
    }

    fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Player"
        } else {
            "Add New Player"
        }
    }

    fn confirm_label(&self) -> &'static str {
        if self.editing.is_some() {
            "Save Changes"
        } else {
            "Add Player"
        }
    }
}

#[derive(Debug, Clone)]
enum Mode {
    Browse,
    Form(PlayerForm),
    ConfirmDelete(PlayerId),
    Alert(String),
}

/// State for the roster screen.
#[derive(Debug)]
pub struct PlayersScreen {
    roster: RosterManager,
    selected: usize,
    mode: Mode,
    drag: Option<DragSession>,
    layout: Cell<Option<GridLayout>>,
}

impl PlayersScreen {
    /// Loads the stored roster.
    #[instrument(skip(ctx))]
    pub fn new(ctx: &AppContext) -> Self {
        let roster = RosterManager::load(ctx.store.clone());
        debug!(count = roster.len(), "Initializing PlayersScreen");
        Self {
            roster,
            selected: 0,
            mode: Mode::Browse,
            drag: None,
            layout: Cell::new(None),
        }
    }

    fn selected_id(&self) -> Option<PlayerId> {
        self.roster.players().get(self.selected).map(|p| p.id().clone())
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.roster.len().saturating_sub(1));
    }

    fn move_selection(&mut self, delta: isize) {
        if self.roster.is_empty() {
            return;
        }
        let last = self.roster.len() as isize - 1;
        self.selected = (self.selected as isize + delta).clamp(0, last) as usize;
    }

    /// Moves the selected player one slot left or right.
    #[instrument(skip(self))]
    fn shift_selected(&mut self, delta: isize) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let target = self.selected as isize + delta;
        if target < 0 || target as usize >= self.roster.len() {
            return;
        }
        match self.roster.reorder(&id, target as usize) {
            Ok(()) => self.selected = target as usize,
            Err(e) => self.mode = Mode::Alert(e.to_string()),
        }
    }

    fn open_editor(&mut self) {
        if let Some(player) = self.roster.players().get(self.selected) {
            self.mode = Mode::Form(PlayerForm {
                editing: Some(player.id().clone()),
                name: player.name().clone(),
                avatar: *player.avatar(),
                cursor: player.name().chars().count(),
                focus: FormField::Name,
                error: None,
            });
        }
    }

    #[instrument(skip(self, form), fields(editing = ?form.editing))]
    fn submit(&mut self, mut form: PlayerForm) {
        let result = match &form.editing {
            Some(id) => self.roster.edit(id, &form.name, form.avatar).map(|_| ()),
            None => self.roster.add(&form.name, form.avatar).map(|_| ()),
        };
        match result {
            Ok(()) => {
                if form.editing.is_none() {
                    self.selected = self.roster.len().saturating_sub(1);
                }
                self.mode = Mode::Browse;
            }
            Err(e) => {
                debug!(error = %e, "Player form rejected");
                form.error = Some(e.to_string());
                self.mode = Mode::Form(form);
            }
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> ScreenTransition {
        let shifted = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Left if shifted => self.shift_selected(-1),
            KeyCode::Right if shifted => self.shift_selected(1),
            KeyCode::Left => self.move_selection(-1),
            KeyCode::Right => self.move_selection(1),
            KeyCode::Up => self.move_selection(-(GridLayout::COLUMNS as isize)),
            KeyCode::Down => self.move_selection(GridLayout::COLUMNS as isize),
            KeyCode::Char('a') | KeyCode::Char('A') => self.mode = Mode::Form(PlayerForm::add()),
            KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter => self.open_editor(),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.mode = Mode::ConfirmDelete(id);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Tab => {
                if self.roster.len() < MIN_PLAYERS {
                    self.mode = Mode::Alert(format!(
                        "Add at least {} players to continue",
                        MIN_PLAYERS
                    ));
                } else {
                    info!(count = self.roster.len(), "Roster complete");
                    return ScreenTransition::GoTo(ScreenId::Settings);
                }
            }
            KeyCode::Esc | KeyCode::Backspace => return ScreenTransition::Back,
            _ => {}
        }
        ScreenTransition::Stay
    }

    fn handle_form_key(&mut self, mut form: PlayerForm, key: KeyEvent) {
        match (form.focus, key.code) {
            (_, KeyCode::Esc) => {
                self.mode = Mode::Browse;
                return;
            }
            (_, KeyCode::Enter) => {
                self.submit(form);
                return;
            }
            (_, KeyCode::Tab) | (_, KeyCode::BackTab) => {
                form.focus = match form.focus {
                    FormField::Name => FormField::Avatar,
                    FormField::Avatar => FormField::Name,
                };
            }
            (FormField::Name, KeyCode::Char(c)) => {
                let byte = byte_index(&form.name, form.cursor);
                form.name.insert(byte, c);
                form.cursor += 1;
            }
            (FormField::Name, KeyCode::Backspace) if form.cursor > 0 => {
                form.cursor -= 1;
                let byte = byte_index(&form.name, form.cursor);
                form.name.remove(byte);
            }
            (FormField::Name, KeyCode::Left) => form.cursor = form.cursor.saturating_sub(1),
            (FormField::Name, KeyCode::Right) => {
                form.cursor = (form.cursor + 1).min(form.name.chars().count());
            }
            (FormField::Avatar, KeyCode::Left) => form.avatar = Some(cycle_avatar(form.avatar, -1)),
            (FormField::Avatar, KeyCode::Right) | (FormField::Avatar, KeyCode::Char(' ')) => {
                form.avatar = Some(cycle_avatar(form.avatar, 1));
            }
            (FormField::Avatar, KeyCode::Char(c)) => {
                if let Some(avatar) = Avatar::from_id(&c.to_string()) {
                    form.avatar = Some(avatar);
                }
            }
            _ => {}
        }
        form.error = None;
        self.mode = Mode::Form(form);
    }

    fn confirm_delete(&mut self, id: &PlayerId) {
        match self.roster.delete(id) {
            Ok(player) => info!(player_id = %player.id(), "Player removed"),
            Err(e) => warn!(error = %e, "Delete failed"),
        }
        self.clamp_selection();
        self.mode = Mode::Browse;
    }

    fn grid_layout(area: Rect, body: Rect) -> GridLayout {
        let grid_width = CELL_WIDTH * GridLayout::COLUMNS as u16;
        let origin_x = body.x + body.width.saturating_sub(grid_width) / 2;
        GridLayout::new(
            Pointer::new(i32::from(origin_x), i32::from(body.y)),
            i32::from(CELL_WIDTH),
            i32::from(CELL_HEIGHT),
            i32::from(area.bottom()),
            i32::from(TRASH_HEIGHT),
        )
    }

    fn render_grid(&self, frame: &mut Frame, layout: &GridLayout, body: Rect) {
        let players = self.roster.players();
        let order: Vec<usize> = match &self.drag {
            Some(drag) => drag.preview(),
            None => (0..players.len()).collect(),
        };
        for (slot, &index) in order.iter().enumerate() {
            let Some(player) = players.get(index) else {
                continue;
            };
            let origin = layout.slot_origin(slot);
            let cell = Rect::new(
                u16::try_from(origin.x).unwrap_or(0),
                u16::try_from(origin.y).unwrap_or(0),
                CELL_WIDTH,
                CELL_HEIGHT,
            )
            .intersection(body);
            if cell.is_empty() {
                continue;
            }
            let dragged = self
                .drag
                .as_ref()
                .is_some_and(|d| d.dragged() == player.id());
            let border = if dragged {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
            } else if self.drag.is_none() && index == self.selected {
                Style::default().fg(ACCENT)
            } else {
                Style::default().fg(MUTED)
            };
            let text = Text::from(vec![
                Line::from(player.badge()),
                Line::from(Span::styled(
                    player.name().clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
            ]);
            let tile = Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(border),
            );
            frame.render_widget(tile, cell);
        }
        if players.is_empty() {
            let empty = Paragraph::new("No players yet. Press 'a' to add one.")
                .style(Style::default().fg(MUTED))
                .alignment(Alignment::Center);
            frame.render_widget(empty, widgets::centered(body, 40, 1));
        }
    }

    fn render_trash(&self, frame: &mut Frame, area: Rect) {
        let over = self.drag.as_ref().is_some_and(|d| *d.over_trash());
        let style = if over {
            Style::default().fg(Color::White).bg(SPY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(SPY)
        };
        let trash = Paragraph::new("🗑  Drop here to delete")
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP).border_style(Style::default().fg(SPY)));
        frame.render_widget(trash, area);
    }

    fn render_form(&self, frame: &mut Frame, form: &PlayerForm) {
        let area = widgets::centered(frame.area(), 50, 13);
        frame.render_widget(Clear, area);
        let block = widgets::titled_block(form.title());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [name_area, avatar_title, avatar_area, error_area, hint_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .areas(inner);

        let focus_style = |field: FormField| {
            if form.focus == field {
                Style::default().fg(ACCENT)
            } else {
                Style::default().fg(MUTED)
            }
        };
        let name = Paragraph::new(form.name.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(FormField::Name))
                .title(format!("Name ({} max)", MAX_NAME_LEN)),
        );
        frame.render_widget(name, name_area);
        if form.focus == FormField::Name {
            let x = name_area.x + 1 + u16::try_from(form.cursor).unwrap_or(0);
            frame.set_cursor_position((x.min(name_area.right().saturating_sub(2)), name_area.y + 1));
        }

        frame.render_widget(
            Paragraph::new("Choose Avatar").style(focus_style(FormField::Avatar)),
            avatar_title,
        );
        let avatars: Vec<Span> = Avatar::all()
            .into_iter()
            .flat_map(|avatar| {
                let style = if form.avatar == Some(avatar) {
                    Style::default().bg(ACCENT)
                } else {
                    Style::default()
                };
                [
                    Span::styled(format!(" {} {} ", avatar.id(), avatar.glyph()), style),
                    Span::raw(" "),
                ]
            })
            .collect();
        frame.render_widget(
            Paragraph::new(Line::from(avatars)).alignment(Alignment::Center),
            avatar_area,
        );

        if let Some(error) = &form.error {
            frame.render_widget(
                Paragraph::new(error.as_str())
                    .style(Style::default().fg(SPY))
                    .alignment(Alignment::Center),
                error_area,
            );
        }
        frame.render_widget(
            Paragraph::new(format!(
                "Tab: Switch field | Enter: {} | Esc: Cancel",
                form.confirm_label()
            ))
            .style(Style::default().fg(MUTED))
            .alignment(Alignment::Center),
            hint_area,
        );
    }
}

impl Screen for PlayersScreen {
    fn render(&self, frame: &mut Frame, area: Rect) {
        let [header, body, help] = widgets::screen_chunks(area);
        widgets::render_header(
            frame,
            header,
            &format!("Players ({})", self.roster.len()),
        );

        let layout = Self::grid_layout(area, body);
        self.layout.set(Some(layout));
        self.render_grid(frame, &layout, body);

        if self.drag.is_some() {
            self.render_trash(frame, help);
        } else {
            widgets::render_help(
                frame,
                help,
                "a: Add | e: Edit | d: Delete | Shift+←→: Move | drag: Reorder | n: Next | Esc: Back",
            );
        }

        match &self.mode {
            Mode::Browse => {}
            Mode::Form(form) => self.render_form(frame, form),
            Mode::ConfirmDelete(id) => {
                let name = self
                    .roster
                    .get(id)
                    .map(|p| p.name().clone())
                    .unwrap_or_default();
                widgets::render_modal(
                    frame,
                    "Delete Player",
                    &format!("Are you sure you want to delete {}?", name),
                    "y: Delete | n: Cancel",
                );
            }
            Mode::Alert(message) => {
                widgets::render_modal(frame, "Error", message, "Press any key");
            }
        }
    }

    #[instrument(skip(self, key, _ctx))]
    fn handle_key(&mut self, key: KeyEvent, _ctx: &AppContext) -> ScreenTransition {
        match std::mem::replace(&mut self.mode, Mode::Browse) {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Form(form) => {
                self.handle_form_key(form, key);
                ScreenTransition::Stay
            }
            Mode::ConfirmDelete(id) => {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                        self.confirm_delete(&id)
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
                    _ => self.mode = Mode::ConfirmDelete(id),
                }
                ScreenTransition::Stay
            }
            Mode::Alert(_) => ScreenTransition::Stay,
        }
    }

    #[instrument(level = "trace", skip(self, mouse, _ctx))]
    fn handle_mouse(&mut self, mouse: MouseEvent, _ctx: &AppContext) -> ScreenTransition {
        if !matches!(self.mode, Mode::Browse) {
            return ScreenTransition::Stay;
        }
        let Some(layout) = self.layout.get() else {
            return ScreenTransition::Stay;
        };
        let pointer = Pointer::new(i32::from(mouse.column), i32::from(mouse.row));
        let len = self.roster.len();

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let DropTarget::Slot(index) = layout.drop_target(pointer, len)
                    && let Some(id) = self.roster.players().get(index).map(|p| p.id().clone())
                {
                    self.selected = index;
                    self.drag = DragSession::start(self.roster.players(), &id);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(drag) = self.drag.as_mut() {
                    drag.hover(layout.drop_target(pointer, len));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(drag) = self.drag.take() {
                    match drag.release() {
                        DragOutcome::Reorder { id, target } => match self.roster.reorder(&id, target) {
                            Ok(()) => self.selected = target,
                            Err(e) => self.mode = Mode::Alert(e.to_string()),
                        },
                        DragOutcome::Delete { id } => self.mode = Mode::ConfirmDelete(id),
                        DragOutcome::Cancel => {}
                    }
                }
            }
            _ => {}
        }
        ScreenTransition::Stay
    }
}

fn byte_index(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

fn cycle_avatar(current: Option<Avatar>, step: isize) -> Avatar {
    let all = Avatar::all();
    let len = all.len() as isize;
    let index = match current.and_then(|a| all.iter().position(|b| *b == a)) {
        Some(i) => (i as isize + step).rem_euclid(len),
        None if step < 0 => len - 1,
        None => 0,
    };
    all[index as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_avatar_wraps_both_ways() {
        assert_eq!(cycle_avatar(None, 1), Avatar::Fedora);
        assert_eq!(cycle_avatar(None, -1), Avatar::Cat);
        assert_eq!(cycle_avatar(Some(Avatar::Cat), 1), Avatar::Fedora);
        assert_eq!(cycle_avatar(Some(Avatar::Fedora), -1), Avatar::Cat);
    }

    #[test]
    fn test_byte_index_handles_multibyte_names() {
        assert_eq!(byte_index("Zoë", 2), 2);
        assert_eq!(byte_index("Zoë", 3), "Zoë".len());
    }
}
