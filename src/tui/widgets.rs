//! Shared drawing helpers.

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

/// Below this opacity a cell is not drawn at all.
const INVISIBLE_BELOW: f32 = 0.2;
/// Below this opacity a cell is drawn dimmed.
const DIM_BELOW: f32 = 0.7;

/// Accent used for titles and highlights.
pub const ACCENT: Color = Color::Rgb(0xB4, 0x8C, 0xFF);
/// Colour of the spy label.
pub const SPY: Color = Color::Rgb(0xFF, 0x4D, 0x6D);
/// Muted text.
pub const MUTED: Color = Color::Rgb(0x8D, 0x8D, 0x8D);

/// A bordered block with a centred title.
pub fn titled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(MUTED))
        .title(Line::from(title).alignment(Alignment::Center))
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
}

/// Splits `area` into header, body and help bar.
pub fn screen_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Draws the screen title.
pub fn render_header(frame: &mut Frame, area: Rect, title: &str) {
    let header = Paragraph::new(title)
        .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(MUTED)));
    frame.render_widget(header, area);
}

/// Draws the key help line.
pub fn render_help(frame: &mut Frame, area: Rect, help: &str) {
    let help = Paragraph::new(help)
        .style(Style::default().fg(MUTED))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP).border_style(Style::default().fg(MUTED)));
    frame.render_widget(help, area);
}

/// Returns a rectangle of the given size centred in `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

/// Draws a modal message box over everything else.
pub fn render_modal(frame: &mut Frame, title: &str, message: &str, hint: &str) {
    let area = centered(frame.area(), 46, 9);
    frame.render_widget(Clear, area);
    let text = Text::from(vec![
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(hint.to_string()).style(Style::default().fg(MUTED)),
    ]);
    let modal = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(titled_block(title));
    frame.render_widget(modal, area);
}

/// Fades the already drawn contents of `area` towards the background.
pub fn apply_fade(buffer: &mut Buffer, area: Rect, opacity: f32) {
    if opacity >= DIM_BELOW {
        return;
    }
    let area = area.intersection(buffer.area);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buffer.cell_mut((x, y)) {
                if opacity < INVISIBLE_BELOW {
                    cell.set_symbol(" ");
                } else {
                    cell.modifier.insert(Modifier::DIM);
                }
            }
        }
    }
}

/// Style for text drawn at `opacity`.
pub fn faded(style: Style, opacity: f32) -> Style {
    if opacity < INVISIBLE_BELOW {
        style.fg(Color::Reset).add_modifier(Modifier::HIDDEN)
    } else if opacity < DIM_BELOW {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_fade_blanks_cells_when_nearly_transparent() {
        let area = Rect::new(0, 0, 4, 1);
        let mut buffer = Buffer::with_lines(["spy!"]);
        apply_fade(&mut buffer, area, 0.1);
        assert_eq!(buffer, Buffer::with_lines(["    "]));
    }

    #[test]
    fn test_apply_fade_leaves_opaque_cells() {
        let area = Rect::new(0, 0, 4, 1);
        let mut buffer = Buffer::with_lines(["spy!"]);
        apply_fade(&mut buffer, area, 1.0);
        assert_eq!(buffer, Buffer::with_lines(["spy!"]));
    }
}
