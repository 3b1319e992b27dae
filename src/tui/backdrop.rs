//! Text-art backdrops drawn behind every screen.

use std::path::Path;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Paragraph},
};
use tracing::{debug, instrument, warn};

use crate::flow::ScreenId;

/// Solid colour used behind the art, and instead of it when missing.
pub const BACKDROP_COLOR: Color = Color::Rgb(0x1E, 0x03, 0x30);

const ART_COLOR: Color = Color::Rgb(0x3A, 0x1A, 0x55);

location_error!(
    /// A backdrop file could not be read.
    AssetError,
    "Asset error"
);

/// Loaded backdrop art. Missing art falls back to the solid colour.
#[derive(Debug, Clone, Default)]
pub struct Backdrops {
    main_menu: Option<String>,
    game: Option<String>,
}

impl Backdrops {
    /// Reads `main-menu.txt` and `game.txt` from `dir`, logging failures.
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let read = |name: &str| match read_art(&dir.as_ref().join(name)) {
            Ok(art) => Some(art),
            Err(e) => {
                warn!(error = %e, "Backdrop unavailable, using solid colour");
                None
            }
        };
        Self {
            main_menu: read("main-menu.txt"),
            game: read("game.txt"),
        }
    }

    /// Draws the backdrop for `screen` over `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect, screen: ScreenId) {
        let art = match screen {
            ScreenId::Main => self.main_menu.as_deref(),
            _ => self.game.as_deref(),
        };
        let background = Block::default().style(Style::default().bg(BACKDROP_COLOR));
        match art {
            Some(art) => frame.render_widget(
                Paragraph::new(art)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(ART_COLOR))
                    .block(background),
                area,
            ),
            None => frame.render_widget(background, area),
        }
    }
}

fn read_art(path: &Path) -> Result<String, AssetError> {
    let art = std::fs::read_to_string(path)
        .map_err(|e| AssetError::new(format!("Failed to read {}: {}", path.display(), e)))?;
    debug!(path = %path.display(), lines = art.lines().count(), "Loaded backdrop");
    Ok(art)
}
