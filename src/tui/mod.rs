//! Terminal UI.

mod app;
mod backdrop;
mod screen;
mod screens;
mod widgets;

use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use tokio::time::{Duration, sleep};
use tracing::{error, info, instrument};

pub use app::App;
pub use backdrop::{AssetError, BACKDROP_COLOR, Backdrops};
pub use screen::{AppContext, Screen, ScreenTransition};

/// How long to wait for input before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(30);

/// Sets up the terminal, runs the app until the user quits, and restores
/// the terminal even when the loop fails.
#[instrument(skip(app))]
pub async fn run(mut app: App) -> Result<()> {
    info!("Starting terminal UI");
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!(error = ?err, "Terminal UI failed");
    }
    info!("Terminal UI closed");
    result
}

async fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    <B as Backend>::Error: Send + Sync + 'static,
{
    let mut last = Instant::now();
    loop {
        let now = Instant::now();
        app.tick(now.duration_since(last));
        last = now;

        terminal.draw(|f| app.render(f))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                // Skip key release events (crossterm fires both press and release).
                Event::Key(key) if key.kind != KeyEventKind::Release => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if app.should_quit() {
            return Ok(());
        }
        sleep(Duration::from_millis(10)).await;
    }
}
