//! App controller: mounts screens, routes input and runs transitions.

use std::time::Duration;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use tracing::{debug, info, instrument};

use crate::flow::{FlowController, ScreenId};
use crate::tui::backdrop::Backdrops;
use crate::tui::screen::{AppContext, Screen, ScreenTransition};
use crate::tui::screens::{
    GameModeScreen, GameScreen, IntroScreen, MainMenuScreen, PlayersScreen, SettingsScreen,
};
use crate::tui::widgets;

/// The mounted screen.
#[derive(Debug)]
enum ActiveScreen {
    Main(MainMenuScreen),
    Mode(GameModeScreen),
    Players(PlayersScreen),
    Settings(SettingsScreen),
    Intro(IntroScreen),
    Game(GameScreen),
}

impl ActiveScreen {
    #[instrument(skip(ctx))]
    fn mount(id: ScreenId, ctx: &AppContext) -> Self {
        match id {
            ScreenId::Main => Self::Main(MainMenuScreen::new()),
            ScreenId::Mode => Self::Mode(GameModeScreen::new()),
            ScreenId::Players => Self::Players(PlayersScreen::new(ctx)),
            ScreenId::Settings => Self::Settings(SettingsScreen::new(ctx)),
            ScreenId::Intro => Self::Intro(IntroScreen::new()),
            ScreenId::Game => Self::Game(GameScreen::new(ctx)),
        }
    }

    fn screen(&self) -> &dyn Screen {
        match self {
            Self::Main(s) => s,
            Self::Mode(s) => s,
            Self::Players(s) => s,
            Self::Settings(s) => s,
            Self::Intro(s) => s,
            Self::Game(s) => s,
        }
    }

    fn screen_mut(&mut self) -> &mut dyn Screen {
        match self {
            Self::Main(s) => s,
            Self::Mode(s) => s,
            Self::Players(s) => s,
            Self::Settings(s) => s,
            Self::Intro(s) => s,
            Self::Game(s) => s,
        }
    }
}

/// Drives the screen flow for one terminal session.
#[derive(Debug)]
pub struct App {
    ctx: AppContext,
    flow: FlowController,
    screen: ActiveScreen,
    backdrops: Backdrops,
    quit: bool,
}

impl App {
    /// Creates the app on the main screen.
    #[instrument(skip(ctx, backdrops))]
    pub fn new(ctx: AppContext, fade: Duration, backdrops: Backdrops) -> Self {
        info!("Creating App");
        let flow = FlowController::new(fade);
        let screen = ActiveScreen::mount(flow.current(), &ctx);
        Self {
            ctx,
            flow,
            screen,
            backdrops,
            quit: false,
        }
    }

    /// Returns `true` once the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Returns the mounted screen.
    pub fn current(&self) -> ScreenId {
        self.flow.current()
    }

    /// Draws the backdrop, the screen, and the transition fade.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        self.backdrops.render(frame, area, self.flow.current());
        self.screen.screen().render(frame, area);
        widgets::apply_fade(frame.buffer_mut(), area, self.flow.opacity());
    }

    /// Routes a key press. Input is dropped while a transition runs.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.flow.is_transitioning() {
            return;
        }
        let transition = self.screen.screen_mut().handle_key(key, &self.ctx);
        self.apply(transition);
    }

    /// Routes a mouse event. Input is dropped while a transition runs.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.flow.is_transitioning() {
            return;
        }
        let transition = self.screen.screen_mut().handle_mouse(mouse, &self.ctx);
        self.apply(transition);
    }

    /// Advances the transition and the mounted screen by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        if let Some(id) = self.flow.tick(dt) {
            debug!(screen = %id, "Mounting screen");
            self.screen = ActiveScreen::mount(id, &self.ctx);
        }
        let transition = self.screen.screen_mut().tick(dt, &self.ctx);
        self.apply(transition);
    }

    #[instrument(skip(self))]
    fn apply(&mut self, transition: ScreenTransition) {
        match transition {
            ScreenTransition::Stay => {}
            ScreenTransition::GoTo(id) => {
                self.flow.go_to(id);
            }
            ScreenTransition::Back => {
                self.flow.go_back();
            }
            ScreenTransition::Quit => {
                info!("Quit requested");
                self.quit = true;
            }
        }
    }
}
