//! Cross-dissolve between screens.

use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::flow::ScreenId;

/// Length of each half of a transition when not configured.
pub const DEFAULT_FADE: Duration = Duration::from_millis(200);

/// A transition in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The old screen is fading out.
    FadingOut {
        /// Screen that will be mounted.
        target: ScreenId,
        /// Time spent fading out.
        elapsed: Duration,
    },
    /// The new screen is fading in.
    FadingIn {
        /// Time spent fading in.
        elapsed: Duration,
    },
}

/// Tracks the active screen and the transition, if any.
///
/// Only one transition runs at a time; requests made while one is in
/// flight are dropped.
#[derive(Debug, Clone)]
pub struct FlowController {
    current: ScreenId,
    transition: Option<Transition>,
    fade: Duration,
}

impl Default for FlowController {
    fn default() -> Self {
        Self::new(DEFAULT_FADE)
    }
}

impl FlowController {
    /// Starts on the main screen with no transition.
    pub fn new(fade: Duration) -> Self {
        Self {
            current: ScreenId::Main,
            transition: None,
            fade,
        }
    }

    /// Returns the mounted screen.
    pub fn current(&self) -> ScreenId {
        self.current
    }

    /// Returns the transition in flight.
    pub fn transition(&self) -> Option<Transition> {
        self.transition
    }

    /// Returns `true` while a transition runs.
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Returns the screen being faded to, before the swap.
    pub fn pending(&self) -> Option<ScreenId> {
        match self.transition {
            Some(Transition::FadingOut { target, .. }) => Some(target),
            _ => None,
        }
    }

    /// Starts a transition to `target`.
    ///
    /// Returns `false` if a transition is already in flight.
    #[instrument(skip(self), fields(from = %self.current))]
    pub fn go_to(&mut self, target: ScreenId) -> bool {
        if self.transition.is_some() {
            debug!(%target, "Transition in flight, request ignored");
            return false;
        }
        info!(%target, "Screen transition started");
        self.transition = Some(Transition::FadingOut {
            target,
            elapsed: Duration::ZERO,
        });
        true
    }

    /// Goes to the current screen's predecessor.
    ///
    /// Returns `false` on the main screen or while a transition runs.
    #[instrument(skip(self), fields(from = %self.current))]
    pub fn go_back(&mut self) -> bool {
        match self.current.predecessor() {
            Some(previous) => self.go_to(previous),
            None => {
                debug!("No screen before main");
                false
            }
        }
    }

    /// Advances the transition by `dt`.
    ///
    /// Returns the newly mounted screen at the moment of the swap.
    pub fn tick(&mut self, dt: Duration) -> Option<ScreenId> {
        let transition = self.transition?;
        match transition {
            Transition::FadingOut { target, elapsed } => {
                let elapsed = elapsed.saturating_add(dt);
                if elapsed < self.fade {
                    self.transition = Some(Transition::FadingOut { target, elapsed });
                    return None;
                }
                let carried = (elapsed - self.fade).min(self.fade);
                self.current = target;
                self.transition = if carried >= self.fade {
                    None
                } else {
                    Some(Transition::FadingIn { elapsed: carried })
                };
                debug!(screen = %target, "Screen swapped");
                Some(target)
            }
            Transition::FadingIn { elapsed } => {
                let elapsed = elapsed.saturating_add(dt);
                self.transition = if elapsed >= self.fade {
                    None
                } else {
                    Some(Transition::FadingIn { elapsed })
                };
                None
            }
        }
    }

    /// Opacity of the mounted screen, `0.0..=1.0`.
    pub fn opacity(&self) -> f32 {
        let ratio = |elapsed: Duration| {
            if self.fade.is_zero() {
                1.0
            } else {
                (elapsed.as_secs_f32() / self.fade.as_secs_f32()).clamp(0.0, 1.0)
            }
        };
        match self.transition {
            None => 1.0,
            Some(Transition::FadingOut { elapsed, .. }) => 1.0 - ratio(elapsed),
            Some(Transition::FadingIn { elapsed }) => ratio(elapsed),
        }
    }
}
