//! Round phases and the timed reveal sub-states.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Fade-in of the secret card.
pub const CARD_FADE: Duration = Duration::from_millis(500);
/// Fade-out of the outcome text before the spy is shown.
pub const SPY_FADE_OUT: Duration = Duration::from_millis(500);
/// Blank pause between fade-out and fade-in.
pub const SPY_PAUSE: Duration = Duration::from_secs(1);
/// Fade-in of the spy's identity.
pub const SPY_FADE_IN: Duration = Duration::from_millis(500);

/// Where a round is in its turn sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum Phase {
    /// Players look at their card one by one.
    Reveal,
    /// Discussion with a running clock.
    Countdown,
    /// Players vote one by one.
    Voting,
    /// The accused player and the outcome are shown.
    Results,
}

/// What the current player sees when revealing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Secret {
    /// The assigned world's name.
    World(String),
    /// The spy does not learn the world.
    Spy,
}

/// Visibility of the current player's card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorldReveal {
    /// Only the avatar is shown.
    #[default]
    Hidden,
    /// The card is fading in or fully visible.
    Shown {
        /// Time since the reveal.
        elapsed: Duration,
    },
}

impl WorldReveal {
    /// Opacity of the card, `0.0..=1.0`.
    pub fn opacity(&self) -> f32 {
        match self {
            Self::Hidden => 0.0,
            Self::Shown { elapsed } => ratio(*elapsed, CARD_FADE),
        }
    }

    /// Returns `true` once the card has been revealed.
    pub fn is_shown(&self) -> bool {
        matches!(self, Self::Shown { .. })
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        if let Self::Shown { elapsed } = self {
            *elapsed = elapsed.saturating_add(dt).min(CARD_FADE);
        }
    }
}

/// Revealing the real spy after the spy escaped.
///
/// `Hidden` shows the outcome, `FadingOut` fades it away and `Revealed`
/// waits out the pause before fading the spy in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpyReveal {
    /// Outcome text visible.
    #[default]
    Hidden,
    /// Outcome text fading out.
    FadingOut {
        /// Time since the fade-out began.
        elapsed: Duration,
    },
    /// Pause, then the spy fades in.
    Revealed {
        /// Time since the fade-out finished.
        elapsed: Duration,
    },
}

impl SpyReveal {
    /// Opacity of whatever is currently drawn: the outcome text while
    /// `Hidden` or `FadingOut`, the spy while `Revealed`.
    pub fn opacity(&self) -> f32 {
        match self {
            Self::Hidden => 1.0,
            Self::FadingOut { elapsed } => 1.0 - ratio(*elapsed, SPY_FADE_OUT),
            Self::Revealed { elapsed } => {
                ratio(elapsed.saturating_sub(SPY_PAUSE), SPY_FADE_IN)
            }
        }
    }

    /// Returns `true` when the spy's identity is drawn.
    pub fn shows_spy(&self) -> bool {
        matches!(self, Self::Revealed { .. })
    }

    /// Returns `true` when no further ticks change the state.
    pub fn is_settled(&self) -> bool {
        match self {
            Self::Hidden => true,
            Self::FadingOut { .. } => false,
            Self::Revealed { elapsed } => *elapsed >= SPY_PAUSE + SPY_FADE_IN,
        }
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        *self = match *self {
            Self::Hidden => Self::Hidden,
            Self::FadingOut { elapsed } => {
                let elapsed = elapsed.saturating_add(dt);
                match elapsed.checked_sub(SPY_FADE_OUT) {
                    Some(over) => Self::Revealed {
                        elapsed: over.min(SPY_PAUSE + SPY_FADE_IN),
                    },
                    None => Self::FadingOut { elapsed },
                }
            }
            Self::Revealed { elapsed } => Self::Revealed {
                elapsed: elapsed.saturating_add(dt).min(SPY_PAUSE + SPY_FADE_IN),
            },
        };
    }
}

fn ratio(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
}
