//! Round state machine: reveal, countdown, voting and results.

mod clock;
mod error;
mod phase;
mod results;
mod state;
mod ticker;

pub use clock::format_time;
pub use error::RoundError;
pub use phase::{Phase, Secret, SpyReveal, WorldReveal};
pub use results::{Outcome, RoundResults, TieBreak};
pub use state::Round;
pub use ticker::CountdownTicker;
