//! Player roster: validation, ordering, persistence and drag-to-reorder.

mod error;
mod manager;
mod player;
mod reorder;

pub use error::RosterError;
pub use manager::{MAX_NAME_LEN, RosterManager, renumber};
pub use player::{Avatar, Player, PlayerId};
pub use reorder::{DragOutcome, DragSession, DropTarget, GridLayout, Pointer};
