//! Drag-to-reorder geometry.
//!
//! Pointer positions are mapped to grid slots by a pure function so the
//! gesture can be tested without any input or animation layer.

use derive_getters::Getters;
use derive_new::new;
use tracing::{debug, instrument};

use crate::roster::{Player, PlayerId};

/// A pointer position in layout units (terminal cells in the TUI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct Pointer {
    /// Horizontal position.
    pub x: i32,
    /// Vertical position.
    pub y: i32,
}

/// Where a dragged player would land if released now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Over the grid slot with this index.
    Slot(usize),
    /// Over the reserved delete zone at the bottom of the viewport.
    Trash,
    /// Anywhere else.
    Outside,
}

/// Fixed-size grid the roster is laid out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct GridLayout {
    origin_x: i32,
    origin_y: i32,
    cell_width: i32,
    cell_height: i32,
    columns: usize,
    viewport_height: i32,
    trash_zone_height: i32,
}

impl GridLayout {
    /// Number of columns in the roster grid.
    pub const COLUMNS: usize = 3;

    /// Creates a three-column layout. Cell sizes are clamped to at least 1.
    pub fn new(
        origin: Pointer,
        cell_width: i32,
        cell_height: i32,
        viewport_height: i32,
        trash_zone_height: i32,
    ) -> Self {
        Self {
            origin_x: origin.x,
            origin_y: origin.y,
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
            columns: Self::COLUMNS,
            viewport_height,
            trash_zone_height,
        }
    }

    /// Returns `true` if the pointer is inside the bottom delete zone.
    pub fn is_over_trash(&self, pointer: Pointer) -> bool {
        pointer.y >= self.viewport_height - self.trash_zone_height
    }

    /// Maps a pointer to a drop target for a roster of `len` players.
    #[instrument(level = "trace")]
    pub fn drop_target(&self, pointer: Pointer, len: usize) -> DropTarget {
        if self.is_over_trash(pointer) {
            return DropTarget::Trash;
        }
        let dx = pointer.x - self.origin_x;
        let dy = pointer.y - self.origin_y;
        if dx < 0 || dy < 0 {
            return DropTarget::Outside;
        }
        let col = (dx / self.cell_width) as usize;
        if col >= self.columns {
            return DropTarget::Outside;
        }
        let row = (dy / self.cell_height) as usize;
        let index = row * self.columns + col;
        if index < len {
            DropTarget::Slot(index)
        } else {
            DropTarget::Outside
        }
    }

    /// Returns the top-left corner of slot `index`.
    pub fn slot_origin(&self, index: usize) -> Pointer {
        let row = (index / self.columns) as i32;
        let col = (index % self.columns) as i32;
        Pointer::new(
            self.origin_x + col * self.cell_width,
            self.origin_y + row * self.cell_height,
        )
    }
}

/// What releasing a drag should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Move the player to a new slot.
    Reorder {
        /// Dragged player.
        id: PlayerId,
        /// Destination slot.
        target: usize,
    },
    /// Delete the player, after confirmation.
    Delete {
        /// Dragged player.
        id: PlayerId,
    },
    /// Put everything back.
    Cancel,
}

/// An in-progress drag of one roster player.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct DragSession {
    dragged: PlayerId,
    from: usize,
    len: usize,
    target: Option<usize>,
    over_trash: bool,
}

impl DragSession {
    /// Starts dragging `id`. Returns `None` if the player is not in `players`.
    #[instrument(skip(players))]
    pub fn start(players: &[Player], id: &PlayerId) -> Option<Self> {
        let from = players.iter().position(|p| p.id() == id)?;
        debug!(player_id = %id, from, "Drag started");
        Some(Self {
            dragged: id.clone(),
            from,
            len: players.len(),
            target: None,
            over_trash: false,
        })
    }

    /// Updates the live target. Returns `true` if the target changed.
    ///
    /// Hovering the dragged player's own slot, an empty cell or the trash
    /// clears the target so the other players settle back.
    #[instrument(level = "trace", skip(self))]
    pub fn hover(&mut self, drop: DropTarget) -> bool {
        let previous = (self.target, self.over_trash);
        match drop {
            DropTarget::Slot(index) if index != self.from => {
                self.target = Some(index);
                self.over_trash = false;
            }
            DropTarget::Slot(_) | DropTarget::Outside => {
                self.target = None;
                self.over_trash = false;
            }
            DropTarget::Trash => {
                self.target = None;
                self.over_trash = true;
            }
        }
        let changed = previous != (self.target, self.over_trash);
        if changed {
            debug!(slot = ?self.target, over_trash = self.over_trash, "Drop target changed");
        }
        changed
    }

    /// Returns the display order while dragging: `preview[slot]` is the
    /// roster index shown in that slot.
    pub fn preview(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.len).collect();
        if let Some(target) = self.target
            && self.from < self.len
            && target < self.len
        {
            let dragged = order.remove(self.from);
            order.insert(target, dragged);
        }
        order
    }

    /// Ends the drag.
    #[instrument(skip(self))]
    pub fn release(self) -> DragOutcome {
        let outcome = if self.over_trash {
            DragOutcome::Delete { id: self.dragged }
        } else if let Some(target) = self.target {
            DragOutcome::Reorder {
                id: self.dragged,
                target,
            }
        } else {
            DragOutcome::Cancel
        };
        debug!(?outcome, "Drag released");
        outcome
    }
}
