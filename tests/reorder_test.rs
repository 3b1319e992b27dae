//! Tests for drag-to-reorder geometry and sessions.

use spyx_missions::{
    Avatar, DragOutcome, DragSession, DropTarget, GridLayout, Player, PlayerId, Pointer,
};

fn layout() -> GridLayout {
    // Cells are 10x4 starting at (5, 2); the bottom 3 rows of a 30-row
    // viewport are the trash zone.
    GridLayout::new(Pointer::new(5, 2), 10, 4, 30, 3)
}

fn players(count: usize) -> Vec<Player> {
    (0..count)
        .map(|i| Player::new(PlayerId::new(format!("p{}", i)), format!("P{}", i), Avatar::Fox, i))
        .collect()
}

#[test]
fn test_drop_target_maps_pointer_to_slot() {
    let grid = layout();
    assert_eq!(grid.drop_target(Pointer::new(5, 2), 5), DropTarget::Slot(0));
    assert_eq!(grid.drop_target(Pointer::new(16, 3), 5), DropTarget::Slot(1));
    assert_eq!(grid.drop_target(Pointer::new(34, 5), 5), DropTarget::Slot(2));
    assert_eq!(grid.drop_target(Pointer::new(15, 6), 5), DropTarget::Slot(4));
}

#[test]
fn test_drop_target_outside_grid() {
    let grid = layout();
    assert_eq!(grid.drop_target(Pointer::new(4, 2), 5), DropTarget::Outside);
    assert_eq!(grid.drop_target(Pointer::new(35, 2), 5), DropTarget::Outside);
    // Row 1, column 2 would be index 5 in a roster of 5.
    assert_eq!(grid.drop_target(Pointer::new(26, 6), 5), DropTarget::Outside);
}

#[test]
fn test_drop_target_trash_zone_wins() {
    let grid = layout();
    assert_eq!(grid.drop_target(Pointer::new(5, 27), 5), DropTarget::Trash);
    assert_eq!(grid.drop_target(Pointer::new(200, 29), 5), DropTarget::Trash);
    assert_eq!(grid.drop_target(Pointer::new(5, 26), 30), DropTarget::Slot(18));
}

#[test]
fn test_slot_origin_inverts_drop_target() {
    let grid = layout();
    for index in 0..6 {
        let origin = grid.slot_origin(index);
        assert_eq!(grid.drop_target(origin, 6), DropTarget::Slot(index));
    }
}

#[test]
fn test_drag_preview_displaces_players() {
    let roster = players(4);
    let mut drag = DragSession::start(&roster, roster[0].id()).expect("Drag failed");
    assert_eq!(drag.preview(), vec![0, 1, 2, 3]);

    assert!(drag.hover(DropTarget::Slot(2)));
    assert_eq!(drag.preview(), vec![1, 2, 0, 3]);

    assert!(!drag.hover(DropTarget::Slot(2)));
}

#[test]
fn test_hovering_own_slot_clears_target() {
    let roster = players(3);
    let mut drag = DragSession::start(&roster, roster[1].id()).expect("Drag failed");
    drag.hover(DropTarget::Slot(0));
    drag.hover(DropTarget::Slot(1));
    assert_eq!(*drag.target(), None);
    assert_eq!(drag.release(), DragOutcome::Cancel);
}

#[test]
fn test_release_on_slot_reorders() {
    let roster = players(3);
    let mut drag = DragSession::start(&roster, roster[2].id()).expect("Drag failed");
    drag.hover(DropTarget::Slot(0));
    assert_eq!(
        drag.release(),
        DragOutcome::Reorder {
            id: roster[2].id().clone(),
            target: 0
        }
    );
}

#[test]
fn test_release_over_trash_deletes() {
    let roster = players(3);
    let mut drag = DragSession::start(&roster, roster[1].id()).expect("Drag failed");
    drag.hover(DropTarget::Slot(2));
    drag.hover(DropTarget::Trash);
    assert!(*drag.over_trash());
    assert_eq!(drag.preview(), vec![0, 1, 2]);
    assert_eq!(
        drag.release(),
        DragOutcome::Delete {
            id: roster[1].id().clone()
        }
    );
}

#[test]
fn test_release_outside_cancels() {
    let roster = players(3);
    let mut drag = DragSession::start(&roster, roster[0].id()).expect("Drag failed");
    drag.hover(DropTarget::Slot(1));
    drag.hover(DropTarget::Outside);
    assert_eq!(drag.release(), DragOutcome::Cancel);
}

#[test]
fn test_drag_unknown_player_does_not_start() {
    let roster = players(2);
    assert!(DragSession::start(&roster, &PlayerId::new("ghost")).is_none());
}
