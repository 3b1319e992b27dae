//! Tests for screen navigation and transitions.

use std::time::Duration;

use spyx_missions::{FlowController, ScreenId, Transition};

const FADE: Duration = Duration::from_millis(200);

#[test]
fn test_back_navigation_table() {
    assert_eq!(ScreenId::Main.predecessor(), None);
    assert_eq!(ScreenId::Mode.predecessor(), Some(ScreenId::Main));
    assert_eq!(ScreenId::Players.predecessor(), Some(ScreenId::Mode));
    assert_eq!(ScreenId::Settings.predecessor(), Some(ScreenId::Players));
    assert_eq!(ScreenId::Intro.predecessor(), Some(ScreenId::Settings));
    assert_eq!(ScreenId::Game.predecessor(), Some(ScreenId::Intro));
}

#[test]
fn test_starts_on_main_fully_visible() {
    let flow = FlowController::new(FADE);
    assert_eq!(flow.current(), ScreenId::Main);
    assert!(!flow.is_transitioning());
    assert_eq!(flow.opacity(), 1.0);
}

#[test]
fn test_transition_fades_out_swaps_then_fades_in() {
    let mut flow = FlowController::new(FADE);
    assert!(flow.go_to(ScreenId::Mode));
    assert_eq!(flow.pending(), Some(ScreenId::Mode));

    assert_eq!(flow.tick(Duration::from_millis(100)), None);
    assert_eq!(flow.current(), ScreenId::Main);
    assert!((flow.opacity() - 0.5).abs() < 0.01);

    assert_eq!(flow.tick(Duration::from_millis(100)), Some(ScreenId::Mode));
    assert_eq!(flow.current(), ScreenId::Mode);
    assert!(matches!(flow.transition(), Some(Transition::FadingIn { .. })));
    assert_eq!(flow.opacity(), 0.0);

    assert_eq!(flow.tick(Duration::from_millis(200)), None);
    assert!(!flow.is_transitioning());
    assert_eq!(flow.opacity(), 1.0);
}

#[test]
fn test_requests_during_transition_are_ignored() {
    let mut flow = FlowController::new(FADE);
    assert!(flow.go_to(ScreenId::Mode));
    assert!(!flow.go_to(ScreenId::Players));
    assert!(!flow.go_back());

    flow.tick(FADE);
    assert_eq!(flow.current(), ScreenId::Mode);
    assert!(!flow.go_to(ScreenId::Players), "Still fading in");
}

#[test]
fn test_go_back_follows_predecessor() {
    let mut flow = FlowController::new(FADE);
    flow.go_to(ScreenId::Settings);
    flow.tick(FADE * 2);
    assert_eq!(flow.current(), ScreenId::Settings);
    assert!(!flow.is_transitioning());

    assert!(flow.go_back());
    flow.tick(FADE * 2);
    assert_eq!(flow.current(), ScreenId::Players);
}

#[test]
fn test_go_back_on_main_does_nothing() {
    let mut flow = FlowController::new(FADE);
    assert!(!flow.go_back());
    assert!(!flow.is_transitioning());
}

#[test]
fn test_zero_fade_swaps_immediately() {
    let mut flow = FlowController::new(Duration::ZERO);
    flow.go_to(ScreenId::Game);
    assert_eq!(flow.tick(Duration::ZERO), Some(ScreenId::Game));
    assert!(!flow.is_transitioning());
    assert_eq!(flow.opacity(), 1.0);
}
