#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn polyline_modes() {
    assert!(DrawingMode::Wall.is_polyline());
    assert!(DrawingMode::Room.is_polyline());
    assert!(!DrawingMode::Door.is_polyline());
    assert!(!DrawingMode::Select.is_polyline());
}

#[test]
fn select_does_not_snap() {
    assert!(!DrawingMode::Select.snaps());
    assert!(DrawingMode::Door.snaps());
    assert!(DrawingMode::Text.snaps());
}

#[test]
fn keys_recognised() {
    assert!(Key("Enter".into()).is_enter());
    assert!(Key("Escape".into()).is_escape());
    assert!(Key("Backspace".into()).is_delete());
    assert!(Key("Delete".into()).is_delete());
    assert!(!Key("a".into()).is_delete());
}

#[test]
fn pointer_down_defaults_button_and_modifiers() {
    let event: InputEvent = serde_json::from_str(r#"{"type":"pointer_down","point":{"x":1,"y":2}}"#).unwrap();
    assert_eq!(
        event,
        InputEvent::PointerDown { point: Point::new(1.0, 2.0), button: Button::Primary, modifiers: Modifiers::default() }
    );
}

#[test]
fn key_down_parses_plain_string_key() {
    let event: InputEvent =
        serde_json::from_str(r#"{"type":"key_down","key":"Escape","modifiers":{"shift":true}}"#).unwrap();
    let InputEvent::KeyDown { key, modifiers } = event else {
        panic!("expected key_down");
    };
    assert!(key.is_escape());
    assert!(modifiers.shift);
    assert!(!modifiers.ctrl);
}

#[test]
fn unknown_event_type_is_rejected() {
    assert!(serde_json::from_str::<InputEvent>(r#"{"type":"wheel","point":{"x":0,"y":0}}"#).is_err());
}

#[test]
fn ui_state_follows_config() {
    let config = EngineConfig { scale: 0.5, show_grid: false, door_width_mm: 800.0, ..EngineConfig::default() };
    let ui = UiState::from_config(&config);
    assert_eq!(ui.mode, DrawingMode::Select);
    assert_eq!(ui.scale, 0.5);
    assert!(!ui.show_grid);
    assert_eq!(ui.door_width_mm, 800.0);
    assert!(ui.selected_products.is_empty());
    assert!(ui.hover.is_none());
}

#[test]
fn mode_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&DrawingMode::Room).unwrap(), "\"room\"");
}
