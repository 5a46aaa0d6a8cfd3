use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn clicks(mode: DrawingMode, points: &[Point]) -> DrawingState {
    points.iter().fold(DrawingState::Idle, |state, p| state.click(mode, *p))
}

// =============================================================
// Transitions
// =============================================================

#[test]
fn starts_idle() {
    let state = DrawingState::default();
    assert!(state.is_idle());
    assert!(state.points().is_empty());
    assert_eq!(state.mode(), None);
}

#[test]
fn first_click_enters_drawing() {
    let state = DrawingState::Idle.click(DrawingMode::Wall, pt(1.0, 2.0));
    assert_eq!(state.mode(), Some(DrawingMode::Wall));
    assert_eq!(state.points(), &[pt(1.0, 2.0)]);
}

#[test]
fn clicks_accumulate_in_order() {
    let state = clicks(DrawingMode::Room, &[pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)]);
    assert_eq!(state.points(), &[pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)]);
}

#[test]
fn repeated_click_is_ignored() {
    let state = clicks(DrawingMode::Wall, &[pt(0.0, 0.0), pt(50.0, 0.0), pt(50.0, 0.0)]);
    assert_eq!(state.points().len(), 2);
}

#[test]
fn non_polyline_modes_stay_idle() {
    for mode in [DrawingMode::Select, DrawingMode::Door, DrawingMode::Text] {
        assert!(DrawingState::Idle.click(mode, pt(1.0, 1.0)).is_idle());
    }
}

#[test]
fn click_in_other_mode_restarts() {
    let state = clicks(DrawingMode::Wall, &[pt(0.0, 0.0), pt(10.0, 0.0)]).click(DrawingMode::Room, pt(5.0, 5.0));
    assert_eq!(state.mode(), Some(DrawingMode::Room));
    assert_eq!(state.points(), &[pt(5.0, 5.0)]);
}

#[test]
fn cancel_discards_points() {
    let state = clicks(DrawingMode::Wall, &[pt(0.0, 0.0), pt(10.0, 0.0)]).cancel();
    assert!(state.is_idle());
}

// =============================================================
// Finishing
// =============================================================

#[test]
fn three_wall_points_yield_two_segments() {
    let commit = clicks(DrawingMode::Wall, &[pt(0.0, 0.0), pt(100.0, 0.0), pt(100.0, 100.0)]).finish();
    assert_eq!(
        commit,
        Ok(Commit::Walls(vec![(pt(0.0, 0.0), pt(100.0, 0.0)), (pt(100.0, 0.0), pt(100.0, 100.0))]))
    );
}

#[test]
fn single_wall_point_is_rejected() {
    let state = clicks(DrawingMode::Wall, &[pt(0.0, 0.0)]);
    assert!(!state.can_finish());
    assert_eq!(state.finish(), Err(GeometryError::TooFewPoints { needed: 2, got: 1 }));
}

#[test]
fn room_needs_three_points() {
    let two = clicks(DrawingMode::Room, &[pt(0.0, 0.0), pt(10.0, 0.0)]);
    assert!(!two.can_finish());
    assert_eq!(two.finish(), Err(GeometryError::TooFewPoints { needed: 3, got: 2 }));

    let three = clicks(DrawingMode::Room, &[pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)]);
    assert!(three.can_finish());
    assert_eq!(three.finish(), Ok(Commit::Room(vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)])));
}

#[test]
fn finishing_idle_is_an_error() {
    assert!(DrawingState::Idle.finish().is_err());
    assert!(!DrawingState::Idle.can_finish());
}

// =============================================================
// Segment helpers
// =============================================================

#[test]
fn zero_length_pairs_are_dropped() {
    let points = [pt(0.0, 0.0), pt(0.0, 0.0), pt(10.0, 0.0)];
    assert_eq!(wall_segments(&points), Ok(vec![(pt(0.0, 0.0), pt(10.0, 0.0))]));
}

#[test]
fn all_zero_length_is_an_error() {
    assert_eq!(wall_segments(&[pt(3.0, 3.0), pt(3.0, 3.0)]), Err(GeometryError::ZeroLengthSegment));
}

#[test]
fn validate_segment_rejects_coincident_points() {
    assert_eq!(validate_segment(pt(1.0, 1.0), pt(1.0, 1.0)), Err(GeometryError::ZeroLengthSegment));
    assert_eq!(validate_segment(pt(1.0, 1.0), pt(2.0, 1.0)), Ok(()));
}

#[test]
fn error_messages_name_the_counts() {
    let err = GeometryError::TooFewPoints { needed: 3, got: 1 };
    assert_eq!(err.to_string(), "need at least 3 points, got 1");
}
