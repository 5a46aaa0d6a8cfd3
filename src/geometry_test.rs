#![allow(clippy::float_cmp)]

use std::f64::consts::{FRAC_PI_2, PI};

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn square(side: f64) -> Vec<Point> {
    vec![pt(0.0, 0.0), pt(side, 0.0), pt(side, side), pt(0.0, side)]
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_distance_is_euclidean() {
    assert_eq!(pt(0.0, 0.0).distance(pt(3.0, 4.0)), 5.0);
}

#[test]
fn point_midpoint() {
    assert_eq!(pt(0.0, 0.0).midpoint(pt(100.0, 50.0)), pt(50.0, 25.0));
}

#[test]
fn point_is_finite_rejects_infinity_and_nan() {
    assert!(pt(1.0, 2.0).is_finite());
    assert!(!pt(f64::INFINITY, 0.0).is_finite());
    assert!(!pt(0.0, f64::NAN).is_finite());
}

// =============================================================
// Polygon area / perimeter
// =============================================================

#[test]
fn square_area_by_shoelace() {
    assert_eq!(polygon_area(&square(100.0)), 10_000.0);
}

#[test]
fn square_perimeter_wraps_last_to_first() {
    assert_eq!(polygon_perimeter(&square(100.0)), 400.0);
}

#[test]
fn area_ignores_winding_order() {
    let mut ccw = square(100.0);
    ccw.reverse();
    assert_eq!(polygon_area(&ccw), 10_000.0);
}

#[test]
fn area_of_two_points_is_zero() {
    assert_eq!(polygon_area(&[pt(0.0, 0.0), pt(10.0, 10.0)]), 0.0);
}

#[test]
fn area_of_empty_is_zero() {
    assert_eq!(polygon_area(&[]), 0.0);
    assert_eq!(polygon_perimeter(&[]), 0.0);
}

#[test]
fn triangle_area() {
    let tri = [pt(0.0, 0.0), pt(40.0, 0.0), pt(0.0, 30.0)];
    assert_eq!(polygon_area(&tri), 600.0);
    assert_eq!(polygon_perimeter(&tri), 120.0);
}

#[test]
fn l_shaped_room_area() {
    let l = [
        pt(0.0, 0.0),
        pt(200.0, 0.0),
        pt(200.0, 100.0),
        pt(100.0, 100.0),
        pt(100.0, 200.0),
        pt(0.0, 200.0),
    ];
    assert_eq!(polygon_area(&l), 30_000.0);
}

#[test]
fn centroid_is_vertex_mean() {
    assert_eq!(centroid(&square(100.0)), Some(pt(50.0, 50.0)));
    assert_eq!(centroid(&[]), None);
}

// =============================================================
// Rotated rectangle
// =============================================================

#[test]
fn unrotated_rect_contains_center_and_edges() {
    let c = pt(200.0, 200.0);
    assert!(point_in_rotated_rect(c, c, 0.0, 100.0, 50.0));
    assert!(point_in_rotated_rect(pt(250.0, 225.0), c, 0.0, 100.0, 50.0));
    assert!(!point_in_rotated_rect(pt(251.0, 200.0), c, 0.0, 100.0, 50.0));
}

#[test]
fn quarter_turn_swaps_long_axis() {
    let c = pt(200.0, 200.0);
    // Long axis now runs vertically.
    assert!(point_in_rotated_rect(pt(200.0, 245.0), c, FRAC_PI_2, 100.0, 50.0));
    assert!(!point_in_rotated_rect(pt(240.0, 200.0), c, FRAC_PI_2, 100.0, 50.0));
    assert!(point_in_rotated_rect(pt(240.0, 200.0), c, 0.0, 100.0, 50.0));
}

#[test]
fn half_turn_matches_unrotated() {
    let c = pt(0.0, 0.0);
    for p in [pt(49.0, 24.0), pt(-49.0, -24.0), pt(51.0, 0.0), pt(0.0, 26.0)] {
        assert_eq!(
            point_in_rotated_rect(p, c, PI, 100.0, 50.0),
            point_in_rotated_rect(p, c, 0.0, 100.0, 50.0)
        );
    }
}

#[test]
fn world_and_local_tests_agree() {
    let c = pt(120.0, 80.0);
    let rotation = 0.7;
    let local = pt(c.x + 30.0, c.y - 10.0);
    let world = rotate_about(local, c, rotation);
    assert!(point_in_rotated_rect(world, c, rotation, 100.0, 50.0));
    assert!(point_in_rotated_rect(local, c, 0.0, 100.0, 50.0));
}

#[test]
fn rotated_half_extents_quarter_turn() {
    let (hx, hy) = rotated_half_extents(100.0, 50.0, FRAC_PI_2);
    assert!(approx(hx, 25.0));
    assert!(approx(hy, 50.0));
}

// =============================================================
// Segments
// =============================================================

#[test]
fn segment_measure_converts_through_scale() {
    let m = segment_measure(pt(0.0, 0.0), pt(30.0, 40.0), UnitConverter::new(0.1));
    assert!(approx(m.distance_mm, 500.0));
    assert!(approx(m.angle_degrees, 53.130_102_354_155_98));
}

#[test]
fn segment_measure_angles() {
    let u = UnitConverter::new(1.0);
    assert!(approx(segment_measure(pt(0.0, 0.0), pt(10.0, 0.0), u).angle_degrees, 0.0));
    assert!(approx(segment_measure(pt(0.0, 0.0), pt(0.0, 10.0), u).angle_degrees, 90.0));
    assert!(approx(segment_measure(pt(0.0, 0.0), pt(-10.0, 0.0), u).angle_degrees, 180.0));
    assert!(approx(segment_measure(pt(0.0, 0.0), pt(0.0, -10.0), u).angle_degrees, -90.0));
}

#[test]
fn projection_clamps_to_segment() {
    let (p, t) = project_onto_segment(pt(50.0, 10.0), pt(0.0, 0.0), pt(100.0, 0.0));
    assert_eq!(p, pt(50.0, 0.0));
    assert_eq!(t, 0.5);

    let (p, t) = project_onto_segment(pt(-20.0, 5.0), pt(0.0, 0.0), pt(100.0, 0.0));
    assert_eq!(p, pt(0.0, 0.0));
    assert_eq!(t, 0.0);
}

#[test]
fn projection_onto_degenerate_segment() {
    let (p, t) = project_onto_segment(pt(5.0, 5.0), pt(1.0, 1.0), pt(1.0, 1.0));
    assert_eq!(p, pt(1.0, 1.0));
    assert_eq!(t, 0.0);
}

#[test]
fn normalize_angle_wraps_into_range() {
    assert!(approx(normalize_angle(-FRAC_PI_2), 3.0 * FRAC_PI_2));
    assert!(approx(normalize_angle(5.0 * PI), PI));
    assert_eq!(normalize_angle(0.0), 0.0);
}
