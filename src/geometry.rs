//! Pure plane geometry over canvas-pixel points.
//!
//! Nothing here knows about entities or state. Functions take points and
//! plain numbers and return plain numbers, so they can be used by the snap
//! system, the hit-tester and the renderer alike.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::units::UnitConverter;

/// A canvas-pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Length and direction of a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentMeasure {
    pub distance_mm: f64,
    /// `atan2(dy, dx)` in degrees, range `(-180, 180]`.
    pub angle_degrees: f64,
}

/// Shoelace area of a closed polygon, in squared pixels.
///
/// Returns 0 for fewer than three points. Winding order does not matter.
#[must_use]
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice.abs() / 2.0
}

/// Sum of edge lengths, wrapping from the last point back to the first.
#[must_use]
pub fn polygon_perimeter(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let n = points.len();
    (0..n).map(|i| points[i].distance(points[(i + 1) % n])).sum()
}

/// Mean of the vertices. Used to place room labels.
#[must_use]
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Rotate `point` about `center` by `angle` radians (clockwise on a y-down canvas).
#[must_use]
pub fn rotate_about(point: Point, center: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}

/// Whether `point` lies inside a `width` x `height` rectangle centered on
/// `center` and rotated by `rotation` radians. Edges count as inside.
///
/// The point is brought into the rectangle's local frame by rotating it by
/// `-rotation`, then tested against the half extents.
#[must_use]
pub fn point_in_rotated_rect(point: Point, center: Point, rotation: f64, width: f64, height: f64) -> bool {
    let local = rotate_about(point, center, -rotation);
    (local.x - center.x).abs() <= width / 2.0 && (local.y - center.y).abs() <= height / 2.0
}

/// Half extents of the axis-aligned box enclosing a rotated rectangle.
#[must_use]
pub fn rotated_half_extents(width: f64, height: f64, rotation: f64) -> (f64, f64) {
    let (sin, cos) = rotation.sin_cos();
    let hw = width / 2.0;
    let hh = height / 2.0;
    (hw * cos.abs() + hh * sin.abs(), hw * sin.abs() + hh * cos.abs())
}

/// Real-world length and on-screen angle of the segment `a -> b`.
#[must_use]
pub fn segment_measure(a: Point, b: Point, units: UnitConverter) -> SegmentMeasure {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    SegmentMeasure {
        distance_mm: units.canvas_to_mm(dx.hypot(dy)),
        angle_degrees: dy.atan2(dx).to_degrees(),
    }
}

/// Closest point on segment `a -> b` to `p`, with its normalized offset `t` in `0..=1`.
///
/// A degenerate segment projects everything onto `a` with `t = 0`.
#[must_use]
pub fn project_onto_segment(p: Point, a: Point, b: Point) -> (Point, f64) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return (a, 0.0);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    (Point::new(a.x + dx * t, a.y + dy * t), t)
}

/// Wrap an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(radians: f64) -> f64 {
    radians.rem_euclid(std::f64::consts::TAU)
}
