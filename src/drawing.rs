//! Drawing state machine for the multi-point wall and room tools.
//!
//! ```text
//!             click (wall|room)              click
//!   Idle ───────────────────────▶ Drawing ◀───────┐
//!    ▲                              │   └──────────┘
//!    │   finish (Enter, dbl-click)  │
//!    └──────────────────────────────┘
//!    ▲          cancel (Escape)     │
//!    └──────────────────────────────┘
//! ```
//!
//! The accumulated points are the committed clicks only; the live preview
//! segment to the pointer is drawn from UI hover state and never stored here.
//! Door, text and select modes never leave `Idle`.

#[cfg(test)]
#[path = "drawing_test.rs"]
mod drawing_test;

use crate::consts::SNAP_EPSILON_PX;
use crate::geometry::Point;
use crate::input::DrawingMode;

/// Minimum clicked points for a wall polyline.
pub const MIN_WALL_POINTS: usize = 2;

/// Minimum clicked points for a room polygon.
pub const MIN_ROOM_POINTS: usize = 3;

/// Reason a commit produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("need at least {needed} points, got {got}")]
    TooFewPoints { needed: usize, got: usize },
    #[error("segment start and end coincide")]
    ZeroLengthSegment,
}

/// Geometry ready to become entities.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    /// One `(start, end)` pair per wall segment, in click order.
    Walls(Vec<(Point, Point)>),
    /// Ordered, implicitly closed polygon.
    Room(Vec<Point>),
}

/// Current state of the polyline tools.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DrawingState {
    #[default]
    Idle,
    Drawing { mode: DrawingMode, points: Vec<Point> },
}

impl DrawingState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Points clicked so far; empty when idle.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        match self {
            Self::Idle => &[],
            Self::Drawing { points, .. } => points,
        }
    }

    /// Mode being drawn, if any.
    #[must_use]
    pub fn mode(&self) -> Option<DrawingMode> {
        match self {
            Self::Idle => None,
            Self::Drawing { mode, .. } => Some(*mode),
        }
    }

    /// Add a clicked point.
    ///
    /// Non-polyline modes leave the state untouched. A click on the last
    /// accumulated point is ignored, so a double-click adds one point, not two.
    #[must_use]
    pub fn click(self, mode: DrawingMode, point: Point) -> Self {
        if !mode.is_polyline() {
            return self;
        }
        match self {
            Self::Drawing { mode: current, mut points } if current == mode => {
                let repeat = points.last().is_some_and(|last| last.distance(point) <= SNAP_EPSILON_PX);
                if !repeat {
                    points.push(point);
                }
                Self::Drawing { mode, points }
            }
            _ => Self::Drawing { mode, points: vec![point] },
        }
    }

    /// Whether [`DrawingState::finish`] would succeed.
    #[must_use]
    pub fn can_finish(&self) -> bool {
        match self {
            Self::Idle => false,
            Self::Drawing { mode, points } => min_points(*mode).is_some_and(|min| points.len() >= min),
        }
    }

    /// Consume the accumulated points into a commit. The state is spent either
    /// way; the caller returns to `Idle`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] when there are too few points or every wall
    /// segment would be zero-length.
    pub fn finish(self) -> Result<Commit, GeometryError> {
        match self {
            Self::Idle => Err(GeometryError::TooFewPoints { needed: MIN_WALL_POINTS, got: 0 }),
            Self::Drawing { mode: DrawingMode::Room, points } => room_polygon(points).map(Commit::Room),
            Self::Drawing { points, .. } => wall_segments(&points).map(Commit::Walls),
        }
    }

    /// Abandon any in-progress path.
    #[must_use]
    pub fn cancel(self) -> Self {
        Self::Idle
    }
}

fn min_points(mode: DrawingMode) -> Option<usize> {
    match mode {
        DrawingMode::Wall => Some(MIN_WALL_POINTS),
        DrawingMode::Room => Some(MIN_ROOM_POINTS),
        _ => None,
    }
}

/// Split a polyline into consecutive segments, dropping zero-length ones.
///
/// # Errors
///
/// [`GeometryError::TooFewPoints`] for fewer than two points,
/// [`GeometryError::ZeroLengthSegment`] when no segment has length.
pub fn wall_segments(points: &[Point]) -> Result<Vec<(Point, Point)>, GeometryError> {
    if points.len() < MIN_WALL_POINTS {
        return Err(GeometryError::TooFewPoints { needed: MIN_WALL_POINTS, got: points.len() });
    }
    let segments: Vec<(Point, Point)> = points
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .filter(|(a, b)| validate_segment(*a, *b).is_ok())
        .collect();
    if segments.is_empty() {
        return Err(GeometryError::ZeroLengthSegment);
    }
    Ok(segments)
}

/// Check that a room polygon has enough vertices.
///
/// # Errors
///
/// [`GeometryError::TooFewPoints`] for fewer than three points.
pub fn room_polygon(points: Vec<Point>) -> Result<Vec<Point>, GeometryError> {
    if points.len() < MIN_ROOM_POINTS {
        return Err(GeometryError::TooFewPoints { needed: MIN_ROOM_POINTS, got: points.len() });
    }
    Ok(points)
}

/// Reject a segment whose endpoints coincide.
///
/// # Errors
///
/// [`GeometryError::ZeroLengthSegment`] when `start` equals `end`.
pub fn validate_segment(start: Point, end: Point) -> Result<(), GeometryError> {
    if start.distance(end) <= SNAP_EPSILON_PX {
        return Err(GeometryError::ZeroLengthSegment);
    }
    Ok(())
}
