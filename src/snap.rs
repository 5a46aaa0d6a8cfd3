//! Pointer snapping: magnetic wall endpoints and midpoints, then the grid.
//!
//! Priority, first match wins:
//!
//! 1. a wall endpoint within `threshold_px` of the raw point,
//! 2. a wall midpoint within `threshold_px`,
//! 3. the nearest grid intersection, when the grid is shown.
//!
//! The threshold is in screen pixels and ignores scale, so magnetic snapping
//! covers more real-world distance as the plan is zoomed out.
//!
//! When several candidates of the same kind are in range, [`TieBreak`]
//! decides: `Nearest` (default) takes the closest, `FirstMatch` takes the
//! first in wall insertion order.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use serde::{Deserialize, Serialize};

use crate::consts::SNAP_EPSILON_PX;
use crate::geometry::Point;
use crate::model::PlanStore;
use crate::units::UnitConverter;

/// What a snapped point was attracted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapSource {
    Grid,
    Endpoint,
    Midpoint,
}

/// How to choose among several magnetic candidates within range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Closest candidate wins; equal distances keep insertion order.
    #[default]
    Nearest,
    /// First candidate in wall insertion order wins.
    FirstMatch,
}

/// Outcome of [`snap_point`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapResult {
    pub point: Point,
    pub snapped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SnapSource>,
}

impl SnapResult {
    /// The raw point, untouched.
    #[must_use]
    pub fn unsnapped(point: Point) -> Self {
        Self { point, snapped: false, source: None }
    }

    /// Snapped to a wall feature rather than the grid.
    #[must_use]
    pub fn is_magnetic(&self) -> bool {
        self.snapped && matches!(self.source, Some(SnapSource::Endpoint | SnapSource::Midpoint))
    }
}

/// Inputs to the snap search that come from configuration and UI state.
#[derive(Debug, Clone, Copy)]
pub struct SnapSettings {
    pub threshold_px: f64,
    pub tie_break: TieBreak,
    pub magnetic: bool,
    pub grid: bool,
    pub grid_size_mm: f64,
    pub units: UnitConverter,
}

/// Correct `raw` against existing plan geometry.
#[must_use]
pub fn snap_point(raw: Point, store: &PlanStore, settings: &SnapSettings) -> SnapResult {
    if settings.magnetic {
        let endpoints = store.walls().iter().flat_map(|w| [w.start, w.end]);
        if let Some(point) = pick_candidate(raw, endpoints, settings) {
            return SnapResult { point, snapped: true, source: Some(SnapSource::Endpoint) };
        }

        let midpoints = store.walls().iter().map(crate::model::WallSegment::midpoint);
        if let Some(point) = pick_candidate(raw, midpoints, settings) {
            return SnapResult { point, snapped: true, source: Some(SnapSource::Midpoint) };
        }
    }

    if settings.grid {
        return snap_to_grid(raw, settings.units.mm_to_canvas(settings.grid_size_mm));
    }

    SnapResult::unsnapped(raw)
}

/// Round each coordinate to the nearest multiple of `step_px`.
///
/// A non-finite or non-positive step leaves the point unsnapped.
#[must_use]
pub fn snap_to_grid(raw: Point, step_px: f64) -> SnapResult {
    if !(step_px.is_finite() && step_px > 0.0) {
        return SnapResult::unsnapped(raw);
    }
    let point = Point::new((raw.x / step_px).round() * step_px, (raw.y / step_px).round() * step_px);
    let snapped = raw.distance(point) > SNAP_EPSILON_PX;
    SnapResult { point, snapped, source: Some(SnapSource::Grid) }
}

fn pick_candidate(raw: Point, candidates: impl Iterator<Item = Point>, settings: &SnapSettings) -> Option<Point> {
    let mut in_range = candidates
        .map(|c| (c, raw.distance(c)))
        .filter(|(_, d)| *d < settings.threshold_px);

    match settings.tie_break {
        TieBreak::FirstMatch => in_range.next().map(|(c, _)| c),
        TieBreak::Nearest => in_range
            .fold(None::<(Point, f64)>, |best, (c, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((c, d)),
            })
            .map(|(c, _)| c),
    }
}
