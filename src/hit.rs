#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geometry::{self, Point};
use crate::model::{EntityId, PlacedProduct, WallSegment};
use crate::units::UnitConverter;

/// A point projected onto a wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    pub wall_id: EntityId,
    /// Closest point on the wall's center line.
    pub point: Point,
    /// Normalized offset of `point` along the wall, `0..=1`.
    pub t: f64,
    /// Distance from the query point to `point`, in pixels.
    pub distance: f64,
}

/// The product under `point`, testing in array order; the first match wins.
#[must_use]
pub fn hit_product(point: Point, products: &[PlacedProduct], units: UnitConverter) -> Option<EntityId> {
    products.iter().find(|p| p.contains(point, units)).map(|p| p.id)
}

/// The wall closest to `point` within `threshold_px`, if any.
///
/// Equal distances keep insertion order.
#[must_use]
pub fn nearest_wall(point: Point, walls: &[WallSegment], threshold_px: f64) -> Option<WallHit> {
    walls
        .iter()
        .map(|w| {
            let (closest, t) = geometry::project_onto_segment(point, w.start, w.end);
            WallHit { wall_id: w.id, point: closest, t, distance: point.distance(closest) }
        })
        .filter(|hit| hit.distance < threshold_px)
        .fold(None::<WallHit>, |best, hit| match best {
            Some(b) if b.distance <= hit.distance => Some(b),
            _ => Some(hit),
        })
}
