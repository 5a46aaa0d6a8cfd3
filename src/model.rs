//! Plan model: entity types and the in-memory entity store.
//!
//! This module defines what is on the plan (`WallSegment`, `Room`, `Door`,
//! `TextAnnotation`, `PlacedProduct`), a sparse-update type for product edits
//! (`ProductPatch`), the catalog drag payload (`ProductPayload`), and the
//! store that owns every live entity (`PlanStore`).
//!
//! All positions are canvas pixels. Real-world sizes (`*_mm`, product
//! dimensions) are millimetres and are converted through
//! [`UnitConverter`](crate::units::UnitConverter) when drawn. Collections are
//! ordered: array order is paint order.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::geometry::{self, Point};
use crate::units::UnitConverter;

/// Unique identifier for a plan entity.
pub type EntityId = Uuid;

/// Error returned when a catalog drop payload cannot become a product.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// The payload is not JSON or lacks required fields.
    #[error("malformed product payload: {0}")]
    Json(#[from] serde_json::Error),
    /// Footprint length or width is not a positive finite number.
    #[error("invalid product footprint {length}x{width}")]
    InvalidDimensions { length: f64, width: f64 },
}

// =============================================================
// Walls
// =============================================================

/// Whether a wall bounds the building or partitions it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallKind {
    #[default]
    Interior,
    Exterior,
}

/// One straight wall section. Segments from one polyline run are independent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallSegment {
    pub id: EntityId,
    pub start: Point,
    pub end: Point,
    pub thickness_mm: f64,
    #[serde(rename = "type")]
    pub kind: WallKind,
    pub color: String,
}

impl WallSegment {
    /// On-screen length in pixels.
    #[must_use]
    pub fn length_px(&self) -> f64 {
        self.start.distance(self.end)
    }

    #[must_use]
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Direction of `start -> end` in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x)
    }
}

// =============================================================
// Rooms
// =============================================================

/// Closed polygon with cached area and perimeter.
///
/// `area_mm2` and `perimeter_mm` are computed at creation. Call
/// [`Room::recompute`] after editing `points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: EntityId,
    pub name: String,
    pub points: Vec<Point>,
    pub area_mm2: f64,
    pub perimeter_mm: f64,
    pub color: String,
}

impl Room {
    /// Refresh `area_mm2` and `perimeter_mm` from the current points.
    pub fn recompute(&mut self, units: UnitConverter) {
        self.area_mm2 = units.canvas_area_to_mm2(geometry::polygon_area(&self.points));
        self.perimeter_mm = units.canvas_to_mm(geometry::polygon_perimeter(&self.points));
    }
}

// =============================================================
// Doors and text
// =============================================================

/// A door, either freestanding or embedded in a wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Door {
    pub id: EntityId,
    pub position: Point,
    pub width_mm: f64,
    /// Collaborator-level wall grouping; carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_id: Option<EntityId>,
    /// The segment this door sits in, when embedded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_segment_id: Option<EntityId>,
    /// Normalized offset along the segment, `0..=1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_position: Option<f64>,
    #[serde(default)]
    pub is_embedded: bool,
}

/// Free text placed on the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnnotation {
    pub id: EntityId,
    pub position: Point,
    pub text: String,
    pub font_size: f64,
    pub color: String,
}

// =============================================================
// Products
// =============================================================

/// Real-world product size in millimetres. `height` is not drawn in 2D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

/// A catalog product placed on the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedProduct {
    pub id: EntityId,
    pub product_id: String,
    pub name: String,
    pub category: String,
    /// Center of the footprint.
    pub position: Point,
    /// Stored as given; wrapped into `[0, 2π)` only when drawn.
    pub rotation: f64,
    pub dimensions: Dimensions,
    pub scale: f64,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl PlacedProduct {
    /// On-screen footprint `(length, width)` in pixels.
    #[must_use]
    pub fn footprint_px(&self, units: UnitConverter) -> (f64, f64) {
        (
            units.mm_to_canvas(self.dimensions.length * self.scale),
            units.mm_to_canvas(self.dimensions.width * self.scale),
        )
    }

    /// Whether `point` falls on this product's rotated footprint.
    #[must_use]
    pub fn contains(&self, point: Point, units: UnitConverter) -> bool {
        let (w, h) = self.footprint_px(units);
        geometry::point_in_rotated_rect(point, self.position, self.rotation, w, h)
    }
}

/// Everything needed to place a product; the engine assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPlacement {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub position: Point,
    #[serde(default)]
    pub rotation: f64,
    pub dimensions: Dimensions,
    #[serde(default = "unit_scale")]
    pub scale: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

fn unit_scale() -> f64 {
    1.0
}

/// Catalog drag payload, as serialized by the product catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[serde(deserialize_with = "catalog_id")]
    pub id: String,
    pub name: String,
    pub category: String,
    pub dimensions: Dimensions,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub model_path: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl ProductPayload {
    /// Parse and validate a drop payload.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Json`] for malformed JSON or missing fields and
    /// [`PayloadError::InvalidDimensions`] for a non-positive footprint.
    pub fn parse(raw: &str) -> Result<Self, PayloadError> {
        let payload: Self = serde_json::from_str(raw)?;
        let Dimensions { length, width, .. } = payload.dimensions;
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(length) || !valid(width) {
            return Err(PayloadError::InvalidDimensions { length, width });
        }
        Ok(payload)
    }

    /// Turn the payload into a placement centered on `position`.
    #[must_use]
    pub fn into_placement(self, position: Point) -> ProductPlacement {
        ProductPlacement {
            product_id: self.id,
            name: self.name,
            category: self.category,
            position,
            rotation: 0.0,
            dimensions: self.dimensions,
            scale: 1.0,
            color: self.color,
            model_path: self.model_path,
            thumbnail: self.thumbnail,
        }
    }
}

// Catalogs emit either numeric or string ids.
fn catalog_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid product id: {other}"))),
    }
}

/// Sparse update for a placed product. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// =============================================================
// Store
// =============================================================

/// Plain serializable snapshot of every collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entities {
    pub walls: Vec<WallSegment>,
    pub rooms: Vec<Room>,
    pub doors: Vec<Door>,
    pub texts: Vec<TextAnnotation>,
    pub products: Vec<PlacedProduct>,
}

/// In-memory store of plan entities, in paint order.
#[derive(Debug, Clone, Default)]
pub struct PlanStore {
    walls: Vec<WallSegment>,
    rooms: Vec<Room>,
    doors: Vec<Door>,
    texts: Vec<TextAnnotation>,
    products: Vec<PlacedProduct>,
}

impl PlanStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Read access ---

    #[must_use]
    pub fn walls(&self) -> &[WallSegment] {
        &self.walls
    }

    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[must_use]
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    #[must_use]
    pub fn texts(&self) -> &[TextAnnotation] {
        &self.texts
    }

    #[must_use]
    pub fn products(&self) -> &[PlacedProduct] {
        &self.products
    }

    #[must_use]
    pub fn wall(&self, id: &EntityId) -> Option<&WallSegment> {
        self.walls.iter().find(|w| w.id == *id)
    }

    #[must_use]
    pub fn room(&self, id: &EntityId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == *id)
    }

    #[must_use]
    pub fn product(&self, id: &EntityId) -> Option<&PlacedProduct> {
        self.products.iter().find(|p| p.id == *id)
    }

    pub fn product_mut(&mut self, id: &EntityId) -> Option<&mut PlacedProduct> {
        self.products.iter_mut().find(|p| p.id == *id)
    }

    pub fn room_mut(&mut self, id: &EntityId) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.id == *id)
    }

    pub fn text_mut(&mut self, id: &EntityId) -> Option<&mut TextAnnotation> {
        self.texts.iter_mut().find(|t| t.id == *id)
    }

    // --- Insertion (appends on top of paint order) ---

    pub fn push_wall(&mut self, wall: WallSegment) {
        self.walls.push(wall);
    }

    pub fn push_room(&mut self, room: Room) {
        self.rooms.push(room);
    }

    pub fn push_door(&mut self, door: Door) {
        self.doors.push(door);
    }

    pub fn push_text(&mut self, text: TextAnnotation) {
        self.texts.push(text);
    }

    pub fn push_product(&mut self, product: PlacedProduct) {
        self.products.push(product);
    }

    // --- Removal ---

    /// Remove a wall and every door embedded in it.
    /// Returns the wall and the ids of the removed doors.
    pub fn remove_wall(&mut self, id: &EntityId) -> Option<(WallSegment, Vec<EntityId>)> {
        let idx = self.walls.iter().position(|w| w.id == *id)?;
        let wall = self.walls.remove(idx);
        let mut removed_doors = Vec::new();
        self.doors.retain(|d| {
            let embedded = d.wall_segment_id == Some(wall.id);
            if embedded {
                removed_doors.push(d.id);
            }
            !embedded
        });
        Some((wall, removed_doors))
    }

    pub fn remove_room(&mut self, id: &EntityId) -> Option<Room> {
        let idx = self.rooms.iter().position(|r| r.id == *id)?;
        Some(self.rooms.remove(idx))
    }

    pub fn remove_door(&mut self, id: &EntityId) -> Option<Door> {
        let idx = self.doors.iter().position(|d| d.id == *id)?;
        Some(self.doors.remove(idx))
    }

    pub fn remove_text(&mut self, id: &EntityId) -> Option<TextAnnotation> {
        let idx = self.texts.iter().position(|t| t.id == *id)?;
        Some(self.texts.remove(idx))
    }

    pub fn remove_product(&mut self, id: &EntityId) -> Option<PlacedProduct> {
        let idx = self.products.iter().position(|p| p.id == *id)?;
        Some(self.products.remove(idx))
    }

    // --- Edits ---

    /// Apply a sparse update to a product. Returns false if the product doesn't exist.
    pub fn apply_product_patch(&mut self, id: &EntityId, patch: &ProductPatch) -> bool {
        let Some(product) = self.product_mut(id) else {
            return false;
        };
        if let Some(position) = patch.position {
            product.position = position;
        }
        if let Some(rotation) = patch.rotation {
            product.rotation = rotation;
        }
        if let Some(dimensions) = patch.dimensions {
            product.dimensions = dimensions;
        }
        if let Some(scale) = patch.scale {
            product.scale = scale;
        }
        if let Some(ref color) = patch.color {
            product.color.clone_from(color);
        }
        if let Some(ref name) = patch.name {
            product.name.clone_from(name);
        }
        true
    }

    // --- Snapshots ---

    /// Replace every collection with a snapshot.
    pub fn load(&mut self, entities: Entities) {
        let Entities { walls, rooms, doors, texts, products } = entities;
        self.walls = walls;
        self.rooms = rooms;
        self.doors = doors;
        self.texts = texts;
        self.products = products;
    }

    /// Clone every collection into a serializable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Entities {
        Entities {
            walls: self.walls.clone(),
            rooms: self.rooms.clone(),
            doors: self.doors.clone(),
            texts: self.texts.clone(),
            products: self.products.clone(),
        }
    }

    /// Drop every entity.
    pub fn clear(&mut self) {
        self.load(Entities::default());
    }

    /// Total number of entities across all collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.walls.len() + self.rooms.len() + self.doors.len() + self.texts.len() + self.products.len()
    }

    /// Returns `true` if the store contains no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
