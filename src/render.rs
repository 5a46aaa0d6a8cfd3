//! Render pipeline: builds the ordered draw-command list for one frame.
//!
//! This module is pure. It reads the entity store, UI state and drawing
//! state, and produces a [`Scene`] of backend-neutral [`DrawCommand`]s. The
//! browser backend in [`crate::canvas2d`] replays them onto a 2D context;
//! other surfaces can do the same without touching geometry or state.
//!
//! Layer order is part of the contract: later layers occlude earlier ones,
//! and product labels are emitted with the products so no later fill can
//! cover them.
//!
//! | # | Layer | Contents |
//! |---|-------|----------|
//! | 0 | `Background` | clear |
//! | 1 | `Grid` | grid lines, when enabled |
//! | 2 | `Rooms` | fill, outline, centered name and area |
//! | 3 | `Walls` | thick strokes, length labels when enabled |
//! | 4 | `Preview` | dashed in-progress path, snap marker |
//! | 5 | `Doors` | swing arcs |
//! | 6 | `Text` | annotations |
//! | 7 | `Products` | rotated footprints and name labels |
//! | 8 | `Selection` | dashed outlines around selected products |
//!
//! Commands with non-finite coordinates (e.g. from a zero scale) are dropped.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use serde::Serialize;

use crate::consts::{MIN_GRID_CELL_PX, PREVIEW_DASH_PX, PRODUCT_LABEL_GAP_PX, SNAP_EPSILON_PX, SNAP_MARKER_RADIUS_PX};
use crate::drawing::DrawingState;
use crate::geometry::{self, Point};
use crate::input::{DrawingMode, UiState};
use crate::model::{Door, PlacedProduct, PlanStore, Room, TextAnnotation, WallSegment};
use crate::snap::{SnapResult, SnapSource};
use crate::units::{self, UnitConverter};

const GRID_COLOR: &str = "#E5E7EB";
const ROOM_STROKE: &str = "#3B82F6";
const ROOM_LABEL: &str = "#1E3A8A";
const LABEL_COLOR: &str = "#374151";
const PREVIEW_COLOR: &str = "#2563EB";
const DOOR_COLOR: &str = "#92400E";
const BACKGROUND: &str = "#FFFFFF";
const PRODUCT_STROKE: &str = "#1F2937";
const SELECTED_FILL: &str = "rgba(37, 99, 235, 0.35)";
const SELECTED_STROKE: &str = "#2563EB";
const ENDPOINT_MARKER: &str = "#F97316";
const MIDPOINT_MARKER: &str = "#10B981";

/// Extra margin around a selected product's outline, in pixels.
const SELECTION_PAD_PX: f64 = 4.0;

/// Paint layer a command belongs to, in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Background,
    Grid,
    Rooms,
    Walls,
    Preview,
    Doors,
    Text,
    Products,
    Selection,
}

/// Stroke style. An empty `dash` is a solid line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dash: Vec<f64>,
}

impl Stroke {
    #[must_use]
    pub fn solid(color: &str, width: f64) -> Self {
        Self { color: color.to_owned(), width, dash: Vec::new() }
    }

    #[must_use]
    pub fn dashed(color: &str, width: f64) -> Self {
        Self { color: color.to_owned(), width, dash: vec![PREVIEW_DASH_PX, PREVIEW_DASH_PX] }
    }

    #[must_use]
    pub fn is_dashed(&self) -> bool {
        !self.dash.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    Alphabetic,
    Middle,
    Bottom,
}

/// One backend-neutral drawing instruction in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
        color: String,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Path {
        points: Vec<Point>,
        closed: bool,
        fill: Option<String>,
        stroke: Option<Stroke>,
    },
    /// Rectangle centered on `center`, rotated by `rotation` radians.
    Rect {
        center: Point,
        width: f64,
        height: f64,
        rotation: f64,
        fill: Option<String>,
        stroke: Option<Stroke>,
    },
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        fill: Option<String>,
        stroke: Option<Stroke>,
    },
    Text {
        position: Point,
        text: String,
        font_size: f64,
        color: String,
        align: TextAlign,
        baseline: TextBaseline,
    },
}

impl DrawCommand {
    /// Every coordinate and size is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        let stroke_ok = |s: &Option<Stroke>| s.as_ref().is_none_or(|s| s.width.is_finite());
        match self {
            Self::Clear { width, height, .. } => width.is_finite() && height.is_finite(),
            Self::Line { from, to, stroke } => from.is_finite() && to.is_finite() && stroke.width.is_finite(),
            Self::Path { points, stroke, .. } => points.iter().all(|p| p.is_finite()) && stroke_ok(stroke),
            Self::Rect { center, width, height, rotation, stroke, .. } => {
                center.is_finite() && width.is_finite() && height.is_finite() && rotation.is_finite() && stroke_ok(stroke)
            }
            Self::Arc { center, radius, start_angle, end_angle, stroke, .. } => {
                center.is_finite()
                    && radius.is_finite()
                    && start_angle.is_finite()
                    && end_angle.is_finite()
                    && stroke_ok(stroke)
            }
            Self::Text { position, font_size, .. } => position.is_finite() && font_size.is_finite(),
        }
    }
}

/// A command tagged with its paint layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawOp {
    pub layer: Layer,
    #[serde(flatten)]
    pub command: DrawCommand,
}

/// The ordered command list for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Scene {
    pub ops: Vec<DrawOp>,
}

impl Scene {
    fn push(&mut self, layer: Layer, command: DrawCommand) {
        if command.is_finite() {
            self.ops.push(DrawOp { layer, command });
        }
    }

    /// Commands in paint order.
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.ops.iter().map(|op| &op.command)
    }

    /// Commands belonging to one layer, in paint order.
    pub fn in_layer(&self, layer: Layer) -> impl Iterator<Item = &DrawCommand> {
        self.ops.iter().filter(move |op| op.layer == layer).map(|op| &op.command)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Everything the pipeline reads.
#[derive(Debug, Clone, Copy)]
pub struct SceneInput<'a> {
    pub store: &'a PlanStore,
    pub ui: &'a UiState,
    pub drawing: &'a DrawingState,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub grid_size_mm: f64,
}

/// Build the full frame.
#[must_use]
pub fn build_scene(input: &SceneInput<'_>) -> Scene {
    let units = UnitConverter::new(input.ui.scale);
    let mut scene = Scene::default();

    scene.push(
        Layer::Background,
        DrawCommand::Clear { width: input.canvas_width, height: input.canvas_height, color: BACKGROUND.to_owned() },
    );

    if input.ui.show_grid {
        grid(&mut scene, input, units);
    }
    for room in input.store.rooms() {
        room_layer(&mut scene, room, input.ui);
    }
    for wall in input.store.walls() {
        wall_layer(&mut scene, wall, input.ui, units);
    }
    preview(&mut scene, input, units);
    for door in input.store.doors() {
        door_layer(&mut scene, door, input.store, units);
    }
    for text in input.store.texts() {
        text_layer(&mut scene, text);
    }
    for product in input.store.products() {
        product_layer(&mut scene, product, input.ui.is_selected(&product.id), units);
    }
    for id in &input.ui.selected_products {
        if let Some(product) = input.store.product(id) {
            selection_outline(&mut scene, product, units);
        }
    }

    scene
}

// =============================================================
// Grid
// =============================================================

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn grid(scene: &mut Scene, input: &SceneInput<'_>, units: UnitConverter) {
    let step = units.mm_to_canvas(input.grid_size_mm);
    if !(step.is_finite() && step >= MIN_GRID_CELL_PX) {
        return;
    }
    let (w, h) = (input.canvas_width, input.canvas_height);
    if !(w.is_finite() && h.is_finite() && w >= 0.0 && h >= 0.0) {
        return;
    }
    let stroke = Stroke::solid(GRID_COLOR, 1.0);

    let cols = (w / step).floor() as usize;
    for i in 0..=cols {
        let x = i as f64 * step;
        scene.push(Layer::Grid, DrawCommand::Line { from: Point::new(x, 0.0), to: Point::new(x, h), stroke: stroke.clone() });
    }
    let rows = (h / step).floor() as usize;
    for j in 0..=rows {
        let y = j as f64 * step;
        scene.push(Layer::Grid, DrawCommand::Line { from: Point::new(0.0, y), to: Point::new(w, y), stroke: stroke.clone() });
    }
}

// =============================================================
// Committed geometry
// =============================================================

fn room_layer(scene: &mut Scene, room: &Room, ui: &UiState) {
    if room.points.len() < 3 {
        return;
    }
    scene.push(
        Layer::Rooms,
        DrawCommand::Path {
            points: room.points.clone(),
            closed: true,
            fill: Some(room.color.clone()),
            stroke: Some(Stroke::solid(ROOM_STROKE, 2.0)),
        },
    );

    let Some(center) = geometry::centroid(&room.points) else {
        return;
    };
    let name_y = if ui.show_measurements { center.y - 8.0 } else { center.y };
    scene.push(Layer::Rooms, label(Point::new(center.x, name_y), &room.name, 14.0, ROOM_LABEL, TextBaseline::Middle));
    if ui.show_measurements && room.area_mm2.is_finite() {
        let area = units::format_area(room.area_mm2, 2);
        scene.push(Layer::Rooms, label(Point::new(center.x, center.y + 8.0), &area, 12.0, ROOM_LABEL, TextBaseline::Middle));
    }
}

fn wall_layer(scene: &mut Scene, wall: &WallSegment, ui: &UiState, units: UnitConverter) {
    let width = units.mm_to_canvas(wall.thickness_mm).max(1.0);
    scene.push(Layer::Walls, DrawCommand::Line { from: wall.start, to: wall.end, stroke: Stroke::solid(&wall.color, width) });

    let length_mm = units.canvas_to_mm(wall.length_px());
    if ui.show_measurements && length_mm.is_finite() {
        let text = units::format_measurement(length_mm, &ui.measurement);
        let mid = wall.midpoint();
        let at = Point::new(mid.x, mid.y - width / 2.0 - 4.0);
        scene.push(Layer::Walls, label(at, &text, 11.0, LABEL_COLOR, TextBaseline::Bottom));
    }
}

fn door_layer(scene: &mut Scene, door: &Door, store: &PlanStore, units: UnitConverter) {
    let radius = units.mm_to_canvas(door.width_mm / 2.0);
    let wall = door.wall_segment_id.and_then(|id| store.wall(&id));
    let angle = wall.map_or(0.0, WallSegment::angle);

    if let Some(wall) = wall {
        // Clear the wall stroke across the opening.
        let (sin, cos) = angle.sin_cos();
        let from = Point::new(door.position.x - radius * cos, door.position.y - radius * sin);
        let to = Point::new(door.position.x + radius * cos, door.position.y + radius * sin);
        let width = units.mm_to_canvas(wall.thickness_mm).max(1.0) + 1.0;
        scene.push(Layer::Doors, DrawCommand::Line { from, to, stroke: Stroke::solid(BACKGROUND, width) });
    }

    scene.push(
        Layer::Doors,
        DrawCommand::Arc {
            center: door.position,
            radius,
            start_angle: angle + PI,
            end_angle: angle + 2.0 * PI,
            fill: None,
            stroke: Some(Stroke::solid(DOOR_COLOR, 2.0)),
        },
    );
}

fn text_layer(scene: &mut Scene, text: &TextAnnotation) {
    scene.push(
        Layer::Text,
        DrawCommand::Text {
            position: text.position,
            text: text.text.clone(),
            font_size: text.font_size,
            color: text.color.clone(),
            align: TextAlign::Left,
            baseline: TextBaseline::Alphabetic,
        },
    );
}

fn product_layer(scene: &mut Scene, product: &PlacedProduct, selected: bool, units: UnitConverter) {
    let (w, h) = product.footprint_px(units);
    let rotation = geometry::normalize_angle(product.rotation);
    let (fill, stroke) = if selected {
        (SELECTED_FILL.to_owned(), Stroke::solid(SELECTED_STROKE, 2.0))
    } else {
        (product.color.clone(), Stroke::solid(PRODUCT_STROKE, 1.0))
    };
    scene.push(
        Layer::Products,
        DrawCommand::Rect { center: product.position, width: w, height: h, rotation, fill: Some(fill), stroke: Some(stroke) },
    );

    let (_, half_h) = geometry::rotated_half_extents(w, h, rotation);
    let at = Point::new(product.position.x, product.position.y - half_h - PRODUCT_LABEL_GAP_PX);
    scene.push(Layer::Products, label(at, &product.name, 12.0, PRODUCT_STROKE, TextBaseline::Bottom));
}

fn selection_outline(scene: &mut Scene, product: &PlacedProduct, units: UnitConverter) {
    let (w, h) = product.footprint_px(units);
    scene.push(
        Layer::Selection,
        DrawCommand::Rect {
            center: product.position,
            width: w + SELECTION_PAD_PX * 2.0,
            height: h + SELECTION_PAD_PX * 2.0,
            rotation: geometry::normalize_angle(product.rotation),
            fill: None,
            stroke: Some(Stroke::dashed(SELECTED_STROKE, 1.0)),
        },
    );
}

// =============================================================
// In-progress preview
// =============================================================

fn preview(scene: &mut Scene, input: &SceneInput<'_>, units: UnitConverter) {
    let ui = input.ui;

    if let DrawingState::Drawing { mode, points } = input.drawing {
        let Some(&last) = points.last() else {
            return;
        };
        let width = match mode {
            DrawingMode::Wall => units.mm_to_canvas(ui.wall_style.thickness_mm).max(1.0),
            _ => 2.0,
        };

        // Right after a click the pointer still sits on the last point.
        let hover = ui.hover.filter(|h| h.distance(last) > SNAP_EPSILON_PX);
        let mut path = points.clone();
        if let Some(hover) = hover {
            path.push(hover);
        }
        if path.len() >= 2 {
            scene.push(
                Layer::Preview,
                DrawCommand::Path { points: path, closed: false, fill: None, stroke: Some(Stroke::dashed(PREVIEW_COLOR, width)) },
            );
        }

        if *mode == DrawingMode::Room && points.len() >= 2 {
            let tail = hover.unwrap_or(last);
            scene.push(Layer::Preview, DrawCommand::Line { from: tail, to: points[0], stroke: Stroke::dashed(PREVIEW_COLOR, 1.0) });
        }

        for p in points {
            scene.push(Layer::Preview, marker(*p, 3.0, Some(PREVIEW_COLOR), None));
        }

        let preview_mm = hover.filter(|_| ui.show_measurements).map(|h| (h, units.canvas_to_mm(last.distance(h))));
        if let Some((hover, mm)) = preview_mm.filter(|(_, mm)| mm.is_finite()) {
            let text = units::format_measurement(mm, &ui.measurement);
            let mid = last.midpoint(hover);
            scene.push(Layer::Preview, label(Point::new(mid.x, mid.y - 8.0), &text, 11.0, PREVIEW_COLOR, TextBaseline::Bottom));
        }
    }

    if ui.mode.snaps() {
        if let Some(snap) = ui.last_snap.filter(SnapResult::is_magnetic) {
            let (fill, stroke) = match snap.source {
                Some(SnapSource::Endpoint) => (Some(ENDPOINT_MARKER), None),
                _ => (None, Some(MIDPOINT_MARKER)),
            };
            scene.push(Layer::Preview, marker(snap.point, SNAP_MARKER_RADIUS_PX, fill, stroke));
        }
    }
}

// =============================================================
// Helpers
// =============================================================

fn label(position: Point, text: &str, font_size: f64, color: &str, baseline: TextBaseline) -> DrawCommand {
    DrawCommand::Text {
        position,
        text: text.to_owned(),
        font_size,
        color: color.to_owned(),
        align: TextAlign::Center,
        baseline,
    }
}

fn marker(center: Point, radius: f64, fill: Option<&str>, stroke: Option<&str>) -> DrawCommand {
    DrawCommand::Arc {
        center,
        radius,
        start_angle: 0.0,
        end_angle: 2.0 * PI,
        fill: fill.map(str::to_owned),
        stroke: stroke.map(|c| Stroke::solid(c, 1.5)),
    }
}
