use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::canvas2d;
use crate::config::{EngineConfig, TextStyle, WallStyle};
use crate::drawing::{self, Commit, DrawingState, GeometryError};
use crate::geometry::Point;
use crate::hit;
use crate::input::{Button, DrawingMode, Gesture, InputEvent, Key, Modifiers, UiState};
use crate::model::{
    Door, EntityId, Entities, PlacedProduct, PlanStore, ProductPatch, ProductPayload, ProductPlacement, Room,
    TextAnnotation, WallSegment,
};
use crate::render::{self, Scene, SceneInput};
use crate::snap::{self, SnapResult, SnapSettings};
use crate::units::UnitConverter;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Action {
    WallsCreated(Vec<WallSegment>),
    RoomCreated(Room),
    DoorCreated(Door),
    TextCreated(TextAnnotation),
    ProductUpdated { id: EntityId, fields: ProductPatch },
    ProductsDeleted(Vec<EntityId>),
    SelectionChanged(Vec<EntityId>),
    /// A catalog product was dropped; the host decides whether to place it.
    ProductDropped(ProductPlacement),
    SetCursor(String),
    RenderNeeded,
}

/// Invoked with the segments of each committed wall polyline.
pub type WallCompleteCallback = Box<dyn FnMut(&[WallSegment])>;

/// Invoked with the placement built from each valid catalog drop.
pub type ProductDropCallback = Box<dyn FnMut(&ProductPlacement)>;

/// Engine state and input handling, independent of the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub config: EngineConfig,
    pub store: PlanStore,
    pub ui: UiState,
    pub drawing: DrawingState,
    pub gesture: Gesture,
    on_wall_complete: Option<WallCompleteCallback>,
    on_product_drop: Option<ProductDropCallback>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            ui: UiState::from_config(&config),
            config,
            store: PlanStore::new(),
            drawing: DrawingState::Idle,
            gesture: Gesture::Idle,
            on_wall_complete: None,
            on_product_drop: None,
        }
    }

    // --- Callbacks ---

    /// Register the callback fired after each committed wall polyline.
    pub fn on_wall_complete(&mut self, callback: impl FnMut(&[WallSegment]) + 'static) {
        self.on_wall_complete = Some(Box::new(callback));
    }

    /// Register the callback fired for each valid catalog drop.
    pub fn on_product_drop(&mut self, callback: impl FnMut(&ProductPlacement) + 'static) {
        self.on_product_drop = Some(Box::new(callback));
    }

    // --- Mode and view settings ---

    /// Switch the active drawing mode, abandoning any in-progress path.
    pub fn set_mode(&mut self, mode: DrawingMode) -> Vec<Action> {
        let was_drawing = !self.drawing.is_idle();
        self.drawing = std::mem::take(&mut self.drawing).cancel();
        self.gesture = Gesture::Idle;
        self.ui.last_snap = None;
        if self.ui.mode == mode && !was_drawing {
            return Vec::new();
        }
        self.ui.mode = mode;
        let cursor = if mode == DrawingMode::Select { "default" } else { "crosshair" };
        vec![Action::SetCursor(cursor.to_owned()), Action::RenderNeeded]
    }

    /// Set pixels per millimetre. Must be positive; not checked here.
    pub fn set_scale(&mut self, scale: f64) {
        self.ui.scale = scale;
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.ui.show_grid = show;
    }

    pub fn set_show_measurements(&mut self, show: bool) {
        self.ui.show_measurements = show;
    }

    pub fn set_magnetic_snap(&mut self, enabled: bool) {
        self.ui.magnetic_snap = enabled;
    }

    /// Style for walls committed from now on.
    pub fn set_wall_style(&mut self, style: WallStyle) {
        self.ui.wall_style = style;
    }

    /// Content and style for text placed from now on.
    pub fn set_text_style(&mut self, style: TextStyle) {
        self.ui.text_style = style;
    }

    pub fn set_door_width(&mut self, width_mm: f64) {
        self.ui.door_width_mm = width_mm;
    }

    // --- Input ---

    /// Route a normalized input event to the matching handler.
    pub fn dispatch(&mut self, event: InputEvent) -> Vec<Action> {
        match event {
            InputEvent::PointerDown { point, button, modifiers } => self.on_pointer_down(point, button, modifiers),
            InputEvent::PointerMove { point } => self.on_pointer_move(point),
            InputEvent::PointerUp { point } => self.on_pointer_up(point),
            InputEvent::DoubleClick { point } => self.on_double_click(point),
            InputEvent::KeyDown { key, modifiers } => self.on_key_down(&key, modifiers),
            InputEvent::Drop { payload, point } => self.on_drop(&payload, point),
        }
    }

    pub fn on_pointer_down(&mut self, point: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        match self.ui.mode {
            DrawingMode::Select => self.select_at(point, modifiers),
            DrawingMode::Wall | DrawingMode::Room => {
                let snapped = self.track_snap(point);
                self.drawing = std::mem::take(&mut self.drawing).click(self.ui.mode, snapped);
                vec![Action::RenderNeeded]
            }
            DrawingMode::Door => {
                let snapped = self.track_snap(point);
                self.place_door(point, snapped)
            }
            DrawingMode::Text => {
                let snapped = self.track_snap(point);
                self.place_text(snapped)
            }
        }
    }

    pub fn on_pointer_move(&mut self, point: Point) -> Vec<Action> {
        if let Gesture::DraggingProduct { id, last, .. } = self.gesture {
            let (dx, dy) = (point.x - last.x, point.y - last.y);
            let Some(product) = self.store.product_mut(&id) else {
                self.gesture = Gesture::Idle;
                return Vec::new();
            };
            product.position = Point::new(product.position.x + dx, product.position.y + dy);
            self.gesture = Gesture::DraggingProduct { id, last: point, moved: true };
            return vec![Action::RenderNeeded];
        }

        if !self.ui.mode.snaps() {
            return Vec::new();
        }
        let had_marker = self.ui.last_snap.is_some_and(|s| s.is_magnetic());
        self.track_snap(point);
        let has_marker = self.ui.last_snap.is_some_and(|s| s.is_magnetic());
        if !self.drawing.is_idle() || had_marker || has_marker {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    pub fn on_pointer_up(&mut self, _point: Point) -> Vec<Action> {
        let gesture = std::mem::take(&mut self.gesture);
        let Gesture::DraggingProduct { id, moved: true, .. } = gesture else {
            return Vec::new();
        };
        let Some(product) = self.store.product(&id) else {
            return Vec::new();
        };
        let fields = ProductPatch { position: Some(product.position), ..Default::default() };
        vec![Action::ProductUpdated { id, fields }, Action::RenderNeeded]
    }

    /// Finish the active polyline. Ignored while it has too few points.
    pub fn on_double_click(&mut self, _point: Point) -> Vec<Action> {
        if !self.drawing.can_finish() {
            return Vec::new();
        }
        self.finish_drawing()
    }

    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        if key.is_enter() {
            return self.finish_drawing();
        }
        if key.is_escape() {
            return self.cancel_drawing();
        }
        if key.is_delete() && self.ui.mode == DrawingMode::Select {
            return self.delete_selected();
        }
        Vec::new()
    }

    /// Handle a catalog product dropped at `point`, in any mode.
    ///
    /// Malformed payloads are logged and dropped.
    pub fn on_drop(&mut self, payload: &str, point: Point) -> Vec<Action> {
        let payload = match ProductPayload::parse(payload) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "ignoring product drop");
                return Vec::new();
            }
        };
        let placement = payload.into_placement(point);
        if let Some(callback) = self.on_product_drop.as_mut() {
            callback(&placement);
        }
        vec![Action::ProductDropped(placement)]
    }

    // --- Polyline commits ---

    /// Commit the in-progress wall polyline, if that is what is being drawn.
    pub fn complete_wall_polyline(&mut self) -> Vec<Action> {
        if self.drawing.mode() != Some(DrawingMode::Wall) {
            return Vec::new();
        }
        self.finish_drawing()
    }

    /// Commit the in-progress room polygon, if that is what is being drawn.
    pub fn complete_room_polyline(&mut self) -> Vec<Action> {
        if self.drawing.mode() != Some(DrawingMode::Room) {
            return Vec::new();
        }
        self.finish_drawing()
    }

    /// Abandon the in-progress path without committing anything.
    pub fn cancel_drawing(&mut self) -> Vec<Action> {
        if self.drawing.is_idle() {
            return Vec::new();
        }
        self.drawing = std::mem::take(&mut self.drawing).cancel();
        self.ui.last_snap = None;
        vec![Action::RenderNeeded]
    }

    fn finish_drawing(&mut self) -> Vec<Action> {
        let state = std::mem::take(&mut self.drawing);
        if state.is_idle() {
            return Vec::new();
        }
        self.ui.last_snap = None;
        match state.finish() {
            Ok(Commit::Walls(pairs)) => self.commit_walls(pairs),
            Ok(Commit::Room(points)) => self.commit_room(points),
            Err(e) => {
                debug!(error = %e, "discarding in-progress path");
                vec![Action::RenderNeeded]
            }
        }
    }

    fn commit_walls(&mut self, pairs: Vec<(Point, Point)>) -> Vec<Action> {
        let style = &self.ui.wall_style;
        let walls: Vec<WallSegment> = pairs
            .into_iter()
            .map(|(start, end)| WallSegment {
                id: Uuid::new_v4(),
                start,
                end,
                thickness_mm: style.thickness_mm,
                kind: style.kind,
                color: style.color.clone(),
            })
            .collect();
        for wall in &walls {
            self.store.push_wall(wall.clone());
        }
        debug!(count = walls.len(), "committed wall polyline");
        if let Some(callback) = self.on_wall_complete.as_mut() {
            callback(&walls);
        }
        vec![Action::WallsCreated(walls), Action::RenderNeeded]
    }

    fn commit_room(&mut self, points: Vec<Point>) -> Vec<Action> {
        let mut room = Room {
            id: Uuid::new_v4(),
            name: format!("Room {}", self.store.rooms().len() + 1),
            points,
            area_mm2: 0.0,
            perimeter_mm: 0.0,
            color: self.config.room_color.clone(),
        };
        room.recompute(self.units());
        debug!(id = %room.id, area_mm2 = room.area_mm2, "committed room");
        self.store.push_room(room.clone());
        vec![Action::RoomCreated(room), Action::RenderNeeded]
    }

    // --- Single-click tools ---

    fn select_at(&mut self, point: Point, modifiers: Modifiers) -> Vec<Action> {
        let hit = hit::hit_product(point, self.store.products(), self.units());
        let before = self.ui.selected_products.clone();
        let selection = &mut self.ui.selected_products;

        match (hit, modifiers.shift) {
            (Some(id), true) => {
                if let Some(idx) = selection.iter().position(|s| *s == id) {
                    selection.remove(idx);
                } else {
                    selection.push(id);
                }
            }
            (Some(id), false) => {
                selection.clear();
                selection.push(id);
                self.gesture = Gesture::DraggingProduct { id, last: point, moved: false };
            }
            (None, true) => {}
            (None, false) => selection.clear(),
        }

        if self.ui.selected_products == before {
            return Vec::new();
        }
        vec![Action::SelectionChanged(self.ui.selected_products.clone()), Action::RenderNeeded]
    }

    /// Walls are searched from the raw pointer so grid rounding can't pull a
    /// door off the wall it was aimed at.
    fn place_door(&mut self, raw: Point, snapped: Point) -> Vec<Action> {
        let embed = hit::nearest_wall(raw, self.store.walls(), self.config.snap_threshold_px);
        let door = Door {
            id: Uuid::new_v4(),
            position: embed.map_or(snapped, |h| h.point),
            width_mm: self.ui.door_width_mm,
            wall_id: None,
            wall_segment_id: embed.map(|h| h.wall_id),
            wall_position: embed.map(|h| h.t),
            is_embedded: embed.is_some(),
        };
        self.store.push_door(door.clone());
        vec![Action::DoorCreated(door), Action::RenderNeeded]
    }

    fn place_text(&mut self, point: Point) -> Vec<Action> {
        let style = &self.ui.text_style;
        let text = TextAnnotation {
            id: Uuid::new_v4(),
            position: point,
            text: style.content.clone(),
            font_size: style.font_size,
            color: style.color.clone(),
        };
        self.store.push_text(text.clone());
        vec![Action::TextCreated(text), Action::RenderNeeded]
    }

    fn delete_selected(&mut self) -> Vec<Action> {
        let ids = std::mem::take(&mut self.ui.selected_products);
        if ids.is_empty() {
            return Vec::new();
        }
        for id in &ids {
            self.store.remove_product(id);
        }
        vec![Action::ProductsDeleted(ids), Action::SelectionChanged(Vec::new()), Action::RenderNeeded]
    }

    // --- Entity operations ---

    /// Place a product and return it with its assigned id.
    pub fn add_product(&mut self, placement: ProductPlacement) -> PlacedProduct {
        let product = PlacedProduct {
            id: Uuid::new_v4(),
            product_id: placement.product_id,
            name: placement.name,
            category: placement.category,
            position: placement.position,
            rotation: placement.rotation,
            dimensions: placement.dimensions,
            scale: placement.scale,
            color: placement.color.unwrap_or_else(|| self.config.product_color.clone()),
            model_path: placement.model_path,
            thumbnail: placement.thumbnail,
        };
        self.store.push_product(product.clone());
        product
    }

    /// Apply a sparse edit to a product. Returns false if it doesn't exist.
    pub fn update_product(&mut self, id: &EntityId, patch: &ProductPatch) -> bool {
        self.store.apply_product_patch(id, patch)
    }

    /// Delete a product and drop it from the selection.
    pub fn delete_product(&mut self, id: &EntityId) -> bool {
        self.ui.selected_products.retain(|s| s != id);
        if let Gesture::DraggingProduct { id: dragged, .. } = self.gesture {
            if dragged == *id {
                self.gesture = Gesture::Idle;
            }
        }
        self.store.remove_product(id).is_some()
    }

    /// Delete a wall together with the doors embedded in it.
    pub fn delete_wall(&mut self, id: &EntityId) -> bool {
        self.store.remove_wall(id).is_some()
    }

    pub fn delete_room(&mut self, id: &EntityId) -> bool {
        self.store.remove_room(id).is_some()
    }

    pub fn delete_door(&mut self, id: &EntityId) -> bool {
        self.store.remove_door(id).is_some()
    }

    pub fn delete_text(&mut self, id: &EntityId) -> bool {
        self.store.remove_text(id).is_some()
    }

    /// Replace an annotation's text. Returns false if it doesn't exist.
    pub fn update_text(&mut self, id: &EntityId, text: String) -> bool {
        let Some(annotation) = self.store.text_mut(id) else {
            return false;
        };
        annotation.text = text;
        true
    }

    /// Replace a room's outline and recompute its area and perimeter.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TooFewPoints`] for fewer than three points;
    /// the room is left untouched.
    pub fn update_room_points(&mut self, id: &EntityId, points: Vec<Point>) -> Result<bool, GeometryError> {
        let points = drawing::room_polygon(points)?;
        let units = self.units();
        let Some(room) = self.store.room_mut(id) else {
            return Ok(false);
        };
        room.points = points;
        room.recompute(units);
        Ok(true)
    }

    /// Serializable snapshot of every collection.
    #[must_use]
    pub fn entities(&self) -> Entities {
        self.store.snapshot()
    }

    /// Replace every collection from a snapshot, resetting transient state.
    pub fn load_entities(&mut self, entities: Entities) {
        self.store.load(entities);
        self.reset_transient();
    }

    /// Remove every entity.
    pub fn clear(&mut self) {
        self.store.clear();
        self.reset_transient();
    }

    /// Drop in-progress drawing and drags, and selections of products that no longer exist.
    fn reset_transient(&mut self) {
        self.drawing = DrawingState::Idle;
        self.gesture = Gesture::Idle;
        self.ui.last_snap = None;
        let store = &self.store;
        self.ui.selected_products.retain(|id| store.product(id).is_some());
    }

    // --- Queries ---

    #[must_use]
    pub fn mode(&self) -> DrawingMode {
        self.ui.mode
    }

    /// Selected product ids, in selection order.
    #[must_use]
    pub fn selection(&self) -> &[EntityId] {
        &self.ui.selected_products
    }

    #[must_use]
    pub fn units(&self) -> UnitConverter {
        UnitConverter::new(self.ui.scale)
    }

    /// Snap `raw` against current geometry and settings.
    #[must_use]
    pub fn snap(&self, raw: Point) -> SnapResult {
        let settings = SnapSettings {
            threshold_px: self.config.snap_threshold_px,
            tie_break: self.config.snap_tie_break,
            magnetic: self.ui.magnetic_snap,
            grid: self.ui.show_grid,
            grid_size_mm: self.config.grid_size_mm,
            units: self.units(),
        };
        snap::snap_point(raw, &self.store, &settings)
    }

    /// Build the draw-command list for the current state.
    #[must_use]
    pub fn scene(&self) -> Scene {
        render::build_scene(&SceneInput {
            store: &self.store,
            ui: &self.ui,
            drawing: &self.drawing,
            canvas_width: self.config.canvas_width,
            canvas_height: self.config.canvas_height,
            grid_size_mm: self.config.grid_size_mm,
        })
    }

    fn track_snap(&mut self, raw: Point) -> Point {
        let result = self.snap(raw);
        self.ui.last_snap = Some(result);
        self.ui.hover = Some(result.point);
        result.point
    }
}

/// The full floor-plan engine. Wraps `EngineCore` and owns the browser canvas element.
///
/// Every state-changing call redraws when the core asks for it.
pub struct Engine {
    canvas: HtmlCanvasElement,
    dpr: f64,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, config: EngineConfig) -> Self {
        let mut engine = Self { canvas, dpr: 1.0, core: EngineCore::with_config(config) };
        engine.set_device_pixel_ratio(1.0);
        engine
    }

    /// Size the backing store for the device pixel ratio; the logical size stays fixed.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_device_pixel_ratio(&mut self, dpr: f64) {
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self.canvas.set_width((self.core.config.canvas_width * self.dpr).round() as u32);
        self.canvas.set_height((self.core.config.canvas_height * self.dpr).round() as u32);
        self.render();
    }

    // --- Delegated input ---

    pub fn dispatch(&mut self, event: InputEvent) -> Vec<Action> {
        let actions = self.core.dispatch(event);
        self.render_if_needed(&actions);
        actions
    }

    pub fn set_mode(&mut self, mode: DrawingMode) -> Vec<Action> {
        let actions = self.core.set_mode(mode);
        self.render_if_needed(&actions);
        actions
    }

    pub fn complete_wall_polyline(&mut self) -> Vec<Action> {
        let actions = self.core.complete_wall_polyline();
        self.render_if_needed(&actions);
        actions
    }

    pub fn complete_room_polyline(&mut self) -> Vec<Action> {
        let actions = self.core.complete_room_polyline();
        self.render_if_needed(&actions);
        actions
    }

    pub fn on_wall_complete(&mut self, callback: impl FnMut(&[WallSegment]) + 'static) {
        self.core.on_wall_complete(callback);
    }

    pub fn on_product_drop(&mut self, callback: impl FnMut(&ProductPlacement) + 'static) {
        self.core.on_product_drop(callback);
    }

    // --- Delegated entity operations ---

    pub fn add_product(&mut self, placement: ProductPlacement) -> PlacedProduct {
        let product = self.core.add_product(placement);
        self.render();
        product
    }

    pub fn update_product(&mut self, id: &EntityId, patch: &ProductPatch) -> bool {
        let updated = self.core.update_product(id, patch);
        if updated {
            self.render();
        }
        updated
    }

    pub fn delete_product(&mut self, id: &EntityId) -> bool {
        let deleted = self.core.delete_product(id);
        if deleted {
            self.render();
        }
        deleted
    }

    pub fn load_entities(&mut self, entities: Entities) {
        self.core.load_entities(entities);
        self.render();
    }

    #[must_use]
    pub fn entities(&self) -> Entities {
        self.core.entities()
    }

    // --- Render ---

    /// Draw the current state to the canvas. A no-op when no 2D context is available.
    pub fn render(&self) {
        let Some(ctx) = self.context() else {
            debug!("no 2d context; skipping render");
            return;
        };
        if let Err(e) = canvas2d::draw(&ctx, &self.core.scene(), self.dpr) {
            warn!(error = %describe_js_error(&e), "canvas draw failed");
        }
    }

    fn render_if_needed(&self, actions: &[Action]) {
        if actions.iter().any(|a| matches!(a, Action::RenderNeeded)) {
            self.render();
        }
    }

    fn context(&self) -> Option<CanvasRenderingContext2d> {
        match self.canvas.get_context("2d") {
            Ok(Some(object)) => match object.dyn_into::<CanvasRenderingContext2d>() {
                Ok(ctx) => Some(ctx),
                Err(_) => None,
            },
            Ok(None) | Err(_) => None,
        }
    }
}

fn describe_js_error(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
