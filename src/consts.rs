//! Shared numeric constants for the floor-plan engine.
//!
//! Canvas, scale, snapping and entity defaults seed
//! [`crate::config::EngineConfig`]; the engine reads the configured values.
//! Tolerances and render metrics are used directly.

// ── Canvas ──────────────────────────────────────────────────────

/// Logical canvas width in pixels.
pub const CANVAS_WIDTH_PX: f64 = 1000.0;

/// Logical canvas height in pixels.
pub const CANVAS_HEIGHT_PX: f64 = 600.0;

// ── Scale and grid ──────────────────────────────────────────────

/// Pixels per millimetre at zoom 1 (1000 px covers 10 m).
pub const DEFAULT_SCALE: f64 = 0.1;

/// Grid spacing in millimetres.
pub const DEFAULT_GRID_SIZE_MM: f64 = 500.0;

/// Grid cells smaller than this on screen are not drawn.
pub const MIN_GRID_CELL_PX: f64 = 4.0;

// ── Snapping ────────────────────────────────────────────────────

/// Screen-space radius for magnetic snapping, independent of scale.
pub const SNAP_THRESHOLD_PX: f64 = 20.0;

/// Grid snaps closer than this to the raw point are reported as unsnapped.
pub const SNAP_EPSILON_PX: f64 = 1e-6;

// ── Entity defaults ─────────────────────────────────────────────

/// Default wall thickness in millimetres.
pub const DEFAULT_WALL_THICKNESS_MM: f64 = 150.0;

/// Default door leaf width in millimetres.
pub const DEFAULT_DOOR_WIDTH_MM: f64 = 900.0;

/// Default annotation font size in pixels.
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

// ── Rendering ───────────────────────────────────────────────────

/// Dash length for in-progress preview strokes, in pixels.
pub const PREVIEW_DASH_PX: f64 = 6.0;

/// Gap between a product's rotated footprint and its name label, in pixels.
pub const PRODUCT_LABEL_GAP_PX: f64 = 6.0;

/// Radius of the magnetic snap marker, in pixels.
pub const SNAP_MARKER_RADIUS_PX: f64 = 5.0;
