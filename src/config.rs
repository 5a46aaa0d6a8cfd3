//! Engine configuration passed in at construction.
//!
//! Every field has a default, so hosts only spell out what they change:
//!
//! ```json
//! { "scale": 0.2, "gridSizeMm": 250, "snapTieBreak": "first_match" }
//! ```

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    CANVAS_HEIGHT_PX, CANVAS_WIDTH_PX, DEFAULT_DOOR_WIDTH_MM, DEFAULT_FONT_SIZE_PX, DEFAULT_GRID_SIZE_MM,
    DEFAULT_SCALE, DEFAULT_WALL_THICKNESS_MM, SNAP_THRESHOLD_PX,
};
use crate::model::WallKind;
use crate::snap::TieBreak;
use crate::units::MeasurementFormat;

/// Error returned by [`EngineConfig::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scale must be positive and finite, got {0}")]
    InvalidScale(f64),
    #[error("grid size must be positive and finite, got {0}")]
    InvalidGridSize(f64),
    #[error("snap threshold must be non-negative and finite, got {0}")]
    InvalidThreshold(f64),
    #[error("canvas size must be positive, got {width}x{height}")]
    InvalidCanvasSize { width: f64, height: f64 },
}

/// Style applied to walls drawn from now on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WallStyle {
    pub thickness_mm: f64,
    pub kind: WallKind,
    pub color: String,
}

impl Default for WallStyle {
    fn default() -> Self {
        Self { thickness_mm: DEFAULT_WALL_THICKNESS_MM, kind: WallKind::Interior, color: "#374151".to_owned() }
    }
}

/// Content and style for the next text annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    pub content: String,
    pub font_size: f64,
    pub color: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self { content: "Text".to_owned(), font_size: DEFAULT_FONT_SIZE_PX, color: "#111827".to_owned() }
    }
}

/// Tunables for one engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Pixels per millimetre.
    pub scale: f64,
    pub grid_size_mm: f64,
    /// Screen-space magnetic snap radius; does not change with scale.
    pub snap_threshold_px: f64,
    pub snap_tie_break: TieBreak,
    pub show_grid: bool,
    pub show_measurements: bool,
    pub magnetic_snap: bool,
    pub measurement: MeasurementFormat,
    pub wall: WallStyle,
    pub door_width_mm: f64,
    pub text: TextStyle,
    pub room_color: String,
    pub product_color: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH_PX,
            canvas_height: CANVAS_HEIGHT_PX,
            scale: DEFAULT_SCALE,
            grid_size_mm: DEFAULT_GRID_SIZE_MM,
            snap_threshold_px: SNAP_THRESHOLD_PX,
            snap_tie_break: TieBreak::default(),
            show_grid: true,
            show_measurements: true,
            magnetic_snap: true,
            measurement: MeasurementFormat::default(),
            wall: WallStyle::default(),
            door_width_mm: DEFAULT_DOOR_WIDTH_MM,
            text: TextStyle::default(),
            room_color: "rgba(59, 130, 246, 0.12)".to_owned(),
            product_color: "#93C5FD".to_owned(),
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input, or the first
    /// validation failure from [`EngineConfig::validate`].
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the numeric invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::InvalidScale(self.scale));
        }
        if !(self.grid_size_mm.is_finite() && self.grid_size_mm > 0.0) {
            return Err(ConfigError::InvalidGridSize(self.grid_size_mm));
        }
        if !(self.snap_threshold_px.is_finite() && self.snap_threshold_px >= 0.0) {
            return Err(ConfigError::InvalidThreshold(self.snap_threshold_px));
        }
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return Err(ConfigError::InvalidCanvasSize { width: self.canvas_width, height: self.canvas_height });
        }
        Ok(())
    }
}
