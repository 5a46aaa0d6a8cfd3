//! Input model: drawing modes, modifier keys, normalized input events, UI
//! state, and the drag gesture tracked between pointer-down and pointer-up.
//!
//! Hosts translate raw DOM events into [`InputEvent`]s and hand them to
//! [`EngineCore::dispatch`](crate::engine::EngineCore::dispatch), which
//! resolves snapping once and routes the event to the active mode.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, TextStyle, WallStyle};
use crate::geometry::Point;
use crate::model::EntityId;
use crate::snap::SnapResult;
use crate::units::MeasurementFormat;

/// Which drawing mode is active. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingMode {
    /// Hit-test and select placed products (default).
    #[default]
    Select,
    /// Polyline wall tool: each pair of consecutive points becomes a segment.
    Wall,
    /// Polygon room tool: the closed point list becomes one room.
    Room,
    /// Place a door with a single click.
    Door,
    /// Place a text annotation with a single click.
    Text,
}

impl DrawingMode {
    /// Whether this mode accumulates points before committing.
    #[must_use]
    pub fn is_polyline(self) -> bool {
        matches!(self, Self::Wall | Self::Room)
    }

    /// Whether pointer positions in this mode go through the snap system.
    #[must_use]
    pub fn snaps(self) -> bool {
        !matches!(self, Self::Select)
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Enter"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_enter(&self) -> bool {
        self.0 == "Enter"
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }

    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.0 == "Delete" || self.0 == "Backspace"
    }
}

/// Engine-level input command, normalized from the host's native events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        point: Point,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        point: Point,
    },
    PointerUp {
        point: Point,
    },
    DoubleClick {
        point: Point,
    },
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// A catalog product dragged onto the canvas; `payload` is raw JSON.
    Drop {
        payload: String,
        point: Point,
    },
}

/// Persistent UI state visible to the renderer.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently active drawing mode.
    pub mode: DrawingMode,
    /// Selected products in selection order. Only ids of live products.
    pub selected_products: Vec<EntityId>,
    /// Pixels per millimetre.
    pub scale: f64,
    pub show_grid: bool,
    pub show_measurements: bool,
    pub magnetic_snap: bool,
    /// Latest (snapped) pointer position, used for the live preview segment.
    pub hover: Option<Point>,
    /// Most recent snap result while drawing, for the snap marker.
    pub last_snap: Option<SnapResult>,
    pub wall_style: WallStyle,
    pub text_style: TextStyle,
    pub door_width_mm: f64,
    pub measurement: MeasurementFormat,
}

impl UiState {
    /// Initial UI state from configuration.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            mode: DrawingMode::Select,
            selected_products: Vec::new(),
            scale: config.scale,
            show_grid: config.show_grid,
            show_measurements: config.show_measurements,
            magnetic_snap: config.magnetic_snap,
            hover: None,
            last_snap: None,
            wall_style: config.wall.clone(),
            text_style: config.text.clone(),
            door_width_mm: config.door_width_mm,
            measurement: config.measurement,
        }
    }

    #[must_use]
    pub fn is_selected(&self, id: &EntityId) -> bool {
        self.selected_products.contains(id)
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// Pointer gesture in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A placed product is being dragged in Select mode.
    DraggingProduct {
        id: EntityId,
        /// Pointer position at the previous event.
        last: Point,
        /// Whether any pointer movement happened since pointer-down.
        moved: bool,
    },
}
