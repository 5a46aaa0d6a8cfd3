//! Conversion between real-world millimetres and canvas pixels.
//!
//! `scale` is pixels per millimetre. It is a caller precondition that
//! `scale > 0`; a zero scale yields infinite pixel values, which the render
//! pipeline skips rather than draws.

#[cfg(test)]
#[path = "units_test.rs"]
mod units_test;

use serde::{Deserialize, Serialize};

/// Convert a millimetre quantity to canvas pixels.
#[must_use]
pub fn mm_to_canvas(mm: f64, scale: f64) -> f64 {
    mm * scale
}

/// Convert canvas pixels to millimetres.
#[must_use]
pub fn canvas_to_mm(px: f64, scale: f64) -> f64 {
    px / scale
}

/// Scale-bound converter handed to the geometry, snap and render layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    /// Pixels per millimetre.
    pub scale: f64,
}

impl UnitConverter {
    #[must_use]
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    #[must_use]
    pub fn mm_to_canvas(self, mm: f64) -> f64 {
        mm_to_canvas(mm, self.scale)
    }

    #[must_use]
    pub fn canvas_to_mm(self, px: f64) -> f64 {
        canvas_to_mm(px, self.scale)
    }

    /// Convert an area in squared pixels to squared millimetres.
    #[must_use]
    pub fn canvas_area_to_mm2(self, px2: f64) -> f64 {
        px2 / (self.scale * self.scale)
    }
}

/// Display unit for lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Mm,
    Cm,
    M,
}

impl LengthUnit {
    /// Millimetres per one of this unit.
    #[must_use]
    pub fn mm_per_unit(self) -> f64 {
        match self {
            Self::Mm => 1.0,
            Self::Cm => 10.0,
            Self::M => 1000.0,
        }
    }

    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Mm => "mm",
            Self::Cm => "cm",
            Self::M => "m",
        }
    }
}

/// How lengths are rendered into labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementFormat {
    pub unit: LengthUnit,
    /// Digits after the decimal point.
    pub precision: usize,
    /// Append the unit suffix.
    pub show_unit: bool,
}

impl Default for MeasurementFormat {
    fn default() -> Self {
        Self { unit: LengthUnit::Mm, precision: 0, show_unit: true }
    }
}

/// Render a millimetre length as a label, e.g. `1500` -> `"1500mm"`.
#[must_use]
pub fn format_measurement(mm: f64, format: &MeasurementFormat) -> String {
    let value = positive_zero(mm / format.unit.mm_per_unit());
    let precision = format.precision;
    if format.show_unit {
        format!("{value:.precision$}{}", format.unit.suffix())
    } else {
        format!("{value:.precision$}")
    }
}

/// Render an area in square millimetres as square metres, e.g. `"12.50 m²"`.
#[must_use]
pub fn format_area(mm2: f64, precision: usize) -> String {
    let m2 = positive_zero(mm2 / 1_000_000.0);
    format!("{m2:.precision$} m²")
}

// Negative zero would otherwise print as "-0".
fn positive_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}
