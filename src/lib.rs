//! Floor-plan drawing engine for the laboratory-equipment planner.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! interactive 2D plan: translating normalized input events into walls, rooms,
//! doors, text and placed products, snapping the pointer to the grid and to
//! existing walls, hit-testing products, and rendering the scene in a fixed
//! layer order. The host layer wires DOM events to the engine and persists the
//! entity collections it exposes.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`model`] | Entity types and the in-memory entity store |
//! | [`drawing`] | Wall/room polyline state machine |
//! | [`input`] | Drawing modes, input events, UI state |
//! | [`snap`] | Magnetic and grid snapping |
//! | [`hit`] | Product and wall hit-testing |
//! | [`geometry`] | Pure polygon, segment and rotated-rectangle math |
//! | [`units`] | Millimetre/pixel conversion and measurement labels |
//! | [`render`] | Ordered draw-command list for a frame |
//! | [`canvas2d`] | Replays draw commands onto a browser 2D context |
//! | [`config`] | Engine configuration |
//! | [`consts`] | Default numeric constants |

pub mod canvas2d;
pub mod config;
pub mod consts;
pub mod drawing;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod model;
pub mod render;
pub mod snap;
pub mod units;
