//! Browser backend: replays a [`Scene`] onto a `CanvasRenderingContext2d`.
//!
//! This module is the only place that draws through [`web_sys::CanvasRenderingContext2d`].
//! It interprets draw commands one by one and holds no state of its own.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::geometry::Point;
use crate::render::{DrawCommand, Scene, Stroke, TextAlign, TextBaseline};

/// Draw every command in `scene`, in order.
///
/// `dpr` is the device pixel ratio; commands are in logical canvas pixels.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, scene: &Scene, dpr: f64) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    for command in scene.commands() {
        draw_command(ctx, command)?;
    }
    Ok(())
}

fn draw_command(ctx: &CanvasRenderingContext2d, command: &DrawCommand) -> Result<(), JsValue> {
    match command {
        DrawCommand::Clear { width, height, color } => {
            ctx.clear_rect(0.0, 0.0, *width, *height);
            ctx.set_fill_style_str(color);
            ctx.fill_rect(0.0, 0.0, *width, *height);
            Ok(())
        }
        DrawCommand::Line { from, to, stroke } => {
            ctx.save();
            apply_stroke(ctx, stroke)?;
            ctx.set_line_cap("round");
            ctx.begin_path();
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
            ctx.stroke();
            ctx.restore();
            Ok(())
        }
        DrawCommand::Path { points, closed, fill, stroke } => {
            draw_path(ctx, points, *closed, fill.as_deref(), stroke.as_ref())
        }
        DrawCommand::Rect { center, width, height, rotation, fill, stroke } => {
            ctx.save();
            ctx.translate(center.x, center.y)?;
            ctx.rotate(*rotation)?;
            if let Some(fill) = fill {
                ctx.set_fill_style_str(fill);
                ctx.fill_rect(-width / 2.0, -height / 2.0, *width, *height);
            }
            if let Some(stroke) = stroke {
                apply_stroke(ctx, stroke)?;
                ctx.stroke_rect(-width / 2.0, -height / 2.0, *width, *height);
            }
            ctx.restore();
            Ok(())
        }
        DrawCommand::Arc { center, radius, start_angle, end_angle, fill, stroke } => {
            ctx.save();
            ctx.begin_path();
            ctx.arc(center.x, center.y, *radius, *start_angle, *end_angle)?;
            if let Some(fill) = fill {
                ctx.set_fill_style_str(fill);
                ctx.fill();
            }
            if let Some(stroke) = stroke {
                apply_stroke(ctx, stroke)?;
                ctx.stroke();
            }
            ctx.restore();
            Ok(())
        }
        DrawCommand::Text { position, text, font_size, color, align, baseline } => {
            ctx.save();
            ctx.set_fill_style_str(color);
            ctx.set_font(&format!("{font_size}px sans-serif"));
            ctx.set_text_align(match align {
                TextAlign::Left => "left",
                TextAlign::Center => "center",
            });
            ctx.set_text_baseline(match baseline {
                TextBaseline::Alphabetic => "alphabetic",
                TextBaseline::Middle => "middle",
                TextBaseline::Bottom => "bottom",
            });
            ctx.fill_text(text, position.x, position.y)?;
            ctx.restore();
            Ok(())
        }
    }
}

fn draw_path(
    ctx: &CanvasRenderingContext2d,
    points: &[Point],
    closed: bool,
    fill: Option<&str>,
    stroke: Option<&Stroke>,
) -> Result<(), JsValue> {
    let Some((first, rest)) = points.split_first() else {
        return Ok(());
    };
    ctx.save();
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    if closed {
        ctx.close_path();
    }
    if let Some(fill) = fill {
        ctx.set_fill_style_str(fill);
        ctx.fill();
    }
    if let Some(stroke) = stroke {
        apply_stroke(ctx, stroke)?;
        ctx.set_line_join("round");
        ctx.stroke();
    }
    ctx.restore();
    Ok(())
}

/// Apply color, width and dash pattern. Solid strokes rely on the
/// surrounding `save`/`restore` to leave the dash list empty.
fn apply_stroke(ctx: &CanvasRenderingContext2d, stroke: &Stroke) -> Result<(), JsValue> {
    ctx.set_stroke_style_str(&stroke.color);
    ctx.set_line_width(stroke.width);
    if stroke.is_dashed() {
        let dash_array = js_sys::Array::new();
        for segment in &stroke.dash {
            dash_array.push(&(*segment).into());
        }
        ctx.set_line_dash(&dash_array)?;
    }
    Ok(())
}
