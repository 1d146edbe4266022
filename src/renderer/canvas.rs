//! Browser render sink backed by a 2D canvas context

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Color, RenderSink, Shape};
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};

fn css(color: Color) -> String {
    let [r, g, b, a] = color;
    format!(
        "rgba({}, {}, {}, {})",
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
        a
    )
}

pub struct Canvas2dSink {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2dSink {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    /// Scale playfield units onto the canvas backing store
    fn fit_playfield(&self) -> Result<(), JsValue> {
        let sx = self.canvas.width() as f64 / PLAYFIELD_WIDTH as f64;
        let sy = self.canvas.height() as f64 / PLAYFIELD_HEIGHT as f64;
        let scale = sx.min(sy);
        self.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0)
    }
}

impl RenderSink for Canvas2dSink {
    type Error = JsValue;

    fn render(&mut self, shapes: &[Shape]) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        ctx.clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
        self.fit_playfield()?;

        for shape in shapes {
            match shape {
                Shape::Rect { pos, size, color } => {
                    ctx.set_fill_style_str(&css(*color));
                    ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
                }
                Shape::Circle {
                    center,
                    radius,
                    color,
                } => {
                    ctx.set_fill_style_str(&css(*color));
                    ctx.begin_path();
                    ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)?;
                    ctx.fill();
                }
                Shape::Body {
                    center,
                    radius,
                    rotation,
                    color,
                } => {
                    ctx.set_fill_style_str(&css(*color));
                    ctx.begin_path();
                    ctx.ellipse(
                        center.x as f64,
                        center.y as f64,
                        *radius as f64 * 1.15,
                        *radius as f64,
                        *rotation as f64,
                        0.0,
                        TAU,
                    )?;
                    ctx.fill();
                }
                Shape::Text {
                    pos,
                    text,
                    size,
                    color,
                } => {
                    ctx.set_fill_style_str(&css(*color));
                    ctx.set_font(&format!("{size}px sans-serif"));
                    ctx.fill_text(text, pos.x as f64, pos.y as f64)?;
                }
            }
        }
        Ok(())
    }
}
