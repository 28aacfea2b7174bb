use std::f64::consts::TAU;

use hexmap_shared::render::RasterTarget;
use hexmap_shared::{Color, Glyph, Point};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Path2d};

/// Canvas 2D backend for the shared renderer.
///
/// Used both for the visible canvas and for the detached cache buffers.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn attach(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }

    /// A canvas that is never inserted into the document.
    pub fn offscreen() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let canvas = document
            .create_element("canvas")
            .ok()?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        Self::attach(canvas)
    }

    fn trace_hexes(&self, polygons: &[[Point; 6]]) {
        self.ctx.begin_path();
        for polygon in polygons {
            let [first, rest @ ..] = polygon;
            self.ctx.move_to(first.x, first.y);
            for corner in rest {
                self.ctx.line_to(corner.x, corner.y);
            }
            self.ctx.close_path();
        }
    }

    fn with_identity(&self, draw: impl FnOnce(&CanvasRenderingContext2d, f64, f64)) {
        self.ctx.save();
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
        draw(
            &self.ctx,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
        self.ctx.restore();
    }
}

impl RasterTarget for CanvasSurface {
    fn resize(&mut self, width: u32, height: u32) -> bool {
        // Assigning the size resets the context state, even to the same value.
        if self.canvas.width() != width {
            self.canvas.set_width(width);
        }
        if self.canvas.height() != height {
            self.canvas.set_height(height);
        }
        self.canvas.width() == width && self.canvas.height() == height && width > 0 && height > 0
    }

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn set_transform(&mut self, scale: f64, translate_x: f64, translate_y: f64) {
        self.ctx
            .set_transform(scale, 0.0, 0.0, scale, translate_x, translate_y)
            .ok();
    }

    fn reset_transform(&mut self) {
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
    }

    fn clear(&mut self) {
        self.with_identity(|ctx, w, h| ctx.clear_rect(0.0, 0.0, w, h));
    }

    fn fill_background(&mut self, color: &Color) {
        self.with_identity(|ctx, w, h| {
            ctx.set_fill_style_str(color.as_str());
            ctx.fill_rect(0.0, 0.0, w, h);
        });
    }

    fn fill_hexes(&mut self, color: &Color, polygons: &[[Point; 6]]) {
        if polygons.is_empty() {
            return;
        }
        self.trace_hexes(polygons);
        self.ctx.set_fill_style_str(color.as_str());
        self.ctx.fill();
    }

    fn stroke_hexes(&mut self, color: &Color, line_width: f64, polygons: &[[Point; 6]]) {
        if polygons.is_empty() {
            return;
        }
        self.trace_hexes(polygons);
        self.ctx.set_stroke_style_str(color.as_str());
        self.ctx.set_line_width(line_width);
        self.ctx.set_line_join("round");
        self.ctx.stroke();
    }

    fn draw_glyph(
        &mut self,
        glyph: &Glyph,
        origin: Point,
        scale: f64,
        color: &Color,
        line_width: f64,
    ) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.translate(origin.x, origin.y).ok();
        ctx.scale(scale, scale).ok();
        ctx.set_stroke_style_str(color.as_str());
        ctx.set_fill_style_str(color.as_str());
        // Width is given in world units, outside the glyph's own scale.
        ctx.set_line_width(line_width / scale);
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        for d in glyph.strokes {
            if let Ok(path) = Path2d::new_with_path_string(d) {
                ctx.stroke_with_path(&path);
            }
        }
        for &(cx, cy, r) in glyph.dots {
            ctx.begin_path();
            if ctx.arc(cx, cy, r, 0.0, TAU).is_ok() {
                ctx.fill();
            }
        }
        ctx.restore();
    }

    fn stroke_polyline(&mut self, points: &[Point], color: &Color, line_width: f64) {
        let [first, rest @ ..] = points else {
            return;
        };
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(first.x, first.y);
        for p in rest {
            ctx.line_to(p.x, p.y);
        }
        ctx.set_stroke_style_str(color.as_str());
        ctx.set_line_width(line_width);
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        ctx.stroke();
    }

    fn draw_marker(
        &mut self,
        center: Point,
        radius: f64,
        fill: &Color,
        outline: &Color,
        outline_width: f64,
    ) {
        let ctx = &self.ctx;
        ctx.begin_path();
        if ctx.arc(center.x, center.y, radius, 0.0, TAU).is_err() {
            return;
        }
        ctx.set_fill_style_str(fill.as_str());
        ctx.fill();
        ctx.set_stroke_style_str(outline.as_str());
        ctx.set_line_width(outline_width);
        ctx.stroke();
    }

    fn blit(&mut self, source: &Self, dest_x: f64, dest_y: f64, dest_w: f64, dest_h: f64) {
        if source.canvas.width() == 0 || source.canvas.height() == 0 {
            return;
        }
        self.ctx
            .draw_image_with_html_canvas_element_and_dw_and_dh(
                &source.canvas,
                dest_x,
                dest_y,
                dest_w,
                dest_h,
            )
            .ok();
    }
}
