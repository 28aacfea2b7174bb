mod cache;

pub use cache::{
    CacheInput, CacheKey, CompositeStats, FrameInput, RebuildOutcome, RebuildStats, RenderCache,
    SkipReason,
};

use crate::config::BORDER_LINE_WIDTH;
use crate::hex::{Point, hex_to_pixel};
use crate::icons::Glyph;
use crate::map::{Color, HexMap, MapShape};

/// A 2D drawing surface: either an off-screen cache buffer or the visible canvas.
///
/// Coordinates passed to drawing calls are transformed by the current
/// transform (`device = world * scale + translate`). Line widths are in the
/// same units as the coordinates they accompany.
pub trait RasterTarget {
    /// Resize the backing store. Returns `false` if the surface is unusable.
    fn resize(&mut self, width: u32, height: u32) -> bool;
    fn size(&self) -> (u32, u32);
    fn set_transform(&mut self, scale: f64, translate_x: f64, translate_y: f64);
    fn reset_transform(&mut self);
    /// Make every pixel transparent.
    fn clear(&mut self);
    /// Paint every pixel with `color`, ignoring the transform.
    fn fill_background(&mut self, color: &Color);
    /// Fill all polygons with one color in a single draw call.
    fn fill_hexes(&mut self, color: &Color, polygons: &[[Point; 6]]);
    /// Stroke the outline of all polygons in a single draw call.
    fn stroke_hexes(&mut self, color: &Color, line_width: f64, polygons: &[[Point; 6]]);
    /// Draw `glyph` with its view box scaled by `scale` and its top-left at `origin`.
    fn draw_glyph(
        &mut self,
        glyph: &Glyph,
        origin: Point,
        scale: f64,
        color: &Color,
        line_width: f64,
    );
    fn stroke_polyline(&mut self, points: &[Point], color: &Color, line_width: f64);
    fn draw_marker(
        &mut self,
        center: Point,
        radius: f64,
        fill: &Color,
        outline: &Color,
        outline_width: f64,
    );
    /// Copy the whole of `source` into the destination rectangle.
    fn blit(&mut self, source: &Self, dest_x: f64, dest_y: f64, dest_w: f64, dest_h: f64);
}

/// Axis-aligned world-space rectangle covered by the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl WorldBounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

/// Extra `(horizontal, vertical)` slack around the tile centers per shape.
fn shape_padding(shape: MapShape, hex_size: f64) -> (f64, f64) {
    match shape {
        // Offset columns stagger sideways only.
        MapShape::Rectangular => (hex_size, 0.0),
        MapShape::Radial => (hex_size * 0.5, hex_size * 0.5),
    }
}

/// World rectangle that contains every tile polygon plus its border stroke.
///
/// `None` for an empty grid or degenerate geometry.
pub fn world_bounds(map: &HexMap, hex_size: f64) -> Option<WorldBounds> {
    if map.tiles.is_empty() || !hex_size.is_finite() || hex_size <= 0.0 {
        return None;
    }

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for tile in &map.tiles {
        let center = hex_to_pixel(tile.hex, hex_size);
        min_x = min_x.min(center.x);
        min_y = min_y.min(center.y);
        max_x = max_x.max(center.x);
        max_y = max_y.max(center.y);
    }

    let (shape_x, shape_y) = shape_padding(map.shape, hex_size);
    let pad_x = hex_size + shape_x + BORDER_LINE_WIDTH;
    let pad_y = hex_size + shape_y + BORDER_LINE_WIDTH;
    let bounds = WorldBounds {
        min_x: min_x - pad_x,
        min_y: min_y - pad_y,
        max_x: max_x + pad_x,
        max_y: max_y + pad_y,
    };
    let valid = bounds.width().is_finite()
        && bounds.height().is_finite()
        && bounds.width() > 0.0
        && bounds.height() > 0.0;
    valid.then_some(bounds)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Detail,
    Simplified,
}

/// Level-of-detail choice: the detail layer only above `threshold`.
pub fn select_layer(zoom: f64, threshold: f64) -> LayerKind {
    if zoom > threshold {
        LayerKind::Detail
    } else {
        LayerKind::Simplified
    }
}
