use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::{LayerKind, RasterTarget, WorldBounds, select_layer, world_bounds};
use crate::camera::Camera;
use crate::config::{
    BORDER_LINE_WIDTH, ICON_SCALE, ICON_STROKE_WIDTH, MAX_BUFFER_DIM, PATH_POINT_OUTLINE,
    PATH_POINT_RADIUS, SELECTION_LINE_WIDTH, Theme,
};
use crate::hex::{Hex, Point, hex_polygon, hex_to_pixel};
use crate::icons::{GLYPH_VIEWBOX, IconRegistry};
use crate::map::{Color, HexMap, IconId, Path};

/// Everything a cached layer depends on. Camera state is deliberately absent.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheKey {
    pub generation: u64,
    pub theme: Theme,
    pub hex_size: f64,
    pub resolution: f64,
}

pub struct CacheInput<'a> {
    pub map: &'a HexMap,
    /// Content generation of `map`; must change whenever its tiles do.
    pub generation: u64,
    pub hex_size: f64,
    pub theme: &'a Theme,
    pub icons: &'a dyn IconRegistry,
    pub resolution: f64,
}

impl CacheInput<'_> {
    pub fn key(&self) -> CacheKey {
        CacheKey {
            generation: self.generation,
            theme: self.theme.clone(),
            hex_size: self.hex_size,
            resolution: self.resolution,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No tiles, or bounds that collapse to nothing.
    DegenerateBounds,
    /// A buffer could not be created or sized; retried on the next call.
    SurfaceUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RebuildStats {
    pub width: u32,
    pub height: u32,
    pub tiles: usize,
    pub color_groups: usize,
    pub icons: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RebuildOutcome {
    Reused,
    Rebuilt(RebuildStats),
    Skipped(SkipReason),
}

/// Per-frame inputs for compositing onto the visible canvas.
pub struct FrameInput<'a> {
    pub camera: &'a Camera,
    /// Device pixels per CSS pixel of the visible canvas.
    pub pixel_ratio: f64,
    pub theme: &'a Theme,
    pub hex_size: f64,
    pub lod_threshold: f64,
    pub paths: &'a [Path],
    pub active_path: Option<&'a str>,
    pub selected: Option<Hex>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompositeStats {
    pub layer: Option<LayerKind>,
    pub paths: usize,
    pub markers: usize,
    pub selection: bool,
}

struct Layers<T> {
    detail: T,
    simplified: T,
    bounds: WorldBounds,
}

/// Pre-rendered detail and silhouette rasters of the whole grid.
///
/// New rasters are always drawn into spare buffers and swapped in as a pair,
/// so compositing never reads a half-drawn layer.
pub struct RenderCache<T> {
    front: Option<Layers<T>>,
    spare: Option<(T, T)>,
    key: Option<CacheKey>,
}

impl<T> Default for RenderCache<T> {
    fn default() -> Self {
        Self {
            front: None,
            spare: None,
            key: None,
        }
    }
}

impl<T: RasterTarget> RenderCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_current(&self, key: &CacheKey) -> bool {
        self.key.as_ref() == Some(key)
    }

    /// Force the next [`RenderCache::ensure`] to rebuild.
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    pub fn bounds(&self) -> Option<WorldBounds> {
        self.front.as_ref().map(|layers| layers.bounds)
    }

    /// Rebuild both layers if `input` differs from what is cached.
    ///
    /// `create` is asked for fresh buffers only when no spare pair exists.
    pub fn ensure(
        &mut self,
        input: &CacheInput<'_>,
        mut create: impl FnMut() -> Option<T>,
    ) -> RebuildOutcome {
        let key = input.key();
        if self.is_current(&key) {
            return RebuildOutcome::Reused;
        }

        let Some(bounds) = world_bounds(input.map, input.hex_size) else {
            warn!(
                tiles = input.map.tiles.len(),
                "skipping cache rebuild: empty bounds"
            );
            self.retire_front();
            self.key = Some(key);
            return RebuildOutcome::Skipped(SkipReason::DegenerateBounds);
        };

        let extent = bounds.width().max(bounds.height());
        let scale = input.resolution.min(MAX_BUFFER_DIM / extent);
        let width = (bounds.width() * scale).ceil().min(MAX_BUFFER_DIM) as u32;
        let height = (bounds.height() * scale).ceil().min(MAX_BUFFER_DIM) as u32;
        if width == 0 || height == 0 {
            self.retire_front();
            self.key = Some(key);
            return RebuildOutcome::Skipped(SkipReason::DegenerateBounds);
        }

        let (mut detail, mut simplified) = match self.spare.take() {
            Some(pair) => pair,
            None => {
                let (Some(a), Some(b)) = (create(), create()) else {
                    return RebuildOutcome::Skipped(SkipReason::SurfaceUnavailable);
                };
                (a, b)
            }
        };
        if !detail.resize(width, height) || !simplified.resize(width, height) {
            self.spare = Some((detail, simplified));
            return RebuildOutcome::Skipped(SkipReason::SurfaceUnavailable);
        }

        let batches = HexBatches::collect(input);
        let translate = (-bounds.min_x * scale, -bounds.min_y * scale);
        for target in [&mut detail, &mut simplified] {
            target.reset_transform();
            target.clear();
            target.set_transform(scale, translate.0, translate.1);
            batches.fill(target);
        }
        detail.stroke_hexes(&input.theme.border, BORDER_LINE_WIDTH, &batches.outlines);
        let icons = batches.draw_icons(&mut detail, input);

        let stats = RebuildStats {
            width,
            height,
            tiles: input.map.tiles.len(),
            color_groups: batches.fills.len(),
            icons,
        };
        debug!(?stats, scale, "render cache rebuilt");

        let previous = self.front.replace(Layers {
            detail,
            simplified,
            bounds,
        });
        self.spare = previous.map(|old| (old.detail, old.simplified));
        self.key = Some(key);
        RebuildOutcome::Rebuilt(stats)
    }

    fn retire_front(&mut self) {
        if let Some(old) = self.front.take() {
            self.spare = Some((old.detail, old.simplified));
        }
    }

    /// Draw one frame: background, the LOD-appropriate layer, then live overlays.
    ///
    /// Returns `None` when `target` has no area; nothing is drawn.
    pub fn composite(&self, target: &mut T, frame: &FrameInput<'_>) -> Option<CompositeStats> {
        let (w, h) = target.size();
        if w == 0 || h == 0 {
            return None;
        }

        let camera = frame.camera;
        let ratio = frame.pixel_ratio;
        target.reset_transform();
        target.fill_background(&frame.theme.background);
        target.set_transform(camera.zoom * ratio, camera.x * ratio, camera.y * ratio);

        let mut stats = CompositeStats::default();
        if let Some(layers) = &self.front {
            let kind = select_layer(camera.zoom, frame.lod_threshold);
            let source = match kind {
                LayerKind::Detail => &layers.detail,
                LayerKind::Simplified => &layers.simplified,
            };
            let b = layers.bounds;
            target.blit(source, b.min_x, b.min_y, b.width(), b.height());
            stats.layer = Some(kind);
        }

        let inv_zoom = 1.0 / camera.zoom;
        for path in frame.paths.iter().filter(|p| p.points.len() >= 2) {
            target.stroke_polyline(&path.points, &path.color, path.stroke_width * inv_zoom);
            stats.paths += 1;
        }

        if let Some(active) = frame
            .active_path
            .and_then(|id| frame.paths.iter().find(|p| p.id == id))
        {
            let outline = Color::from(PATH_POINT_OUTLINE);
            for point in &active.points {
                target.draw_marker(
                    *point,
                    PATH_POINT_RADIUS * inv_zoom,
                    &active.color,
                    &outline,
                    inv_zoom,
                );
                stats.markers += 1;
            }
        }

        if let Some(hex) = frame.selected {
            let ring = [hex_polygon(hex, frame.hex_size)];
            target.stroke_hexes(
                &frame.theme.accent,
                SELECTION_LINE_WIDTH * inv_zoom,
                &ring,
            );
            stats.selection = true;
        }

        target.reset_transform();
        Some(stats)
    }
}

/// Tile polygons grouped by fill color, plus icon placements.
struct HexBatches<'a> {
    fills: BTreeMap<&'a Color, Vec<[Point; 6]>>,
    outlines: Vec<[Point; 6]>,
    icons: Vec<(Point, &'a IconId, &'a Color)>,
}

impl<'a> HexBatches<'a> {
    fn collect(input: &CacheInput<'a>) -> Self {
        let mut fills: BTreeMap<&Color, Vec<[Point; 6]>> = BTreeMap::new();
        let mut outlines = Vec::with_capacity(input.map.tiles.len());
        let mut icons = Vec::new();

        for tile in &input.map.tiles {
            let polygon = hex_polygon(tile.hex, input.hex_size);
            let color = tile.data.color.as_ref().unwrap_or(&input.theme.background);
            fills.entry(color).or_default().push(polygon);
            outlines.push(polygon);

            if let Some(icon) = &tile.data.icon {
                let icon_color = tile
                    .data
                    .icon_color
                    .as_ref()
                    .unwrap_or(&input.theme.foreground);
                icons.push((hex_to_pixel(tile.hex, input.hex_size), icon, icon_color));
            }
        }

        Self {
            fills,
            outlines,
            icons,
        }
    }

    fn fill<T: RasterTarget>(&self, target: &mut T) {
        for (color, polygons) in &self.fills {
            target.fill_hexes(color, polygons);
        }
    }

    fn draw_icons<T: RasterTarget>(&self, target: &mut T, input: &CacheInput<'_>) -> usize {
        let icon_size = input.hex_size * ICON_SCALE;
        let glyph_scale = icon_size / GLYPH_VIEWBOX;
        let mut drawn = 0;
        for (center, icon, color) in &self.icons {
            let Some(glyph) = input.icons.glyph(icon) else {
                continue;
            };
            let origin = Point::new(center.x - icon_size / 2.0, center.y - icon_size / 2.0);
            target.draw_glyph(glyph, origin, glyph_scale, color, ICON_STROKE_WIDTH);
            drawn += 1;
        }
        drawn
    }
}
