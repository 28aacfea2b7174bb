use serde::{Deserialize, Serialize};

use crate::config::{FIT_PADDING, MAX_ZOOM, MIN_ZOOM};
use crate::hex::Point;

/// Pan/zoom transform from world coordinates to screen coordinates.
///
/// `screen = world * zoom + (x, y)`, with `(x, y)` measured in screen pixels
/// from the canvas top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(world.x * self.zoom + self.x, world.y * self.zoom + self.y)
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.x) / self.zoom,
            (screen.y - self.y) / self.zoom,
        )
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Multiply zoom by `factor` while keeping the world point under `anchor` fixed.
    ///
    /// The new zoom is clamped to `[MIN_ZOOM, MAX_ZOOM]`; the offset is solved from
    /// the clamped ratio so the anchor never drifts.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let ratio = new_zoom / self.zoom;

        self.x = anchor.x - (anchor.x - self.x) * ratio;
        self.y = anchor.y - (anchor.y - self.y) * ratio;
        self.zoom = new_zoom;
    }

    /// Place `world` at the middle of a `canvas_w` x `canvas_h` canvas.
    pub fn center_on(&mut self, world: Point, canvas_w: f64, canvas_h: f64) {
        self.x = canvas_w / 2.0 - world.x * self.zoom;
        self.y = canvas_h / 2.0 - world.y * self.zoom;
    }

    /// Frame the world rectangle `(min_x, min_y, max_x, max_y)` with padding.
    pub fn fit_bounds(&mut self, bounds: (f64, f64, f64, f64), canvas_w: f64, canvas_h: f64) {
        let (min_x, min_y, max_x, max_y) = bounds;
        let world_w = max_x - min_x;
        let world_h = max_y - min_y;

        if world_w <= 0.0 || world_h <= 0.0 || canvas_w <= 0.0 || canvas_h <= 0.0 {
            return;
        }

        let scale_x = canvas_w / (world_w * (1.0 + FIT_PADDING * 2.0));
        let scale_y = canvas_h / (world_h * (1.0 + FIT_PADDING * 2.0));
        self.zoom = scale_x.min(scale_y).clamp(MIN_ZOOM, MAX_ZOOM);

        let center = Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
        self.center_on(center, canvas_w, canvas_h);
    }
}

/// A committed camera plus the live copy mutated during a drag or pinch.
///
/// Interaction writes to `live`; the owner only sees `committed`, which is
/// refreshed once the gesture ends.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraRig {
    committed: Camera,
    live: Camera,
}

impl CameraRig {
    pub fn new(camera: Camera) -> Self {
        Self {
            committed: camera,
            live: camera,
        }
    }

    pub fn live(&self) -> &Camera {
        &self.live
    }

    pub fn live_mut(&mut self) -> &mut Camera {
        &mut self.live
    }

    pub fn committed(&self) -> &Camera {
        &self.committed
    }

    /// Flush `live` into `committed`. Returns the camera if anything moved.
    pub fn commit(&mut self) -> Option<Camera> {
        if self.live == self.committed {
            return None;
        }
        self.committed = self.live;
        Some(self.committed)
    }

    /// Overwrite both copies, e.g. when the owner restores a saved view.
    pub fn reset(&mut self, camera: Camera) {
        self.committed = camera;
        self.live = camera;
    }
}
