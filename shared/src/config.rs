use serde::{Deserialize, Serialize};

use crate::map::Color;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;
/// Zoom multiplier for one wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 1.1;
/// Above this zoom the detail layer is composited, otherwise the silhouette.
pub const LOD_THRESHOLD: f64 = 0.4;
pub const DEFAULT_HEX_SIZE: f64 = 25.0;
/// Largest side, in pixels, of an off-screen cache buffer.
pub const MAX_BUFFER_DIM: f64 = 8192.0;
pub const FIT_PADDING: f64 = 0.05;

pub const BORDER_LINE_WIDTH: f64 = 1.0;
pub const ICON_STROKE_WIDTH: f64 = 1.5;
/// Icons occupy this fraction of the hex size.
pub const ICON_SCALE: f64 = 0.9;
pub const SELECTION_LINE_WIDTH: f64 = 3.0;
pub const PATH_POINT_RADIUS: f64 = 4.0;
pub const PATH_POINT_OUTLINE: &str = "rgba(255, 255, 255, 0.8)";

pub const DEFAULT_BACKGROUND: &str = "#1A0024";
pub const DEFAULT_BORDER: &str = "#4B0082";
pub const DEFAULT_ACCENT: &str = "#8A2BE2";
pub const DEFAULT_FOREGROUND: &str = "#E0D6F0";

/// Colors the cached layers and overlays are drawn with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Theme {
    pub background: Color,
    pub border: Color,
    pub accent: Color,
    pub foreground: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::from(DEFAULT_BACKGROUND),
            border: Color::from(DEFAULT_BORDER),
            accent: Color::from(DEFAULT_ACCENT),
            foreground: Color::from(DEFAULT_FOREGROUND),
        }
    }
}

/// User-tunable engine settings; persisted by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub hex_size: f64,
    pub lod_threshold: f64,
    pub wheel_zoom_step: f64,
    /// Cache buffer pixels per world pixel, before the [`MAX_BUFFER_DIM`] cap.
    pub cache_resolution: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hex_size: DEFAULT_HEX_SIZE,
            lod_threshold: LOD_THRESHOLD,
            wheel_zoom_step: WHEEL_ZOOM_STEP,
            cache_resolution: 1.0,
        }
    }
}

impl EngineConfig {
    /// Replaces nonsensical values (non-finite, non-positive) with defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let positive = |value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };
        Self {
            hex_size: positive(self.hex_size, defaults.hex_size),
            lod_threshold: positive(self.lod_threshold, defaults.lod_threshold),
            wheel_zoom_step: if self.wheel_zoom_step.is_finite() && self.wheel_zoom_step > 1.0 {
                self.wheel_zoom_step
            } else {
                defaults.wheel_zoom_step
            },
            cache_resolution: positive(self.cache_resolution, defaults.cache_resolution),
        }
    }
}
