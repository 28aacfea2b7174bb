pub mod camera;
pub mod config;
pub mod editor;
pub mod gesture;
pub mod hex;
pub mod icons;
pub mod map;
pub mod paint;
pub mod render;

pub use camera::{Camera, CameraRig};
pub use config::{EngineConfig, Theme};
pub use editor::{EditorEvent, HexMapEditor};
pub use gesture::*;
pub use hex::{Hex, Point};
pub use icons::{BuiltinIcons, Glyph, IconRegistry};
pub use map::*;
pub use paint::{GridUpdate, PaintAttributes, PaintMode, StrokeMode};
