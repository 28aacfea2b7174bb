//! Input classification for the map editor.
//!
//! Raw pointer, wheel and touch input is described by [`InputEvent`]. The
//! modifier-key overrides are decided up front by [`resolve_effective_action`],
//! so the state machine in [`crate::editor`] only has to carry out an action.

use serde::{Deserialize, Serialize};

use crate::hex::{Hex, Point};
use crate::paint::{PaintAttributes, PaintMode, StrokeMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Settings,
    Paint,
    Path,
    Data,
}

/// Momentary modifier keys. `ctrl` also covers the platform command key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
    };
}

/// Everything the owner tells the editor about the current tool selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureContext {
    pub tool: Tool,
    pub paint_mode: PaintMode,
    pub paint: PaintAttributes,
    pub modifiers: Modifiers,
    pub eyedropper_armed: bool,
    /// Id of the path currently being drawn.
    pub path_drawing: Option<String>,
}

/// What a primary click or one-finger tap does under the current context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveAction {
    AppendPathPoint,
    Sample,
    Fill,
    Stroke(StrokeMode),
    Select,
}

impl EffectiveAction {
    /// Whether a one-finger touch with this action should also pan while dragging.
    pub fn pans_on_touch_drag(&self) -> bool {
        matches!(self, EffectiveAction::Fill | EffectiveAction::Select)
    }
}

/// Resolve tool, sub-mode and held modifiers into a single action.
///
/// Precedence: active path drawing, then eyedropper (armed, or alt while
/// brushing), then bucket (sub-mode, or ctrl while brushing), then erase
/// (sub-mode, or shift while brushing), then brush. Non-paint tools select.
pub fn resolve_effective_action(ctx: &GestureContext) -> EffectiveAction {
    if ctx.tool == Tool::Path && ctx.path_drawing.is_some() {
        return EffectiveAction::AppendPathPoint;
    }

    let brushing = ctx.tool == Tool::Paint && ctx.paint_mode == PaintMode::Brush;
    if ctx.eyedropper_armed || (brushing && ctx.modifiers.alt) {
        return EffectiveAction::Sample;
    }

    if ctx.tool != Tool::Paint {
        return EffectiveAction::Select;
    }

    match ctx.paint_mode {
        PaintMode::Bucket => EffectiveAction::Fill,
        PaintMode::Erase => EffectiveAction::Stroke(StrokeMode::Erase),
        PaintMode::Brush if ctx.modifiers.ctrl => EffectiveAction::Fill,
        PaintMode::Brush if ctx.modifiers.shift => EffectiveAction::Stroke(StrokeMode::Erase),
        PaintMode::Brush => EffectiveAction::Stroke(StrokeMode::Brush),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    Other(i16),
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => PointerButton::Primary,
            1 => PointerButton::Middle,
            2 => PointerButton::Secondary,
            other => PointerButton::Other(other),
        }
    }

    pub fn pans(&self) -> bool {
        matches!(self, PointerButton::Middle | PointerButton::Secondary)
    }
}

/// Raw input in canvas-local screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { button: PointerButton, at: Point },
    PointerMove { at: Point },
    PointerUp { button: PointerButton },
    /// The pointer left the canvas; treated as a release.
    PointerLeave,
    /// `delta_y < 0` zooms in.
    Wheel { at: Point, delta_y: f64 },
    TouchStart { touches: Vec<Point> },
    TouchMove { touches: Vec<Point> },
    /// Fingers still down after the change.
    TouchEnd { remaining: Vec<Point> },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Panning {
        last: Point,
    },
    Painting {
        mode: StrokeMode,
        last_hex: Hex,
    },
    Pinching {
        distance: f64,
        midpoint: Point,
    },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }
}
