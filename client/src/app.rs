use std::cell::RefCell;

use hexmap_shared::{
    Camera, EngineConfig, Hex, HexMap, Modifiers, PaintAttributes, PaintMode, Tool,
};
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::canvas::HexGridCanvas;
use crate::settings::Settings;
use crate::toolbar::Toolbar;

pub(crate) const DEFAULT_GRID_WIDTH: u32 = 24;
pub(crate) const DEFAULT_GRID_HEIGHT: u32 = 16;
pub(crate) const DEFAULT_GRID_RADIUS: u32 = 8;

/// Newtype wrappers so each owner signal has a distinct context type.
#[derive(Clone, Copy)]
pub(crate) struct MapData(pub RwSignal<HexMap>);
#[derive(Clone, Copy)]
pub(crate) struct ActiveTool(pub RwSignal<Tool>);
#[derive(Clone, Copy)]
pub(crate) struct ActivePaintMode(pub RwSignal<PaintMode>);
#[derive(Clone, Copy)]
pub(crate) struct ActivePaint(pub RwSignal<PaintAttributes>);
#[derive(Clone, Copy)]
pub(crate) struct EyedropperArmed(pub RwSignal<bool>);
/// Id of the path new clicks are appended to.
#[derive(Clone, Copy)]
pub(crate) struct DrawingPath(pub RwSignal<Option<String>>);
#[derive(Clone, Copy)]
pub(crate) struct SelectedHex(pub RwSignal<Option<Hex>>);
/// Modifier keys currently held, as seen by window key events.
#[derive(Clone, Copy)]
pub(crate) struct HeldModifiers(pub RwSignal<Modifiers>);
#[derive(Clone, Copy)]
pub(crate) struct EngineSettings(pub RwSignal<EngineConfig>);
#[derive(Clone, Copy)]
pub(crate) struct CommittedCamera(pub RwSignal<Camera>);

struct KeyBindings {
    window: web_sys::Window,
    keydown: Closure<dyn Fn(web_sys::KeyboardEvent)>,
    keyup: Closure<dyn Fn(web_sys::KeyboardEvent)>,
    blur: Closure<dyn Fn()>,
}

impl KeyBindings {
    fn detach(&self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("keydown", self.keydown.as_ref().unchecked_ref());
        let _ = self
            .window
            .remove_event_listener_with_callback("keyup", self.keyup.as_ref().unchecked_ref());
        let _ = self
            .window
            .remove_event_listener_with_callback("blur", self.blur.as_ref().unchecked_ref());
    }
}

thread_local! {
    static KEY_BINDINGS: RefCell<Option<KeyBindings>> = const { RefCell::new(None) };
}

/// Apply a modifier key transition. Returns `false` for other keys.
fn track_modifier(held: &mut Modifiers, key: &str, down: bool) -> bool {
    match key {
        "Control" | "Meta" => held.ctrl = down,
        "Alt" => held.alt = down,
        "Shift" => held.shift = down,
        _ => return false,
    }
    true
}

/// Editor shortcut for a plain key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shortcut {
    Mode(PaintMode),
    ToggleEyedropper,
    Cancel,
}

fn shortcut_for(key: &str) -> Option<Shortcut> {
    match key {
        "b" => Some(Shortcut::Mode(PaintMode::Brush)),
        "f" => Some(Shortcut::Mode(PaintMode::Bucket)),
        "e" => Some(Shortcut::Mode(PaintMode::Erase)),
        "i" => Some(Shortcut::ToggleEyedropper),
        "Escape" => Some(Shortcut::Cancel),
        _ => None,
    }
}

/// Root application component: owns the map and tool state the canvas edits.
#[component]
pub fn App() -> impl IntoView {
    let saved = Settings::load();

    let map: RwSignal<HexMap> =
        RwSignal::new(HexMap::rectangular(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT));
    let tool: RwSignal<Tool> = RwSignal::new(Tool::Paint);
    let paint_mode: RwSignal<PaintMode> = RwSignal::new(PaintMode::Brush);
    let paint: RwSignal<PaintAttributes> = RwSignal::new(PaintAttributes {
        color: saved.paint_color.clone(),
        icon: None,
        icon_color: saved.icon_color.clone(),
    });
    let eyedropper: RwSignal<bool> = RwSignal::new(false);
    let drawing_path: RwSignal<Option<String>> = RwSignal::new(None);
    let selected: RwSignal<Option<Hex>> = RwSignal::new(None);
    let held: RwSignal<Modifiers> = RwSignal::new(Modifiers::NONE);
    let engine: RwSignal<EngineConfig> = RwSignal::new(saved.engine);
    let camera: RwSignal<Camera> = RwSignal::new(Camera::default());

    provide_context(MapData(map));
    provide_context(ActiveTool(tool));
    provide_context(ActivePaintMode(paint_mode));
    provide_context(ActivePaint(paint));
    provide_context(EyedropperArmed(eyedropper));
    provide_context(DrawingPath(drawing_path));
    provide_context(SelectedHex(selected));
    provide_context(HeldModifiers(held));
    provide_context(EngineSettings(engine));
    provide_context(CommittedCamera(camera));

    // Persist settings to localStorage on any change
    Effect::new(move || {
        let settings = Settings {
            engine: engine.get(),
            paint_color: paint.with(|p| p.color.clone()),
            icon_color: paint.with(|p| p.icon_color.clone()),
        };
        settings.save();
    });

    // Leaving the path tool stops drawing.
    Effect::new(move || {
        if tool.get() != Tool::Path && drawing_path.get_untracked().is_some() {
            drawing_path.set(None);
        }
    });

    // Window-level keyboard: shortcuts plus modifier tracking
    Effect::new(move || {
        let Some(window) = web_sys::window() else {
            return;
        };

        KEY_BINDINGS.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                old.detach();
            }
        });

        let keydown =
            Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(move |e: web_sys::KeyboardEvent| {
                let key = e.key();
                let mut next = held.get_untracked();
                if track_modifier(&mut next, &key, true) {
                    held.set(next);
                    return;
                }

                let target_tag = e
                    .target()
                    .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok())
                    .map(|el| el.tag_name())
                    .unwrap_or_default();
                // Don't intercept when typing in an input
                if target_tag == "INPUT" || target_tag == "SELECT" || target_tag == "TEXTAREA" {
                    return;
                }
                if e.ctrl_key() || e.meta_key() || e.alt_key() {
                    return;
                }

                match shortcut_for(&key) {
                    Some(Shortcut::Mode(mode)) => {
                        tool.set(Tool::Paint);
                        paint_mode.set(mode);
                    }
                    Some(Shortcut::ToggleEyedropper) => eyedropper.update(|v| *v = !*v),
                    Some(Shortcut::Cancel) => {
                        selected.set(None);
                        drawing_path.set(None);
                        eyedropper.set(false);
                    }
                    None => {}
                }
            });

        let keyup =
            Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(move |e: web_sys::KeyboardEvent| {
                let mut next = held.get_untracked();
                if track_modifier(&mut next, &e.key(), false) {
                    held.set(next);
                }
            });

        // Key-ups are lost while the window is unfocused.
        let blur = Closure::<dyn Fn()>::new(move || held.set(Modifiers::NONE));

        let bindings = KeyBindings {
            window: window.clone(),
            keydown,
            keyup,
            blur,
        };
        let attached = [
            ("keydown", bindings.keydown.as_ref()),
            ("keyup", bindings.keyup.as_ref()),
            ("blur", bindings.blur.as_ref()),
        ]
        .into_iter()
        .all(|(event, handler)| {
            window
                .add_event_listener_with_callback(event, handler.unchecked_ref())
                .is_ok()
        });
        if !attached {
            web_sys::console::warn_1(&"keyboard shortcuts unavailable".into());
            bindings.detach();
            return;
        }
        KEY_BINDINGS.with(|slot| {
            *slot.borrow_mut() = Some(bindings);
        });
    });

    view! {
        <div style="width: 100%; height: 100%; display: flex; flex-direction: column;">
            <Toolbar />
            <div style="flex: 1; min-height: 0; position: relative;">
                <HexGridCanvas />
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_keys_toggle_held_state() {
        let mut held = Modifiers::NONE;
        assert!(track_modifier(&mut held, "Shift", true));
        assert!(track_modifier(&mut held, "Meta", true));
        assert!(held.shift && held.ctrl && !held.alt);
        assert!(track_modifier(&mut held, "Shift", false));
        assert!(!held.shift);
        assert!(!track_modifier(&mut held, "b", true));
    }

    #[test]
    fn shortcuts_map_to_modes() {
        assert_eq!(shortcut_for("b"), Some(Shortcut::Mode(PaintMode::Brush)));
        assert_eq!(shortcut_for("f"), Some(Shortcut::Mode(PaintMode::Bucket)));
        assert_eq!(shortcut_for("e"), Some(Shortcut::Mode(PaintMode::Erase)));
        assert_eq!(shortcut_for("i"), Some(Shortcut::ToggleEyedropper));
        assert_eq!(shortcut_for("Escape"), Some(Shortcut::Cancel));
        assert_eq!(shortcut_for("B"), None);
    }
}
