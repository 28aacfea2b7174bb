use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hexmap_shared::render::{
    CacheInput, FrameInput, RasterTarget, RebuildOutcome, RenderCache, SkipReason,
};
use hexmap_shared::{
    BuiltinIcons, EditorEvent, GestureContext, HexMap, HexMapEditor, InputEvent, Modifiers, Point,
    PointerButton, Theme, Tool,
};
use leptos::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, PointerEvent, TouchEvent, WheelEvent};

use crate::app::{
    ActivePaint, ActivePaintMode, ActiveTool, CommittedCamera, DrawingPath, EngineSettings,
    EyedropperArmed, HeldModifiers, MapData, SelectedHex,
};
use crate::render_loop::RenderScheduler;
use crate::surface::CanvasSurface;
use crate::theme::read_css_theme;

/// Backing-store size for a canvas of `css_w` x `css_h` CSS pixels.
/// `None` while the canvas has no area, e.g. when hidden.
fn device_size(css_w: f64, css_h: f64, pixel_ratio: f64) -> Option<(u32, u32)> {
    let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
        pixel_ratio
    } else {
        1.0
    };
    let w = (css_w * ratio).round().max(0.0) as u32;
    let h = (css_h * ratio).round().max(0.0) as u32;
    (w > 0 && h > 0).then_some((w, h))
}

/// Touch input arrives through the touch handlers instead.
fn is_mouse_like(pointer_type: &str) -> bool {
    pointer_type != "touch"
}

/// Combine an event's own modifier flags with keys tracked at the window.
/// The platform command key counts as ctrl.
fn merge_modifiers(ctrl: bool, meta: bool, alt: bool, shift: bool, held: Modifiers) -> Modifiers {
    Modifiers {
        ctrl: ctrl || meta || held.ctrl,
        alt: alt || held.alt,
        shift: shift || held.shift,
    }
}

fn mouse_modifiers(e: &MouseEvent, held: Modifiers) -> Modifiers {
    merge_modifiers(e.ctrl_key(), e.meta_key(), e.alt_key(), e.shift_key(), held)
}

/// Client coordinates relative to the canvas' top-left corner.
fn canvas_point(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> Point {
    let rect = canvas.get_bounding_client_rect();
    Point::new(client_x - rect.left(), client_y - rect.top())
}

fn touch_points(canvas: &HtmlCanvasElement, list: &web_sys::TouchList) -> Vec<Point> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| canvas_point(canvas, t.client_x() as f64, t.client_y() as f64))
        .collect()
}

/// The interactive hex map. Reads owner state from context and writes
/// paint results, selection and path points back to it.
#[component]
pub fn HexGridCanvas() -> impl IntoView {
    let MapData(map) = expect_context();
    let ActiveTool(tool) = expect_context();
    let ActivePaintMode(paint_mode) = expect_context();
    let ActivePaint(paint) = expect_context();
    let EyedropperArmed(eyedropper) = expect_context();
    let DrawingPath(drawing_path) = expect_context();
    let SelectedHex(selected) = expect_context();
    let HeldModifiers(held) = expect_context();
    let EngineSettings(engine) = expect_context();
    let CommittedCamera(committed_camera) = expect_context();

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

    let editor = Rc::new(RefCell::new(HexMapEditor::new(
        map.get_untracked(),
        engine.get_untracked(),
    )));
    let cache: Rc<RefCell<RenderCache<CanvasSurface>>> = Rc::new(RefCell::new(RenderCache::new()));
    let screen: Rc<RefCell<Option<CanvasSurface>>> = Rc::new(RefCell::new(None));
    let theme: Rc<RefCell<Theme>> = Rc::new(RefCell::new(read_css_theme()));
    // Frame the grid once the canvas first has a size.
    let fitted = Rc::new(Cell::new(false));

    let scheduler = Rc::new(RenderScheduler::new({
        let editor = editor.clone();
        let fitted = fitted.clone();
        move || {
            let Some(canvas) = canvas_ref.get_untracked() else {
                return false;
            };
            let canvas: &HtmlCanvasElement = &canvas;
            let Some(parent) = canvas.parent_element() else {
                return false;
            };
            let css_w = parent.client_width() as f64;
            let css_h = parent.client_height() as f64;
            let pixel_ratio = web_sys::window()
                .map(|w| w.device_pixel_ratio())
                .unwrap_or(1.0);
            // Nothing to draw while hidden; the resize listener asks again.
            let Some((w, h)) = device_size(css_w, css_h, pixel_ratio) else {
                return true;
            };

            let mut screen_slot = screen.borrow_mut();
            if screen_slot.is_none() {
                *screen_slot = CanvasSurface::attach(canvas.clone());
            }
            let Some(screen) = screen_slot.as_mut() else {
                web_sys::console::warn_1(&"canvas 2d context unavailable".into());
                return false;
            };
            if !screen.resize(w, h) {
                return false;
            }

            let mut editor = editor.borrow_mut();
            if !fitted.get() {
                fitted.set(true);
                if let Some(camera) = editor.fit_to_view(css_w, css_h) {
                    committed_camera.set(camera);
                }
            }

            let config = *editor.config();
            let theme = theme.borrow();
            let mut cache = cache.borrow_mut();
            let input = CacheInput {
                map: editor.map(),
                generation: editor.generation(),
                hex_size: config.hex_size,
                theme: &theme,
                icons: &BuiltinIcons,
                resolution: config.cache_resolution,
            };
            if let RebuildOutcome::Skipped(SkipReason::SurfaceUnavailable) =
                cache.ensure(&input, CanvasSurface::offscreen)
            {
                web_sys::console::warn_1(&"map cache buffers unavailable; retrying".into());
                return false;
            }

            let active = drawing_path.get_untracked();
            let frame = FrameInput {
                camera: editor.camera(),
                pixel_ratio,
                theme: &theme,
                hex_size: config.hex_size,
                lod_threshold: config.lod_threshold,
                paths: &editor.map().paths,
                active_path: active.as_deref(),
                selected: selected.get_untracked(),
            };
            cache.composite(screen, &frame).is_some()
        }
    }));

    // Owner map changes flow back into the editor.
    Effect::new({
        let editor = editor.clone();
        let fitted = fitted.clone();
        let scheduler = scheduler.clone();
        move || {
            map.with(|next: &HexMap| {
                let mut editor = editor.borrow_mut();
                let current = editor.map();
                let same_layout = current.shape == next.shape
                    && current.width == next.width
                    && current.height == next.height
                    && current.tiles.len() == next.tiles.len();
                if same_layout {
                    editor.set_tiles(next.tiles.clone());
                    editor.set_paths(next.paths.clone());
                } else {
                    editor.set_map(next.clone());
                    fitted.set(false);
                }
            });
            scheduler.request_frame();
        }
    });

    Effect::new({
        let editor = editor.clone();
        let scheduler = scheduler.clone();
        move || {
            editor.borrow_mut().set_config(engine.get());
            scheduler.request_frame();
        }
    });

    Effect::new({
        let scheduler = scheduler.clone();
        move || {
            selected.track();
            drawing_path.track();
            scheduler.request_frame();
        }
    });

    let resize_handle = leptos::leptos_dom::helpers::window_event_listener(leptos::ev::resize, {
        let scheduler = scheduler.clone();
        move |_| scheduler.request_frame()
    });
    on_cleanup(move || resize_handle.remove());

    let gesture_context = move |modifiers: Modifiers| GestureContext {
        tool: tool.get_untracked(),
        paint_mode: paint_mode.get_untracked(),
        paint: paint.get_untracked(),
        modifiers,
        eyedropper_armed: eyedropper.get_untracked(),
        path_drawing: drawing_path.get_untracked(),
    };

    // Runs one input through the editor and applies its results to the owner.
    let feed = {
        let editor = editor.clone();
        let scheduler = scheduler.clone();
        move |modifiers: Modifiers, event: InputEvent| {
            let ctx = gesture_context(modifiers);
            let events = editor.borrow_mut().handle(&ctx, event);
            for event in events {
                match event {
                    EditorEvent::GridUpdated(tiles) => {
                        if map.with_untracked(|m| m.tiles != tiles) {
                            map.update(|m| m.tiles = tiles);
                        }
                        scheduler.request_frame();
                    }
                    EditorEvent::HexSelected(hex) => selected.set(hex),
                    EditorEvent::PathPointAdded { path_id, point } => {
                        map.update(|m| {
                            m.append_path_point(&path_id, point);
                        });
                        scheduler.request_frame();
                    }
                    EditorEvent::Sampled { data, .. } => {
                        paint.update(|p| p.absorb(&data));
                        eyedropper.set(false);
                    }
                    EditorEvent::CameraMoved => scheduler.request_frame(),
                    EditorEvent::CameraCommitted(camera) => committed_camera.set(camera),
                }
            }
        }
    };

    let on_pointer_down = {
        let feed = feed.clone();
        move |e: PointerEvent| {
            if !is_mouse_like(&e.pointer_type()) {
                return;
            }
            // Suppresses middle-click autoscroll and text selection.
            e.prevent_default();
            let Some(canvas) = canvas_ref.get_untracked() else {
                return;
            };
            let at = canvas_point(&canvas, e.client_x() as f64, e.client_y() as f64);
            let modifiers = mouse_modifiers(&e, held.get_untracked());
            feed(
                modifiers,
                InputEvent::PointerDown {
                    button: PointerButton::from_dom(e.button()),
                    at,
                },
            );
        }
    };

    let on_pointer_move = {
        let feed = feed.clone();
        move |e: PointerEvent| {
            if !is_mouse_like(&e.pointer_type()) {
                return;
            }
            let Some(canvas) = canvas_ref.get_untracked() else {
                return;
            };
            let at = canvas_point(&canvas, e.client_x() as f64, e.client_y() as f64);
            feed(
                mouse_modifiers(&e, held.get_untracked()),
                InputEvent::PointerMove { at },
            );
        }
    };

    let on_pointer_up = {
        let feed = feed.clone();
        move |e: PointerEvent| {
            if !is_mouse_like(&e.pointer_type()) {
                return;
            }
            feed(
                mouse_modifiers(&e, held.get_untracked()),
                InputEvent::PointerUp {
                    button: PointerButton::from_dom(e.button()),
                },
            );
        }
    };

    let on_pointer_leave = {
        let feed = feed.clone();
        move |e: PointerEvent| {
            if !is_mouse_like(&e.pointer_type()) {
                return;
            }
            feed(held.get_untracked(), InputEvent::PointerLeave);
        }
    };

    let on_wheel = {
        let feed = feed.clone();
        move |e: WheelEvent| {
            e.prevent_default();
            let Some(canvas) = canvas_ref.get_untracked() else {
                return;
            };
            let at = canvas_point(&canvas, e.client_x() as f64, e.client_y() as f64);
            feed(
                mouse_modifiers(&e, held.get_untracked()),
                InputEvent::Wheel {
                    at,
                    delta_y: e.delta_y(),
                },
            );
        }
    };

    let on_touch_start = {
        let feed = feed.clone();
        move |e: TouchEvent| {
            e.prevent_default();
            let Some(canvas) = canvas_ref.get_untracked() else {
                return;
            };
            let touches = touch_points(&canvas, &e.touches());
            feed(Modifiers::NONE, InputEvent::TouchStart { touches });
        }
    };

    let on_touch_move = {
        let feed = feed.clone();
        move |e: TouchEvent| {
            e.prevent_default();
            let Some(canvas) = canvas_ref.get_untracked() else {
                return;
            };
            let touches = touch_points(&canvas, &e.touches());
            feed(Modifiers::NONE, InputEvent::TouchMove { touches });
        }
    };

    let on_touch_end = {
        let feed = feed.clone();
        move |e: TouchEvent| {
            let Some(canvas) = canvas_ref.get_untracked() else {
                return;
            };
            let remaining = touch_points(&canvas, &e.touches());
            feed(Modifiers::NONE, InputEvent::TouchEnd { remaining });
        }
    };

    let cursor = move || match tool.get() {
        Tool::Paint | Tool::Path => "crosshair",
        Tool::Settings | Tool::Data => "grab",
    };

    view! {
        <div style="position: relative; width: 100%; height: 100%; overflow: hidden;">
            <canvas
                node_ref=canvas_ref
                style="position: absolute; inset: 0; width: 100%; height: 100%; touch-action: none;"
                style:cursor=cursor
                on:pointerdown=on_pointer_down
                on:pointermove=on_pointer_move
                on:pointerup=on_pointer_up
                on:pointerleave=on_pointer_leave
                on:wheel=on_wheel
                on:touchstart=on_touch_start
                on:touchmove=on_touch_move
                on:touchend=on_touch_end.clone()
                on:touchcancel=on_touch_end
                on:contextmenu=|e: MouseEvent| e.prevent_default()
            />
        </div>
    }
}
