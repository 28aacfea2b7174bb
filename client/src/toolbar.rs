use hexmap_shared::config::{MAX_ZOOM, MIN_ZOOM};
use hexmap_shared::{BuiltinIcons, Color, HexMap, IconId, PaintMode, Tool};
use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::app::{
    ActivePaint, ActivePaintMode, ActiveTool, CommittedCamera, DEFAULT_GRID_HEIGHT,
    DEFAULT_GRID_RADIUS, DEFAULT_GRID_WIDTH, DrawingPath, EngineSettings, EyedropperArmed,
    MapData, SelectedHex,
};

const PATH_STROKE_WIDTH: f64 = 3.0;
const MIN_HEX_SIZE: f64 = 10.0;
const MAX_HEX_SIZE: f64 = 60.0;

const BAR_STYLE: &str = "display: flex; flex-wrap: wrap; align-items: center; gap: 10px; padding: 8px 12px; background: #12001a; border-bottom: 1px solid #4b0082; color: #e0d6f0; font-family: 'Inter', system-ui, sans-serif; font-size: 0.8rem;";
const CONTROL_STYLE: &str = "background: #1a0024; border: 1px solid #4b0082; border-radius: 4px; color: #e0d6f0; padding: 3px 6px; font-size: 0.75rem;";

fn event_value(e: &leptos::ev::Event) -> Option<String> {
    let target = e.target()?;
    if let Some(input) = target.dyn_ref::<web_sys::HtmlInputElement>() {
        return Some(input.value());
    }
    target
        .dyn_ref::<web_sys::HtmlSelectElement>()
        .map(|select| select.value())
}

fn parse_tool(value: &str) -> Option<Tool> {
    match value {
        "settings" => Some(Tool::Settings),
        "paint" => Some(Tool::Paint),
        "path" => Some(Tool::Path),
        "data" => Some(Tool::Data),
        _ => None,
    }
}

fn tool_value(tool: Tool) -> &'static str {
    match tool {
        Tool::Settings => "settings",
        Tool::Paint => "paint",
        Tool::Path => "path",
        Tool::Data => "data",
    }
}

fn zoom_percent(zoom: f64) -> String {
    format!("{:.0}%", zoom.clamp(MIN_ZOOM, MAX_ZOOM) * 100.0)
}

#[component]
pub fn Toolbar() -> impl IntoView {
    let MapData(map) = expect_context();
    let ActiveTool(tool) = expect_context();
    let ActivePaintMode(paint_mode) = expect_context();
    let ActivePaint(paint) = expect_context();
    let EyedropperArmed(eyedropper) = expect_context();
    let DrawingPath(drawing_path) = expect_context();
    let SelectedHex(selected) = expect_context();
    let EngineSettings(engine) = expect_context();
    let CommittedCamera(camera) = expect_context();

    let on_tool = move |e: leptos::ev::Event| {
        if let Some(next) = event_value(&e).as_deref().and_then(parse_tool) {
            tool.set(next);
        }
    };

    let on_color = move |e: leptos::ev::Event| {
        if let Some(value) = event_value(&e) {
            paint.update(|p| p.color = Color::new(value));
        }
    };

    let on_icon_color = move |e: leptos::ev::Event| {
        if let Some(value) = event_value(&e) {
            paint.update(|p| p.icon_color = Color::new(value));
        }
    };

    let on_icon = move |e: leptos::ev::Event| {
        let Some(value) = event_value(&e) else {
            return;
        };
        let icon = (!value.is_empty()).then(|| IconId::new(value));
        paint.update(|p| p.icon = icon);
    };

    let on_hex_size = move |e: leptos::ev::Event| {
        if let Some(size) = event_value(&e).and_then(|v| v.trim().parse::<f64>().ok()) {
            let size = size.clamp(MIN_HEX_SIZE, MAX_HEX_SIZE);
            engine.update(|cfg| cfg.hex_size = size);
        }
    };

    let new_path = move |_: leptos::ev::MouseEvent| {
        let id = uuid::Uuid::new_v4().to_string();
        let color = paint.with_untracked(|p| p.color.clone());
        map.update(|m| {
            m.start_path(id.clone(), color, PATH_STROKE_WIDTH);
        });
        tool.set(Tool::Path);
        drawing_path.set(Some(id));
    };

    let mode_button = move |mode: PaintMode, label: &'static str| {
        view! {
            <button
                style=CONTROL_STYLE
                style:border-color=move || if paint_mode.get() == mode { "#8a2be2" } else { "#4b0082" }
                on:click=move |_| {
                    tool.set(Tool::Paint);
                    paint_mode.set(mode);
                }
            >
                {label}
            </button>
        }
    };

    let icon_options = BuiltinIcons
        .names()
        .map(|name| {
            view! {
                <option
                    value=name
                    selected=move || paint.with(|p| p.icon.as_ref().map(IconId::as_str) == Some(name))
                >
                    {name}
                </option>
            }
        })
        .collect_view();

    view! {
        <div style=BAR_STYLE>
            <select style=CONTROL_STYLE on:change=on_tool prop:value=move || tool_value(tool.get())>
                <option value="settings">"Settings"</option>
                <option value="paint">"Paint"</option>
                <option value="path">"Path"</option>
                <option value="data">"Data"</option>
            </select>

            {mode_button(PaintMode::Brush, "Brush (b)")}
            {mode_button(PaintMode::Bucket, "Fill (f)")}
            {mode_button(PaintMode::Erase, "Erase (e)")}

            <label>
                "Color "
                <input
                    type="color"
                    prop:value=move || paint.with(|p| p.color.to_string())
                    on:input=on_color
                />
            </label>
            <label>
                "Icon "
                <select style=CONTROL_STYLE on:change=on_icon>
                    <option value="" selected=move || paint.with(|p| p.icon.is_none())>"None"</option>
                    {icon_options}
                </select>
            </label>
            <label>
                "Icon color "
                <input
                    type="color"
                    prop:value=move || paint.with(|p| p.icon_color.to_string())
                    on:input=on_icon_color
                />
            </label>

            <button
                style=CONTROL_STYLE
                style:border-color=move || if eyedropper.get() { "#8a2be2" } else { "#4b0082" }
                on:click=move |_| eyedropper.update(|v| *v = !*v)
            >
                "Eyedropper (i)"
            </button>

            <button style=CONTROL_STYLE on:click=new_path>"New path"</button>
            {move || {
                drawing_path
                    .get()
                    .map(|_| {
                        view! {
                            <button style=CONTROL_STYLE on:click=move |_| drawing_path.set(None)>
                                "Finish path"
                            </button>
                        }
                    })
            }}

            <label>
                "Hex size "
                <input
                    type="range"
                    min="10"
                    max="60"
                    step="1"
                    prop:value=move || engine.get().hex_size.to_string()
                    on:input=on_hex_size
                />
            </label>

            <button
                style=CONTROL_STYLE
                on:click=move |_| map.set(HexMap::radial(DEFAULT_GRID_RADIUS))
            >
                "Radial grid"
            </button>
            <button
                style=CONTROL_STYLE
                on:click=move |_| map.set(HexMap::rectangular(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT))
            >
                "Rectangular grid"
            </button>

            <span style="margin-left: auto; font-family: 'JetBrains Mono', monospace; color: #9a8fb0;">
                {move || match selected.get() {
                    Some(hex) => format!("hex {hex}"),
                    None => "no selection".to_string(),
                }}
                " · "
                {move || zoom_percent(camera.get().zoom)}
            </span>
        </div>
    }
}
