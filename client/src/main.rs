mod app;
mod canvas;
mod render_loop;
mod settings;
mod surface;
mod theme;
mod toolbar;

use leptos::mount::mount_to;
use std::any::Any;
use std::cell::RefCell;
use wasm_bindgen::JsCast;

thread_local! {
    static APP_MOUNT_HANDLE: RefCell<Option<Box<dyn Any>>> = RefCell::new(None);
}

/// Engine events at or above this level reach the browser console.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn log_level(debug_build: bool) -> tracing::Level {
    if debug_build {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    }
}

#[cfg(target_arch = "wasm32")]
fn init_logging() {
    use tracing_subscriber::layer::SubscriberExt;

    let config = tracing_wasm::WASMLayerConfigBuilder::new()
        .set_max_level(log_level(cfg!(debug_assertions)))
        .build();
    let subscriber = tracing_subscriber::registry().with(tracing_wasm::WASMLayer::new(config));
    // Already installed when main() is re-entered.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {}

fn main() {
    console_error_panic_hook::set_once();
    init_logging();
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    let mount_target = document
        .get_element_by_id("app")
        .and_then(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        .or_else(|| document.body());
    let Some(target) = mount_target else {
        return;
    };

    APP_MOUNT_HANDLE.with(move |slot| {
        // If main() is re-entered (e.g. dev/hot-reload runtime quirks), drop the old mount
        // so stale effects/signals can't keep mutating app state.
        let _old = slot.borrow_mut().take();
        let handle = mount_to(target, app::App);
        *slot.borrow_mut() = Some(Box::new(handle));
    });
}
