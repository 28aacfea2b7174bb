use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

/// Coalesces redraw requests into one `requestAnimationFrame` callback.
///
/// Any number of `request_frame()` calls between two frames result in a
/// single call of the draw function. If the draw function returns `false`
/// (nothing could be drawn yet, e.g. the canvas has no size), it is retried
/// on the following frame.
pub struct RenderScheduler {
    inner: Rc<Inner>,
}

struct Inner {
    window: Option<web_sys::Window>,
    pending: Cell<bool>,
    raf_id: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Inner {
    fn schedule(&self) {
        if self.pending.replace(true) {
            return;
        }
        let requested = self.window.as_ref().and_then(|window| {
            let callback = self.callback.borrow();
            let cb = callback.as_ref()?;
            window
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .ok()
        });
        match requested {
            Some(id) => self.raf_id.set(Some(id)),
            None => self.pending.set(false),
        }
    }
}

impl RenderScheduler {
    pub fn new(draw: impl Fn() -> bool + 'static) -> Self {
        let inner = Rc::new(Inner {
            window: web_sys::window(),
            pending: Cell::new(false),
            raf_id: Cell::new(None),
            callback: RefCell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let cb = Closure::<dyn FnMut()>::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.pending.set(false);
            inner.raf_id.set(None);
            if !draw() {
                inner.schedule();
            }
        });
        *inner.callback.borrow_mut() = Some(cb);

        Self { inner }
    }

    pub fn request_frame(&self) {
        self.inner.schedule();
    }
}

impl Drop for RenderScheduler {
    fn drop(&mut self) {
        if let Some(raf_id) = self.inner.raf_id.take()
            && let Some(window) = self.inner.window.as_ref()
        {
            let _ = window.cancel_animation_frame(raf_id);
        }
        self.inner.pending.set(false);
        self.inner.callback.borrow_mut().take();
    }
}
