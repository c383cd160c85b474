use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, HtmlCanvasElement, WebGl2RenderingContext as GL};

use crate::backdrop::Backdrop;

/// A running animation-frame loop. Dropping it stops the loop.
pub struct RenderLoop {
    frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    pending: Rc<Cell<Option<i32>>>,
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        if let (Some(window), Some(id)) = (window(), self.pending.take()) {
            if let Err(err) = window.cancel_animation_frame(id) {
                log::warn!("cancel_animation_frame failed: {err:?}");
            }
        }
        // Releases the closure and with it the reference cycle through `frame`.
        self.frame.borrow_mut().take();
    }
}

/// Keep the canvas sized to the window.
pub fn fit_to_window(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let window = window().ok_or("no window")?;
    let resize = {
        let canvas = canvas.clone();
        move || {
            let Some(window) = web_sys::window() else { return };
            let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            canvas.set_width(w as u32);
            canvas.set_height(h as u32);
        }
    };
    resize();

    let resize_closure = Closure::wrap(Box::new(resize) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    // Lives as long as the page.
    resize_closure.forget();
    Ok(())
}

/// Start drawing `backdrop` on `canvas` every animation frame.
pub fn start(canvas: &HtmlCanvasElement, backdrop: Backdrop) -> Result<RenderLoop, JsValue> {
    let gl: GL = canvas
        .get_context("webgl2")?
        .ok_or("WebGL2 not supported")?
        .dyn_into()?;
    let window = window().ok_or("no window")?;

    // `frame` holds the animation-frame closure so that it can schedule
    // itself again. Storing it inside an `Option` allows us to create the
    // `Closure` first and then reach it from within itself.
    let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let pending = Rc::new(Cell::new(None));

    let next = Rc::clone(&frame);
    let next_pending = Rc::clone(&pending);
    let mut t: f32 = 0.0;
    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        t += 0.01;
        let [r, g, b] = backdrop.colour_at(t);
        gl.clear_color(r, g, b, 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT);

        next_pending.set(None);
        let Some(window) = web_sys::window() else { return };
        if let Some(callback) = next.borrow().as_ref() {
            match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                Ok(id) => next_pending.set(Some(id)),
                Err(err) => log::error!("request_animation_frame failed: {err:?}"),
            }
        }
    }) as Box<dyn FnMut()>));

    let id = {
        let callback = frame.borrow();
        let callback = callback.as_ref().ok_or("frame closure missing")?;
        window.request_animation_frame(callback.as_ref().unchecked_ref())?
    };
    pending.set(Some(id));

    Ok(RenderLoop { frame, pending })
}
