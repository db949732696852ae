//! Window listeners feeding the per-frame state.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, HtmlCanvasElement, MouseEvent, Window};

use crate::error::{DemoError, Result};
use crate::pointer::MouseTracker;
use crate::viewport::Viewport;

fn browser_window() -> Result<Window> {
    window().ok_or(DemoError::Dom("no window".into()))
}

pub fn current_viewport() -> Result<Viewport> {
    let window = browser_window()?;
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok(Viewport::new(width, height, window.device_pixel_ratio()))
}

/// Sizes the drawing buffer in device pixels and the element in CSS pixels.
pub fn fit_canvas(canvas: &HtmlCanvasElement, viewport: &Viewport) -> Result<()> {
    let (width, height) = viewport.drawing_buffer();
    canvas.set_width(width);
    canvas.set_height(height);
    let style = canvas.style();
    style.set_property("width", &format!("{}px", viewport.css_width))?;
    style.set_property("height", &format!("{}px", viewport.css_height))?;
    Ok(())
}

/// Fits the canvas now and on every `resize`. The returned cell always
/// holds the latest viewport.
pub fn track_viewport(canvas: &HtmlCanvasElement) -> Result<Rc<RefCell<Viewport>>> {
    let viewport = Rc::new(RefCell::new(current_viewport()?));
    fit_canvas(canvas, &viewport.borrow())?;

    let on_resize = {
        let canvas = canvas.clone();
        let viewport = viewport.clone();
        Closure::wrap(Box::new(move || {
            let resized = current_viewport().and_then(|vp| {
                fit_canvas(&canvas, &vp)?;
                Ok(vp)
            });
            match resized {
                Ok(vp) => *viewport.borrow_mut() = vp,
                Err(err) => log::warn!("resize ignored: {err}"),
            }
        }) as Box<dyn FnMut()>)
    };
    browser_window()?
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();

    Ok(viewport)
}

/// Feeds `mousemove` events into a [`MouseTracker`].
pub fn track_mouse(viewport: Rc<RefCell<Viewport>>) -> Result<Rc<RefCell<MouseTracker>>> {
    let window = browser_window()?;
    let performance = window
        .performance()
        .ok_or(DemoError::Dom("no performance clock".into()))?;
    let tracker = Rc::new(RefCell::new(MouseTracker::new()));

    let on_move = {
        let tracker = tracker.clone();
        Closure::wrap(Box::new(move |event: MouseEvent| {
            let page = Vec2::new(event.page_x() as f32, event.page_y() as f32);
            let size = viewport.borrow().css_size();
            tracker.borrow_mut().on_move(page, size, performance.now());
        }) as Box<dyn FnMut(MouseEvent)>)
    };
    window.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();

    Ok(tracker)
}
