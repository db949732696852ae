use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::window;

use crate::error::{DemoError, Result};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Calls `frame` on every animation frame with the frame timestamp in
/// milliseconds, for the rest of the page session.
pub fn run(mut frame: impl FnMut(f64) + 'static) -> Result<()> {
    // `f` holds the animation-frame closure so it can re-request itself.
    // The `Option` lets the closure exist before it refers to itself.
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        frame(now);

        if let Err(err) = request(&f) {
            log::error!("render loop stopped: {err}");
        }
    }) as Box<dyn FnMut(f64)>));

    request(&g)
}

fn request(callback: &FrameCallback) -> Result<()> {
    let window = window().ok_or(DemoError::Dom("no window".into()))?;
    let borrowed = callback.borrow();
    let closure = borrowed
        .as_ref()
        .ok_or(DemoError::Dom("frame callback dropped".into()))?;
    window.request_animation_frame(closure.as_ref().unchecked_ref())?;
    Ok(())
}
