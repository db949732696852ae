#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod config;
pub mod demo;
pub mod error;
pub mod flow;
pub mod grid;
pub mod math;
pub mod pointer;
pub mod shaders;
pub mod viewport;

pub use config::DemoConfig;
pub use demo::Demo;
pub use error::{DemoError, Result};

// Browser-facing code only exists on wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    use crate::config::DemoConfig;
    use crate::demo::Demo;
    use crate::error::DemoError;

    mod complex;
    mod events;
    mod flowmap;
    mod gl;
    mod gradient;
    mod letter;
    mod render_loop;
    mod webgpu;

    #[cfg(test)]
    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    /// Id of the canvas every page renders into.
    const CANVAS_ID: &str = "c";

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let level = if cfg!(debug_assertions) {
            log::Level::Debug
        } else {
            log::Level::Info
        };
        console_log::init_with_level(level).ok();

        let canvas = find_canvas()?;
        let config = read_config(&canvas).inspect_err(|err| log::error!("{err}"))?;
        log::info!("starting demo `{}`", config.demo);

        mount(canvas, config).map_err(|err| {
            log::error!("demo setup failed: {err}");
            err.into()
        })
    }

    fn find_canvas() -> Result<web_sys::HtmlCanvasElement, DemoError> {
        let window = web_sys::window().ok_or(DemoError::Dom("no window".into()))?;
        let document = window
            .document()
            .ok_or(DemoError::Dom("no document".into()))?;
        let canvas = document
            .get_element_by_id(CANVAS_ID)
            .ok_or(DemoError::Dom(format!("canvas #{CANVAS_ID} not found")))?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .map_err(|_| DemoError::Dom(format!("#{CANVAS_ID} is not a canvas")))?;
        Ok(canvas)
    }

    fn read_config(canvas: &web_sys::HtmlCanvasElement) -> Result<DemoConfig, DemoError> {
        let hash = web_sys::window()
            .and_then(|w| w.location().hash().ok())
            .unwrap_or_default();
        DemoConfig::from_attributes(|key| canvas.get_attribute(&format!("data-{key}")), &hash)
    }

    fn mount(canvas: web_sys::HtmlCanvasElement, config: DemoConfig) -> Result<(), DemoError> {
        match config.demo {
            Demo::Gradient => gradient::start(canvas, config.gradient),
            Demo::ComplexNumbers => complex::start(canvas, config.complex),
            Demo::Letter => letter::start(canvas, config.flow),
            Demo::WebGpu => {
                // Adapter and device requests are async; failures are only logged.
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(err) = webgpu::start(canvas, config.grid).await {
                        log::error!("webgpu demo failed: {err}");
                    }
                });
                Ok(())
            }
        }
    }
}
