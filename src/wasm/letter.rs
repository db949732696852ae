use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as GL};

use super::flowmap::FlowMap;
use super::{events, gl, render_loop};
use crate::error::Result;
use crate::flow::FlowMapOptions;
use crate::shaders::{FLOW_DISPLAY_FRAGMENT, FULLSCREEN_VERTEX};

pub fn start(canvas: HtmlCanvasElement, options: FlowMapOptions) -> Result<()> {
    let ctx = gl::context(&canvas)?;
    let viewport = events::track_viewport(&canvas)?;
    let mouse = events::track_mouse(viewport.clone())?;

    let mut flow = FlowMap::new(&ctx, &options)?;

    let program = gl::Program::new(&ctx, FULLSCREEN_VERTEX, FLOW_DISPLAY_FRAGMENT)?;
    program.bind();
    ctx.uniform1i(Some(&program.uniform("tFlow")?), 0);
    let triangle = gl::FullscreenTriangle::new(&ctx)?;

    render_loop::run(move |_now| {
        let sample = mouse.borrow_mut().frame_input();
        let aspect = viewport.borrow().aspect();
        flow.update(sample, aspect);

        gl::bind_screen(&ctx);
        ctx.clear_color(0.5, 0.5, 0.5, 0.5);
        ctx.clear(GL::COLOR_BUFFER_BIT);

        program.bind();
        ctx.active_texture(GL::TEXTURE0);
        ctx.bind_texture(GL::TEXTURE_2D, Some(flow.texture()));
        triangle.draw(&ctx);
    })?;

    log::debug!("letter demo running");
    Ok(())
}
