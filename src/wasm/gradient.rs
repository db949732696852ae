use web_sys::HtmlCanvasElement;

use super::{events, gl, render_loop};
use crate::config::GradientOptions;
use crate::error::Result;
use crate::shaders::{FULLSCREEN_VERTEX, GRADIENT_FRAGMENT};

pub fn start(canvas: HtmlCanvasElement, options: GradientOptions) -> Result<()> {
    let ctx = gl::context(&canvas)?;
    events::track_viewport(&canvas)?;

    let program = gl::Program::new(&ctx, FULLSCREEN_VERTEX, GRADIENT_FRAGMENT)?;
    let u_time = program.uniform("uTime")?;
    let u_color = program.uniform("uColor")?;
    let triangle = gl::FullscreenTriangle::new(&ctx)?;

    program.bind();
    let color = options.color;
    ctx.uniform3f(Some(&u_color), color.x, color.y, color.z);

    render_loop::run(move |now| {
        gl::bind_screen(&ctx);
        program.bind();
        ctx.uniform1f(Some(&u_time), (now * 0.001) as f32);
        triangle.draw(&ctx);
    })?;

    log::debug!("gradient demo running");
    Ok(())
}
