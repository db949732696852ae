use glam::Vec3;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlUniformLocation};

use super::{events, gl, render_loop};
use crate::config::ComplexOptions;
use crate::error::Result;
use crate::shaders::{COMPLEX_FRAGMENT, FULLSCREEN_VERTEX};

fn set_vec3(ctx: &GL, location: &WebGlUniformLocation, v: Vec3) {
    ctx.uniform3f(Some(location), v.x, v.y, v.z);
}

pub fn start(canvas: HtmlCanvasElement, options: ComplexOptions) -> Result<()> {
    let ctx = gl::context(&canvas)?;
    let viewport = events::track_viewport(&canvas)?;

    let program = gl::Program::new(&ctx, FULLSCREEN_VERTEX, COMPLEX_FRAGMENT)?;
    let u_time = program.uniform("uTime")?;
    let u_res = program.uniform("uRes")?;
    let triangle = gl::FullscreenTriangle::new(&ctx)?;

    program.bind();
    ctx.uniform1f(Some(&program.uniform("uLength")?), options.length);
    let palette = options.palette;
    for (name, value) in [
        ("uPaletteA", palette.a),
        ("uPaletteB", palette.b),
        ("uPaletteC", palette.c),
        ("uPaletteD", palette.d),
    ] {
        set_vec3(&ctx, &program.uniform(name)?, value);
    }

    render_loop::run(move |now| {
        let res = viewport.borrow().resolution();

        gl::bind_screen(&ctx);
        program.bind();
        ctx.uniform1f(Some(&u_time), (now * 0.001) as f32);
        ctx.uniform2f(Some(&u_res), res.x, res.y);
        triangle.draw(&ctx);
    })?;

    log::debug!("complex-numbers demo running, poles at |z| = {}", options.length);
    Ok(())
}
