use web_sys::{WebGl2RenderingContext as GL, WebGlTexture, WebGlUniformLocation};

use super::gl::{self, FullscreenTriangle, Program, RenderTarget};
use crate::error::Result;
use crate::flow::{FlowFormat, FlowInputs, FlowMapOptions, PingPong};
use crate::pointer::PointerSample;
use crate::shaders::{FLOW_MAP_FRAGMENT, FULLSCREEN_VERTEX};

/// Texture unit the previous flow is sampled from.
const MAP_UNIT: u32 = 0;

struct FrameUniforms {
    aspect: WebGlUniformLocation,
    mouse: WebGlUniformLocation,
    velocity: WebGlUniformLocation,
}

/// Mouse trail accumulated over time in a pair of render targets.
pub struct FlowMap {
    gl: GL,
    program: Program,
    uniforms: FrameUniforms,
    triangle: FullscreenTriangle,
    targets: PingPong<RenderTarget>,
    inputs: FlowInputs,
}

impl FlowMap {
    pub fn new(ctx: &GL, options: &FlowMapOptions) -> Result<Self> {
        let format = FlowFormat::select(options.precision, gl::float_caps(ctx));
        if format.is_signed() {
            log::debug!("flow map targets: {format:?} {0}x{0}", options.texture_size);
        } else {
            log::warn!("no float render targets, flow map falls back to {format:?}");
        }

        let targets = PingPong::new(
            RenderTarget::new(ctx, options.texture_size, format)?,
            RenderTarget::new(ctx, options.texture_size, format)?,
        );

        let program = Program::new(ctx, FULLSCREEN_VERTEX, FLOW_MAP_FRAGMENT)?;
        program.bind();
        ctx.uniform1i(Some(&program.uniform("tMap")?), MAP_UNIT as i32);
        ctx.uniform1f(Some(&program.uniform("uTrailSize")?), options.trail_uniform());
        ctx.uniform1f(Some(&program.uniform("uAlpha")?), options.alpha);
        ctx.uniform1f(Some(&program.uniform("uDissipation")?), options.dissipation);

        let uniforms = FrameUniforms {
            aspect: program.uniform("uAspect")?,
            mouse: program.uniform("uMouse")?,
            velocity: program.uniform("uVelocity")?,
        };

        Ok(Self {
            gl: ctx.clone(),
            program,
            uniforms,
            triangle: FullscreenTriangle::new(ctx)?,
            targets,
            inputs: FlowInputs::default(),
        })
    }

    /// The most recent flow: rg velocity, b speed.
    pub fn texture(&self) -> &WebGlTexture {
        &self.targets.read().texture
    }

    /// Renders one frame of trail into the write target, then swaps so the
    /// result becomes readable.
    pub fn update(&mut self, sample: PointerSample, aspect: f32) {
        self.inputs.advance(sample, aspect);
        let FlowInputs {
            aspect,
            mouse,
            velocity,
        } = self.inputs;

        let ctx = &self.gl;
        self.targets.write().bind(ctx);
        ctx.disable(GL::DEPTH_TEST);
        ctx.disable(GL::BLEND);

        self.program.bind();
        ctx.uniform1f(Some(&self.uniforms.aspect), aspect);
        ctx.uniform2f(Some(&self.uniforms.mouse), mouse.x, mouse.y);
        ctx.uniform2f(Some(&self.uniforms.velocity), velocity.x, velocity.y);

        ctx.active_texture(GL::TEXTURE0 + MAP_UNIT);
        ctx.bind_texture(GL::TEXTURE_2D, Some(&self.targets.read().texture));
        self.triangle.draw(ctx);
        ctx.bind_texture(GL::TEXTURE_2D, None);

        self.targets.swap();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use js_sys::Float32Array;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    use super::*;

    // odd, so a texel center sits exactly on uv (0.5, 0.5)
    const SIZE: u32 = 17;
    const CENTER: i32 = 8;

    fn context() -> GL {
        let canvas = web_sys::window()
            .unwrap()
            .document()
            .unwrap()
            .create_element("canvas")
            .unwrap()
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .unwrap();
        gl::context(&canvas).unwrap()
    }

    /// RGBA of the center texel of `target`.
    fn center_texel(ctx: &GL, target: &RenderTarget, format: FlowFormat) -> [f32; 4] {
        ctx.bind_framebuffer(GL::FRAMEBUFFER, Some(&target.framebuffer));
        let mut texel = [0.0; 4];
        if format.is_signed() {
            let pixels = Float32Array::new_with_length(4);
            ctx.read_pixels_with_opt_array_buffer_view(
                CENTER, CENTER, 1, 1, GL::RGBA, GL::FLOAT, Some(&*pixels),
            )
            .unwrap();
            pixels.copy_to(&mut texel);
        } else {
            let mut bytes = [0u8; 4];
            ctx.read_pixels_with_opt_u8_array(
                CENTER, CENTER, 1, 1, GL::RGBA, GL::UNSIGNED_BYTE, Some(&mut bytes),
            )
            .unwrap();
            texel = bytes.map(|b| f32::from(b) / 255.0);
        }
        ctx.bind_framebuffer(GL::FRAMEBUFFER, None);
        texel
    }

    #[wasm_bindgen_test]
    fn stamp_lands_in_read_target_then_dissipates() {
        let ctx = context();
        let options = FlowMapOptions {
            texture_size: SIZE,
            ..FlowMapOptions::default()
        };
        let format = FlowFormat::select(options.precision, gl::float_caps(&ctx));
        // Rgba8 quantizes to 1/255
        let eps = if format.is_signed() { 1e-3 } else { 2.0 / 255.0 };
        let mut flow = FlowMap::new(&ctx, &options).unwrap();

        flow.update(
            PointerSample {
                position: Vec2::splat(0.5),
                velocity: Vec2::new(1.0, 0.0),
            },
            1.0,
        );
        // velocity eased to 0.5, full weight at the cursor
        let speed = crate::flow::stamp(Vec2::new(0.5, 0.0)).z;
        let stamped = center_texel(&ctx, flow.targets.read(), format);
        assert!((stamped[2] - speed).abs() < eps, "{stamped:?}");
        assert!((stamped[0] - 0.5).abs() < eps, "{stamped:?}");
        let untouched = center_texel(&ctx, flow.targets.write(), format);
        assert_eq!(untouched, [0.0; 4]);

        flow.update(PointerSample::idle(), 1.0);
        let decayed = center_texel(&ctx, flow.targets.read(), format);
        assert!(
            (decayed[2] - stamped[2] * options.dissipation).abs() < eps,
            "{decayed:?} after {stamped:?}"
        );
    }
}
