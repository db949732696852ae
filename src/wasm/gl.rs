//! Thin WebGL2 helpers shared by the GLSL demos.

use js_sys::Float32Array;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlFramebuffer, WebGlProgram,
    WebGlShader, WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::error::{DemoError, Result};
use crate::flow::{FloatCaps, FlowFormat};
use crate::shaders::{ShaderStage, POSITION_LOCATION, UV_LOCATION};

pub fn context(canvas: &HtmlCanvasElement) -> Result<GL> {
    canvas
        .get_context("webgl2")?
        .ok_or(DemoError::Context("WebGL2"))?
        .dyn_into()
        .map_err(|_| DemoError::Context("WebGL2"))
}

fn compile(gl: &GL, stage: ShaderStage, source: &str) -> Result<WebGlShader> {
    let kind = match stage {
        ShaderStage::Vertex => GL::VERTEX_SHADER,
        ShaderStage::Fragment => GL::FRAGMENT_SHADER,
    };
    let shader = gl
        .create_shader(kind)
        .ok_or(DemoError::Dom(format!("unable to create {stage} shader")))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if compiled {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(DemoError::ShaderCompile { stage, log })
    }
}

/// A linked program and the context it belongs to.
pub struct Program {
    gl: GL,
    program: WebGlProgram,
}

impl Program {
    pub fn new(gl: &GL, vertex: &str, fragment: &str) -> Result<Self> {
        let vs = compile(gl, ShaderStage::Vertex, vertex)?;
        let fs = compile(gl, ShaderStage::Fragment, fragment)?;

        let program = gl
            .create_program()
            .ok_or(DemoError::Dom("unable to create program".into()))?;
        gl.attach_shader(&program, &vs);
        gl.attach_shader(&program, &fs);
        gl.link_program(&program);
        gl.delete_shader(Some(&vs));
        gl.delete_shader(Some(&fs));

        let linked = gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if !linked {
            let log = gl.get_program_info_log(&program).unwrap_or_default();
            gl.delete_program(Some(&program));
            return Err(DemoError::ProgramLink(log));
        }

        Ok(Self {
            gl: gl.clone(),
            program,
        })
    }

    pub fn uniform(&self, name: &'static str) -> Result<WebGlUniformLocation> {
        self.gl
            .get_uniform_location(&self.program, name)
            .ok_or(DemoError::MissingUniform(name))
    }

    pub fn bind(&self) {
        self.gl.use_program(Some(&self.program));
    }
}

/// Full-screen triangle: covers clip space with a single primitive, uv
/// running 0..1 over the visible part.
pub struct FullscreenTriangle {
    vao: WebGlVertexArrayObject,
    // kept alive with the VAO
    _buffers: [WebGlBuffer; 2],
}

#[rustfmt::skip]
const TRIANGLE_POSITIONS: [f32; 6] = [-1.0, -1.0, 3.0, -1.0, -1.0, 3.0];
#[rustfmt::skip]
const TRIANGLE_UVS: [f32; 6] = [0.0, 0.0, 2.0, 0.0, 0.0, 2.0];

impl FullscreenTriangle {
    pub fn new(gl: &GL) -> Result<Self> {
        let vao = gl
            .create_vertex_array()
            .ok_or(DemoError::Dom("unable to create vertex array".into()))?;
        gl.bind_vertex_array(Some(&vao));

        let positions = attribute(gl, POSITION_LOCATION, &TRIANGLE_POSITIONS)?;
        let uvs = attribute(gl, UV_LOCATION, &TRIANGLE_UVS)?;

        gl.bind_vertex_array(None);
        Ok(Self {
            vao,
            _buffers: [positions, uvs],
        })
    }

    pub fn draw(&self, gl: &GL) {
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(GL::TRIANGLES, 0, 3);
        gl.bind_vertex_array(None);
    }
}

fn attribute(gl: &GL, location: u32, data: &[f32]) -> Result<WebGlBuffer> {
    let buffer = gl
        .create_buffer()
        .ok_or(DemoError::Dom("unable to create buffer".into()))?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    gl.buffer_data_with_array_buffer_view(
        GL::ARRAY_BUFFER,
        &Float32Array::from(data),
        GL::STATIC_DRAW,
    );
    gl.enable_vertex_attrib_array(location);
    gl.vertex_attrib_pointer_with_i32(location, 2, GL::FLOAT, false, 0, 0);
    Ok(buffer)
}

/// Enables the float render-target extensions the context offers.
pub fn float_caps(gl: &GL) -> FloatCaps {
    let enable = |name: &str| matches!(gl.get_extension(name), Ok(Some(_)));
    FloatCaps {
        color_buffer_float: enable("EXT_color_buffer_float"),
        color_buffer_half_float: enable("EXT_color_buffer_half_float"),
        float_linear: enable("OES_texture_float_linear"),
    }
}

fn internal_format(format: FlowFormat) -> u32 {
    match format {
        FlowFormat::Rgba32F => GL::RGBA32F,
        FlowFormat::Rgba16F => GL::RGBA16F,
        FlowFormat::Rgba8 => GL::RGBA8,
    }
}

/// Square color texture with a framebuffer rendering into it.
pub struct RenderTarget {
    pub texture: WebGlTexture,
    pub framebuffer: WebGlFramebuffer,
    pub size: u32,
}

impl RenderTarget {
    pub fn new(gl: &GL, size: u32, format: FlowFormat) -> Result<Self> {
        let texture = gl
            .create_texture()
            .ok_or(DemoError::Dom("unable to create texture".into()))?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        gl.tex_storage_2d(GL::TEXTURE_2D, 1, internal_format(format), size as i32, size as i32);
        for (param, value) in [
            (GL::TEXTURE_MIN_FILTER, GL::LINEAR),
            (GL::TEXTURE_MAG_FILTER, GL::LINEAR),
            (GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE),
            (GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE),
        ] {
            gl.tex_parameteri(GL::TEXTURE_2D, param, value as i32);
        }
        gl.bind_texture(GL::TEXTURE_2D, None);

        let framebuffer = gl
            .create_framebuffer()
            .ok_or(DemoError::Dom("unable to create framebuffer".into()))?;
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&framebuffer));
        gl.framebuffer_texture_2d(
            GL::FRAMEBUFFER,
            GL::COLOR_ATTACHMENT0,
            GL::TEXTURE_2D,
            Some(&texture),
            0,
        );
        let status = gl.check_framebuffer_status(GL::FRAMEBUFFER);
        if status == GL::FRAMEBUFFER_COMPLETE {
            gl.clear_color(0.0, 0.0, 0.0, 0.0);
            gl.clear(GL::COLOR_BUFFER_BIT);
        }
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);

        if status != GL::FRAMEBUFFER_COMPLETE {
            return Err(DemoError::Dom(format!(
                "{format:?} framebuffer incomplete (0x{status:x})"
            )));
        }
        Ok(Self {
            texture,
            framebuffer,
            size,
        })
    }

    /// Directs subsequent draws into this target.
    pub fn bind(&self, gl: &GL) {
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.framebuffer));
        gl.viewport(0, 0, self.size as i32, self.size as i32);
    }
}

/// Directs subsequent draws at the canvas.
pub fn bind_screen(gl: &GL) {
    gl.bind_framebuffer(GL::FRAMEBUFFER, None);
    gl.viewport(0, 0, gl.drawing_buffer_width(), gl.drawing_buffer_height());
}
