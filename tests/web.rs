#![cfg(target_arch = "wasm32")]

use shader_site::shaders::{
    COMPLEX_FRAGMENT, FLOW_DISPLAY_FRAGMENT, FLOW_MAP_FRAGMENT, FULLSCREEN_VERTEX,
    GRADIENT_FRAGMENT,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::WebGl2RenderingContext as GL;

wasm_bindgen_test_configure!(run_in_browser);

fn context() -> GL {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    canvas
        .get_context("webgl2")
        .unwrap()
        .expect("WebGL2 not available")
        .dyn_into()
        .unwrap()
}

fn shader(gl: &GL, kind: u32, source: &str) -> web_sys::WebGlShader {
    let shader = gl.create_shader(kind).unwrap();
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    let ok = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    assert!(ok, "{}", gl.get_shader_info_log(&shader).unwrap_or_default());
    shader
}

#[wasm_bindgen_test]
fn every_fragment_links_with_the_fullscreen_vertex() {
    let gl = context();
    let vs = shader(&gl, GL::VERTEX_SHADER, FULLSCREEN_VERTEX);
    for fragment in [
        GRADIENT_FRAGMENT,
        COMPLEX_FRAGMENT,
        FLOW_MAP_FRAGMENT,
        FLOW_DISPLAY_FRAGMENT,
    ] {
        let fs = shader(&gl, GL::FRAGMENT_SHADER, fragment);
        let program = gl.create_program().unwrap();
        gl.attach_shader(&program, &vs);
        gl.attach_shader(&program, &fs);
        gl.link_program(&program);
        let linked = gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        assert!(linked, "{}", gl.get_program_info_log(&program).unwrap_or_default());
    }
}

#[wasm_bindgen_test]
fn flow_uniforms_are_active() {
    let gl = context();
    let vs = shader(&gl, GL::VERTEX_SHADER, FULLSCREEN_VERTEX);
    let fs = shader(&gl, GL::FRAGMENT_SHADER, FLOW_MAP_FRAGMENT);
    let program = gl.create_program().unwrap();
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    for name in [
        "tMap", "uTrailSize", "uAlpha", "uDissipation", "uAspect", "uMouse", "uVelocity",
    ] {
        assert!(gl.get_uniform_location(&program, name).is_some(), "{name}");
    }
}
