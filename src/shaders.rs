//! Shader sources for every demo.
//!
//! The GLSL programs target WebGL2 (`#version 300 es`) and share one
//! full-screen triangle vertex stage. The WGSL modules drive the WebGPU cell
//! grid.

use std::fmt;

/// Attribute location of the clip-space `position` input.
pub const POSITION_LOCATION: u32 = 0;
/// Attribute location of the `uv` input.
pub const UV_LOCATION: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        })
    }
}

// Snippets are macros so they can be spliced with `concat!`.

macro_rules! glsl_header {
    () => {
        "#version 300 es\nprecision highp float;\n"
    };
}

macro_rules! complex_maths {
    () => {
        r#"
#define PI 3.14159265359

vec2 cx_mul(vec2 a, vec2 b) {
    return vec2(a.x * b.x - a.y * b.y, a.x * b.y + a.y * b.x);
}

vec2 cx_div(vec2 a, vec2 b) {
    return vec2(dot(a, b), a.y * b.x - a.x * b.y) / dot(b, b);
}

vec2 cx_log(vec2 a) {
    return vec2(log(length(a)), atan(a.y, a.x));
}
"#
    };
}

// https://iquilezles.org/articles/palettes/
macro_rules! palette_generator {
    () => {
        r#"
vec3 palette(in float t, in vec3 a, in vec3 b, in vec3 c, in vec3 d) {
    return a + b * cos(2.0 * PI * (c * t + d));
}
"#
    };
}

/// Full-screen triangle; passes `vUv` through.
pub const FULLSCREEN_VERTEX: &str = r#"#version 300 es
layout(location = 0) in vec2 position;
layout(location = 1) in vec2 uv;

out vec2 vUv;

void main() {
    vUv = uv;
    gl_Position = vec4(position, 0.0, 1.0);
}
"#;

pub const GRADIENT_FRAGMENT: &str = concat!(
    glsl_header!(),
    r#"
uniform float uTime;
uniform vec3 uColor;

in vec2 vUv;
out vec4 fragColor;

void main() {
    fragColor = vec4(0.5 + 0.3 * cos(vUv.xyx + uTime) + uColor, 1.0);
}
"#
);

/// Domain coloring of `log((z - p) / (z - q))` with spinning poles.
pub const COMPLEX_FRAGMENT: &str = concat!(
    glsl_header!(),
    r#"
uniform float uTime;
uniform vec2 uRes;
uniform float uLength;
uniform vec3 uPaletteA;
uniform vec3 uPaletteB;
uniform vec3 uPaletteC;
uniform vec3 uPaletteD;

out vec4 fragColor;
"#,
    complex_maths!(),
    palette_generator!(),
    r#"
void main() {
    // centered, shortest side spans [-0.5, 0.5]
    vec2 z = (gl_FragCoord.xy - 0.5 * uRes.xy) / min(uRes.x, uRes.y);

    float angle = uTime / 15.0 * PI;
    vec2 p = vec2(sin(angle), cos(angle)) * uLength;
    vec2 q = -p;

    vec2 w = cx_log(cx_div(z - p, z - q));

    vec3 color = palette(w.y, uPaletteA, uPaletteB, uPaletteC, uPaletteD);
    fragColor = vec4(color, 1.0);
}
"#
);

/// Accumulates the mouse trail into the flow map. Rendered into the write
/// target of the ping-pong pair while sampling the read target.
pub const FLOW_MAP_FRAGMENT: &str = concat!(
    glsl_header!(),
    r#"
uniform sampler2D tMap;

uniform float uTrailSize;
uniform float uAlpha;
uniform float uDissipation;

uniform float uAspect;
uniform vec2 uMouse;
uniform vec2 uVelocity;

in vec2 vUv;
out vec4 fragColor;

void main() {
    vec4 color = texture(tMap, vUv) * uDissipation;

    vec2 cursor = vUv - uMouse;
    cursor.x *= uAspect;

    vec3 stamp = vec3(uVelocity * vec2(1.0, -1.0), 1.0 - pow(1.0 - min(1.0, length(uVelocity)), 3.0));
    float weight = (1.0 - smoothstep(0.0, uTrailSize, length(cursor))) * uAlpha;

    color.rgb = mix(color.rgb, stamp, vec3(weight));

    fragColor = color;
}
"#
);

/// Shows the flow amount inside a window of the screen, black elsewhere.
pub const FLOW_DISPLAY_FRAGMENT: &str = concat!(
    glsl_header!(),
    r#"
uniform sampler2D tFlow;

in vec2 vUv;
out vec4 fragColor;

const vec2 WINDOW_MIN = vec2(0.5);
const vec2 WINDOW_MAX = vec2(0.75);

void main() {
    // rg: velocity, b: velocity length
    float flowAmount = length(texture(tFlow, vUv).rgb);

    vec2 inside = step(WINDOW_MIN, vUv) * (1.0 - step(WINDOW_MAX, vUv));

    fragColor = vec4(vec3(flowAmount * inside.x * inside.y), 1.0);
}
"#
);

/// Instanced cell quad. Each instance is offset to its grid slot and scaled
/// by its state, so dead cells collapse to a degenerate quad.
pub const CELL_SHADER: &str = r#"
@group(0) @binding(0) var<uniform> grid: vec2f;
@group(0) @binding(1) var<storage> cellState: array<u32>;

@vertex
fn vertexMain(
    @location(0) pos: vec2f,
    @builtin(instance_index) instance: u32,
) -> @builtin(position) vec4f {
    let i = f32(instance);
    let cell = vec2f(i % grid.x, floor(i / grid.x));
    let state = f32(cellState[instance]);

    let cellOffset = cell / grid * 2;
    let gridPos = (pos * state + 1) / grid - 1 + cellOffset;

    return vec4f(gridPos, 0, 1);
}

@fragment
fn fragmentMain() -> @location(0) vec4f {
    return vec4f(1, 0, 0, 1);
}
"#;

/// One Game of Life generation over the wrapping grid.
pub const CELL_SIMULATION: &str = r#"
@group(0) @binding(0) var<uniform> grid: vec2f;
@group(0) @binding(1) var<storage> cellStateIn: array<u32>;
@group(0) @binding(2) var<storage, read_write> cellStateOut: array<u32>;

fn cellIndex(cell: vec2u) -> u32 {
    let size = vec2u(grid);
    return (cell.y % size.y) * size.x + (cell.x % size.x);
}

fn cellActive(x: u32, y: u32) -> u32 {
    return cellStateIn[cellIndex(vec2u(x, y))];
}

@compute @workgroup_size(8, 8)
fn computeMain(@builtin(global_invocation_id) cell: vec3u) {
    let size = vec2u(grid);
    if (cell.x >= size.x || cell.y >= size.y) {
        return;
    }

    // +size - 1 instead of -1 keeps the modulo from seeing an underflow
    let left = cell.x + size.x - 1;
    let down = cell.y + size.y - 1;
    let right = cell.x + 1;
    let up = cell.y + 1;

    let neighbors = cellActive(right, up) + cellActive(right, cell.y) + cellActive(right, down)
        + cellActive(cell.x, down) + cellActive(left, down) + cellActive(left, cell.y)
        + cellActive(left, up) + cellActive(cell.x, up);

    let i = cellIndex(cell.xy);
    switch neighbors {
        case 2u: {
            cellStateOut[i] = cellStateIn[i];
        }
        case 3u: {
            cellStateOut[i] = 1u;
        }
        default: {
            cellStateOut[i] = 0u;
        }
    }
}
"#;
