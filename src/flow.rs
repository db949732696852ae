//! Flow map state: the ping-pong pair, per-frame inputs and texture format
//! selection. GPU work lives in the wasm `flowmap` module.

use glam::{Vec2, Vec3};

use crate::pointer::PointerSample;

/// Velocity smoothing factor while the pointer is moving.
pub const MOVING_LERP: f32 = 0.5;
/// Velocity smoothing factor while it decays back to rest.
pub const RESTING_LERP: f32 = 0.1;

/// A read/write pair whose roles alternate on every [`swap`](Self::swap).
#[derive(Debug)]
pub struct PingPong<T> {
    read: T,
    write: T,
}

impl<T> PingPong<T> {
    pub fn new(read: T, write: T) -> Self {
        Self { read, write }
    }

    /// The most recently written half.
    pub fn read(&self) -> &T {
        &self.read
    }

    pub fn write(&self) -> &T {
        &self.write
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.read, &mut self.write);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TexturePrecision {
    #[default]
    Float,
    Half,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowMapOptions {
    /// Width and height of both render targets.
    pub texture_size: u32,
    /// Trail radius in uv units; the shader receives half of it.
    pub trail_size: f32,
    pub alpha: f32,
    /// Per-frame multiplier applied to the previous flow.
    pub dissipation: f32,
    pub precision: TexturePrecision,
}

impl Default for FlowMapOptions {
    fn default() -> Self {
        Self {
            texture_size: 128,
            trail_size: 0.125,
            alpha: 1.0,
            dissipation: 0.875,
            precision: TexturePrecision::Float,
        }
    }
}

impl FlowMapOptions {
    pub fn trail_uniform(&self) -> f32 {
        self.trail_size * 0.5
    }
}

/// Which float render-target extensions the context exposes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FloatCaps {
    /// `EXT_color_buffer_float`: RGBA16F and RGBA32F are renderable.
    pub color_buffer_float: bool,
    /// `EXT_color_buffer_half_float`: RGBA16F is renderable.
    pub color_buffer_half_float: bool,
    /// `OES_texture_float_linear`: RGBA32F can be linearly filtered.
    pub float_linear: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowFormat {
    Rgba32F,
    Rgba16F,
    /// Clamps to [0, 1], so negative velocities are lost.
    Rgba8,
}

impl FlowFormat {
    pub fn select(precision: TexturePrecision, caps: FloatCaps) -> FlowFormat {
        let half_renderable = caps.color_buffer_float || caps.color_buffer_half_float;
        match precision {
            TexturePrecision::Float if caps.color_buffer_float && caps.float_linear => {
                FlowFormat::Rgba32F
            }
            _ if half_renderable => FlowFormat::Rgba16F,
            _ => FlowFormat::Rgba8,
        }
    }

    pub fn is_signed(self) -> bool {
        !matches!(self, FlowFormat::Rgba8)
    }
}

/// Uniform values fed to the flow map program each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowInputs {
    pub aspect: f32,
    pub mouse: Vec2,
    pub velocity: Vec2,
}

impl Default for FlowInputs {
    fn default() -> Self {
        Self {
            aspect: 1.0,
            mouse: Vec2::ZERO,
            velocity: Vec2::ZERO,
        }
    }
}

impl FlowInputs {
    /// Folds one frame of pointer input in, easing the velocity toward the
    /// sampled one.
    pub fn advance(&mut self, sample: PointerSample, aspect: f32) {
        self.aspect = aspect;
        self.mouse = sample.position;
        let t = if sample.velocity.length() > 0.0 {
            MOVING_LERP
        } else {
            RESTING_LERP
        };
        self.velocity = self.velocity.lerp(sample.velocity, t);
    }
}

/// Color written under the cursor: velocity in rg (y flipped to uv space),
/// eased speed in b.
pub fn stamp(velocity: Vec2) -> Vec3 {
    let speed = 1.0 - (1.0 - velocity.length().min(1.0)).powi(3);
    Vec3::new(velocity.x, -velocity.y, speed)
}

/// How strongly the stamp replaces the previous flow at `uv`.
pub fn trail_weight(uv: Vec2, mouse: Vec2, aspect: f32, options: &FlowMapOptions) -> f32 {
    let mut cursor = uv - mouse;
    cursor.x *= aspect;
    (1.0 - smoothstep(0.0, options.trail_uniform(), cursor.length())) * options.alpha
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
