//! CPU evaluation of the complex-number shader math.
//!
//! Complex numbers are `Vec2(re, im)`, matching the GLSL helpers in
//! [`crate::shaders`].

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::config::Palette;

/// Seconds for the poles to turn half a revolution.
pub const HALF_TURN_SECONDS: f32 = 15.0;

pub fn cx_mul(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x * b.x - a.y * b.y, a.x * b.y + a.y * b.x)
}

pub fn cx_div(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.dot(b), a.y * b.x - a.x * b.y) / b.dot(b)
}

/// Principal logarithm: `(ln|a|, arg a)` with `arg` in `[-π, π]`. On the
/// negative real axis the sign of a zero imaginary part picks `π` or `-π`,
/// as with `atan2`.
pub fn cx_log(a: Vec2) -> Vec2 {
    Vec2::new(a.length().ln(), a.y.atan2(a.x))
}

/// Cosine palette `a + b * cos(2π (c t + d))`.
pub fn palette(t: f32, p: &Palette) -> Vec3 {
    let phase = (p.c * t + p.d) * TAU;
    p.a + p.b * Vec3::new(phase.x.cos(), phase.y.cos(), phase.z.cos())
}

/// Maps a fragment coordinate to the centered plane where the shortest
/// side of the canvas spans `[-0.5, 0.5]`.
pub fn domain_coords(frag: Vec2, resolution: Vec2) -> Vec2 {
    (frag - 0.5 * resolution) / resolution.x.min(resolution.y)
}

/// The two poles `(p, q)` at `time` seconds; `q = -p`.
pub fn spin_poles(time: f32, length: f32) -> (Vec2, Vec2) {
    let angle = time / HALF_TURN_SECONDS * PI;
    let p = Vec2::new(angle.sin(), angle.cos()) * length;
    (p, -p)
}

/// Color of one fragment of the domain coloring.
pub fn domain_color(frag: Vec2, resolution: Vec2, time: f32, length: f32, p: &Palette) -> Vec3 {
    let z = domain_coords(frag, resolution);
    let (p1, p2) = spin_poles(time, length);
    let w = cx_log(cx_div(z - p1, z - p2));
    palette(w.y, p)
}
