//! Per-page configuration read from the canvas' `data-*` attributes.
//!
//! Lookup goes through a closure so the parsing runs the same on the host
//! as against a live `Element`.

use std::str::FromStr;

use glam::Vec3;

use crate::demo::Demo;
use crate::error::{DemoError, Result};
use crate::flow::{FlowMapOptions, TexturePrecision};
use crate::grid::GridOptions;

/// Coefficients of the cosine palette.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    pub d: Vec3,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            a: Vec3::splat(0.5),
            b: Vec3::splat(0.5),
            c: Vec3::ONE,
            d: Vec3::new(0.0, 0.33, 0.67),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComplexOptions {
    pub palette: Palette,
    /// Distance of each pole from the origin.
    pub length: f32,
}

impl Default for ComplexOptions {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            length: 0.3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientOptions {
    pub color: Vec3,
}

impl Default for GradientOptions {
    fn default() -> Self {
        Self {
            color: Vec3::new(0.3, 0.2, 0.5),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DemoConfig {
    pub demo: Demo,
    pub gradient: GradientOptions,
    pub complex: ComplexOptions,
    pub flow: FlowMapOptions,
    pub grid: GridOptions,
}

impl DemoConfig {
    /// Builds the config from attribute lookups. `get("texture-size")`
    /// should return the value of `data-texture-size`, if present. `hash`
    /// is the page's location hash and picks the demo when `data-demo` is
    /// absent.
    pub fn from_attributes<F>(get: F, hash: &str) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let demo = match get("demo") {
            Some(name) => name.parse()?,
            None => Demo::from_hash(hash).unwrap_or_default(),
        };
        let mut config = DemoConfig {
            demo,
            ..Default::default()
        };

        if let Some(v) = get("color") {
            config.gradient.color = parse_vec3("color", &v)?;
        }

        if let Some(v) = get("length") {
            config.complex.length = positive("length", &v, parse("length", &v)?)?;
        }
        let palette = &mut config.complex.palette;
        for (key, slot) in [
            ("palette-a", &mut palette.a),
            ("palette-b", &mut palette.b),
            ("palette-c", &mut palette.c),
            ("palette-d", &mut palette.d),
        ] {
            if let Some(v) = get(key) {
                *slot = parse_vec3(key, &v)?;
            }
        }

        let flow = &mut config.flow;
        if let Some(v) = get("texture-size") {
            let size: u32 = parse("texture-size", &v)?;
            if !(1..=4096).contains(&size) {
                return Err(DemoError::invalid("texture-size", &v, "must be within [1, 4096]"));
            }
            flow.texture_size = size;
        }
        if let Some(v) = get("trail-size") {
            flow.trail_size = positive("trail-size", &v, parse("trail-size", &v)?)?;
        }
        if let Some(v) = get("alpha") {
            flow.alpha = unit("alpha", &v, parse("alpha", &v)?)?;
        }
        if let Some(v) = get("dissipation") {
            flow.dissipation = unit("dissipation", &v, parse("dissipation", &v)?)?;
        }
        if let Some(v) = get("precision") {
            flow.precision = v.parse()?;
        }

        let grid = &mut config.grid;
        if let Some(v) = get("grid-size") {
            let size: u32 = parse("grid-size", &v)?;
            if !(1..=512).contains(&size) {
                return Err(DemoError::invalid("grid-size", &v, "must be within [1, 512]"));
            }
            grid.size = size;
        }
        if let Some(v) = get("step-ms") {
            grid.step_ms = positive("step-ms", &v, parse("step-ms", &v)?)?;
        }
        if let Some(v) = get("density") {
            grid.density = unit("density", &v, parse("density", &v)?)?;
        }

        Ok(config)
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DemoError::invalid(key, value, "not a number"))
}

fn positive<T>(key: &'static str, raw: &str, value: T) -> Result<T>
where
    T: Into<f64> + Copy,
{
    let v: f64 = value.into();
    if v.is_finite() && v > 0.0 {
        Ok(value)
    } else {
        Err(DemoError::invalid(key, raw, "must be positive"))
    }
}

fn unit<T>(key: &'static str, raw: &str, value: T) -> Result<T>
where
    T: Into<f64> + Copy,
{
    let v: f64 = value.into();
    if v.is_finite() && (0.0..=1.0).contains(&v) {
        Ok(value)
    } else {
        Err(DemoError::invalid(key, raw, "must be within [0, 1]"))
    }
}

fn parse_vec3(key: &'static str, value: &str) -> Result<Vec3> {
    let parts = value
        .split(',')
        .map(|part| parse::<f32>(key, part))
        .collect::<Result<Vec<_>>>()?;
    match parts.as_slice() {
        [x, y, z] if [x, y, z].iter().all(|c| c.is_finite()) => Ok(Vec3::new(*x, *y, *z)),
        [_, _, _] => Err(DemoError::invalid(key, value, "components must be finite")),
        _ => Err(DemoError::invalid(key, value, "expected three comma-separated numbers")),
    }
}

impl FromStr for TexturePrecision {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "float" => Ok(TexturePrecision::Float),
            "half" => Ok(TexturePrecision::Half),
            _ => Err(DemoError::invalid("precision", s, "expected `float` or `half`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_attributes_give_defaults() {
        let config = DemoConfig::from_attributes(lookup(&[]), "").unwrap();
        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.demo, Demo::ComplexNumbers);
        assert_eq!(config.flow.texture_size, 128);
    }

    #[test]
    fn attribute_wins_over_hash() {
        let config = DemoConfig::from_attributes(lookup(&[("demo", "letter")]), "#webgpu").unwrap();
        assert_eq!(config.demo, Demo::Letter);
        let config = DemoConfig::from_attributes(lookup(&[]), "#webgpu").unwrap();
        assert_eq!(config.demo, Demo::WebGpu);
    }

    #[test]
    fn parses_every_knob() {
        let config = DemoConfig::from_attributes(
            lookup(&[
                ("color", "0.1, 0.2,0.3"),
                ("length", "0.4"),
                ("palette-d", "0,0.1,0.2"),
                ("texture-size", "256"),
                ("trail-size", "0.2"),
                ("alpha", "0.5"),
                ("dissipation", "0.9"),
                ("precision", "half"),
                ("grid-size", "64"),
                ("step-ms", "100"),
                ("density", "0.3"),
            ]),
            "",
        )
        .unwrap();
        assert_eq!(config.gradient.color, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(config.complex.length, 0.4);
        assert_eq!(config.complex.palette.d, Vec3::new(0.0, 0.1, 0.2));
        assert_eq!(config.complex.palette.a, Palette::default().a);
        assert_eq!(config.flow.texture_size, 256);
        assert_eq!(config.flow.trail_size, 0.2);
        assert_eq!(config.flow.alpha, 0.5);
        assert_eq!(config.flow.dissipation, 0.9);
        assert_eq!(config.flow.precision, TexturePrecision::Half);
        assert_eq!(config.grid.size, 64);
        assert_eq!(config.grid.step_ms, 100.0);
        assert_eq!(config.grid.density, 0.3);
    }

    #[test]
    fn rejects_out_of_range_values() {
        for (key, value) in [
            ("texture-size", "0"),
            ("texture-size", "8192"),
            ("alpha", "1.5"),
            ("dissipation", "-0.1"),
            ("trail-size", "0"),
            ("grid-size", "1000"),
            ("step-ms", "-5"),
            ("step-ms", "inf"),
            ("length", "inf"),
            ("trail-size", "infinity"),
            ("length", "NaN"),
            ("alpha", "nan"),
            ("palette-a", "0,inf,0"),
            ("length", "abc"),
            ("color", "1,2"),
            ("precision", "double"),
        ] {
            let err = DemoConfig::from_attributes(lookup(&[(key, value)]), "").unwrap_err();
            assert!(
                matches!(err, DemoError::InvalidConfig { key: k, .. } if k == key),
                "{key}={value} gave {err}"
            );
        }
    }

    #[test]
    fn unknown_demo_attribute_is_an_error() {
        let err = DemoConfig::from_attributes(lookup(&[("demo", "nope")]), "").unwrap_err();
        assert!(matches!(err, DemoError::UnknownDemo(_)));
    }
}
