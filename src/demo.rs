use std::fmt;
use std::str::FromStr;

use crate::error::DemoError;

/// The demos the site can mount on its canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Demo {
    /// Time-animated cosine gradient.
    Gradient,
    /// Domain coloring of two spinning poles.
    #[default]
    ComplexNumbers,
    /// Mouse flow map shown through a window.
    Letter,
    /// WebGPU cell grid.
    WebGpu,
}

impl Demo {
    pub const ALL: [Demo; 4] = [Demo::Gradient, Demo::ComplexNumbers, Demo::Letter, Demo::WebGpu];

    pub fn as_str(self) -> &'static str {
        match self {
            Demo::Gradient => "gradient",
            Demo::ComplexNumbers => "complex-numbers",
            Demo::Letter => "letter",
            Demo::WebGpu => "webgpu",
        }
    }

    /// Reads a demo name out of a location hash such as `#letter`.
    /// Empty or unknown hashes yield `None`.
    pub fn from_hash(hash: &str) -> Option<Demo> {
        hash.trim_start_matches('#').parse().ok()
    }
}

impl FromStr for Demo {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gradient" | "ogl" => Ok(Demo::Gradient),
            "complex-numbers" | "complex" => Ok(Demo::ComplexNumbers),
            "letter" | "flow" => Ok(Demo::Letter),
            "webgpu" | "cells" => Ok(Demo::WebGpu),
            _ => Err(DemoError::UnknownDemo(s.to_owned())),
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_parse_back() {
        for demo in Demo::ALL {
            assert_eq!(demo.as_str().parse::<Demo>().unwrap(), demo);
        }
    }

    #[test]
    fn aliases_and_case() {
        assert_eq!("OGL".parse::<Demo>().unwrap(), Demo::Gradient);
        assert_eq!(" flow ".parse::<Demo>().unwrap(), Demo::Letter);
        assert_eq!("cells".parse::<Demo>().unwrap(), Demo::WebGpu);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "teapot".parse::<Demo>().unwrap_err();
        assert!(matches!(err, DemoError::UnknownDemo(name) if name == "teapot"));
    }

    #[test]
    fn hash_lookup() {
        assert_eq!(Demo::from_hash("#webgpu"), Some(Demo::WebGpu));
        assert_eq!(Demo::from_hash(""), None);
        assert_eq!(Demo::from_hash("#nope"), None);
    }
}
