use thiserror::Error;

use crate::shaders::ShaderStage;

pub type Result<T, E = DemoError> = std::result::Result<T, E>;

/// Everything that can abort a demo during setup.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("WebGPU not supported on this browser.")]
    WebGpuUnsupported,
    #[error("No appropriate GPUAdapter found.")]
    NoAdapter,
    #[error("No appropriate GPUDevice found: {0}")]
    NoDevice(String),
    #[error("failed to acquire a {0} context for the canvas")]
    Context(&'static str),
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },
    #[error("shader program failed to link: {0}")]
    ProgramLink(String),
    #[error("uniform `{0}` is not active in the program")]
    MissingUniform(&'static str),
    #[error("unknown demo `{0}`")]
    UnknownDemo(String),
    #[error("invalid value `{value}` for `data-{key}`: {reason}")]
    InvalidConfig {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("{0}")]
    Dom(String),
}

impl DemoError {
    pub(crate) fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key,
            value: value.to_owned(),
            reason: reason.into(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<DemoError> for wasm_bindgen::JsValue {
    fn from(err: DemoError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for DemoError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        match value.as_string() {
            Some(message) => Self::Dom(message),
            None => Self::Dom(format!("{value:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_messages_match_the_page_copy() {
        assert_eq!(
            DemoError::WebGpuUnsupported.to_string(),
            "WebGPU not supported on this browser."
        );
        assert_eq!(DemoError::NoAdapter.to_string(), "No appropriate GPUAdapter found.");
    }

    #[test]
    fn invalid_config_names_the_attribute() {
        let err = DemoError::invalid("alpha", "2", "must be within [0, 1]");
        assert_eq!(
            err.to_string(),
            "invalid value `2` for `data-alpha`: must be within [0, 1]"
        );
    }
}
