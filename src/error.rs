// error.rs - Failure modes of the glyph field
//
// Every failure here is local. The canvas is decoration, so callers log and
// degrade instead of surfacing errors to the page.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("mask buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    MaskSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("no 2d rendering context available")]
    NoContext,

    #[error("frame scheduling failed: {0}")]
    Scheduler(String),

    #[error("dom error: {0}")]
    Dom(String),
}

pub type Result<T> = std::result::Result<T, FieldError>;

#[cfg(target_arch = "wasm32")]
impl From<FieldError> for wasm_bindgen::JsValue {
    fn from(err: FieldError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
