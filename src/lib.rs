// glyph-field - Calligraphy particle canvas for the portfolio hero
//
// Spinning glyphs drift around the canvas; while the pointer is over it
// they spring onto points sampled from the rendered target text.
//
// Native builds expose the simulation as a plain library. wasm32 builds add
// the browser bindings in web/.

pub mod config;
pub mod driver;
pub mod error;
pub mod layout;
pub mod render;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::FieldConfig;
pub use driver::{FrameHandle, FrameLoop, FrameScheduler, LoopState};
pub use error::{FieldError, Result};
pub use layout::{LayoutSampler, Mask, NoRaster, Point, TextLayout, TextRasterizer, sample_points};
pub use render::{Encoder, Hsla, Sprite, Surface};
pub use sim::{GlyphField, Mode, Particle, Pointer};
