// canvas.rs - Browser backends
//
// CanvasSurface    - Surface over a 2d context
// CanvasRasterizer - TextRasterizer over an offscreen canvas
// RafScheduler     - FrameScheduler over requestAnimationFrame

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use crate::driver::{FrameHandle, FrameScheduler};
use crate::error::{FieldError, Result};
use crate::layout::{Mask, TextLayout, TextRasterizer};
use crate::render::{Sprite, Surface};

pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// 2d context of a canvas, `None` when the browser refuses one.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

// ============================================================================
// Surface
// ============================================================================

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn draw(&mut self, s: &Sprite) {
        let size = s.size as f64;
        self.ctx.set_fill_style_str(&s.color.css());
        self.ctx.set_font(&format!("{}px {}", s.size, s.font));
        self.ctx.save();
        let drawn = self
            .ctx
            .translate(s.x as f64, s.y as f64)
            .and_then(|_| self.ctx.rotate(s.angle as f64))
            .and_then(|_| self.ctx.fill_text(s.glyph, -size / 2.0, size / 2.0));
        if let Err(err) = drawn {
            log::debug!("glyph draw skipped: {:?}", err);
        }
        self.ctx.restore();
    }
}

// ============================================================================
// Text raster
// ============================================================================

pub struct CanvasRasterizer {
    document: Option<Document>,
    // Offscreen canvas, created on first use
    scratch: Option<(HtmlCanvasElement, CanvasRenderingContext2d)>,
}

impl CanvasRasterizer {
    pub fn new() -> Self {
        Self {
            document: web_sys::window().and_then(|w| w.document()),
            scratch: None,
        }
    }

    fn scratch(&mut self) -> Option<&(HtmlCanvasElement, CanvasRenderingContext2d)> {
        if self.scratch.is_none() {
            let canvas = self
                .document
                .as_ref()?
                .create_element("canvas")
                .ok()?
                .dyn_into::<HtmlCanvasElement>()
                .ok()?;
            let ctx = context_2d(&canvas)?;
            self.scratch = Some((canvas, ctx));
        }
        self.scratch.as_ref()
    }
}

impl Default for CanvasRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRasterizer for CanvasRasterizer {
    fn rasterize(&mut self, layout: &TextLayout) -> Option<Mask> {
        if layout.width == 0 || layout.height == 0 { return None; }

        let (canvas, ctx) = self.scratch()?;
        // Resizing also clears the previous raster
        canvas.set_width(layout.width);
        canvas.set_height(layout.height);

        let (w, h) = (layout.width as f64, layout.height as f64);
        ctx.set_font(&layout.css_font());
        ctx.set_fill_style_str("white");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.fill_text(layout.text, w / 2.0, h / 2.0).ok()?;

        let data = match ctx.get_image_data(0.0, 0.0, w, h) {
            Ok(data) => data,
            Err(err) => {
                log::warn!("text raster readback failed: {:?}", err);
                return None;
            }
        };
        match Mask::new(layout.width, layout.height, data.data().0) {
            Ok(mask) => Some(mask),
            Err(err) => {
                log::warn!("{}", err);
                None
            }
        }
    }
}

// ============================================================================
// Scheduler
// ============================================================================

pub struct RafScheduler {
    window: Window,
    callback: FrameCallback,
}

impl RafScheduler {
    pub fn new(window: Window, callback: FrameCallback) -> Self {
        Self { window, callback }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle> {
        let callback = self.callback.borrow();
        let callback = callback
            .as_ref()
            .ok_or_else(|| FieldError::Scheduler("frame callback released".into()))?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map(FrameHandle)
            .map_err(|err| FieldError::Scheduler(format!("{:?}", err)))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0);
    }
}
