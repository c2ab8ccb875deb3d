// layout/ - Text layout sampling
//
// Rasterizes the target text through a backend and caches the sampled
// attraction points until the canvas size changes.

mod mask;

pub use mask::*;

/// Everything a backend needs to draw the target text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout<'a> {
    pub text: &'a str,
    pub width: u32,
    pub height: u32,
    pub font_px: f32,
    /// CSS font family list, without size or weight.
    pub font: &'a str,
}

impl TextLayout<'_> {
    /// CSS font shorthand: bold, sized, family.
    pub fn css_font(&self) -> String {
        format!("700 {}px {}", self.font_px, self.font)
    }
}

/// Renders text centred (both axes) into an offscreen RGBA mask.
/// `None` means the backend has no raster support.
pub trait TextRasterizer {
    fn rasterize(&mut self, layout: &TextLayout) -> Option<Mask>;
}

impl<R: TextRasterizer + ?Sized> TextRasterizer for Box<R> {
    fn rasterize(&mut self, layout: &TextLayout) -> Option<Mask> {
        (**self).rasterize(layout)
    }
}

/// Backend-less rasterizer. Sampling always yields zero points.
pub struct NoRaster;

impl TextRasterizer for NoRaster {
    fn rasterize(&mut self, _layout: &TextLayout) -> Option<Mask> {
        None
    }
}

/// Lazy, cached sampler
pub struct LayoutSampler<R> {
    raster: R,
    stride: u32,
    threshold: u8,
    cache: Option<Vec<Point>>,
    passes: usize,
}

impl<R: TextRasterizer> LayoutSampler<R> {
    pub fn new(raster: R, stride: u32, threshold: u8) -> Self {
        Self {
            raster,
            stride,
            threshold,
            cache: None,
            passes: 0,
        }
    }

    /// Attraction points for the layout, rasterizing only on a cold cache.
    pub fn points(&mut self, layout: &TextLayout) -> &[Point] {
        if self.cache.is_none() {
            self.passes += 1;
            let points = match self.raster.rasterize(layout) {
                Some(mask) => sample_points(&mask, self.stride, self.threshold),
                None => Vec::new(),
            };
            if points.is_empty() {
                log::warn!("text layout for {:?} produced no points", layout.text);
            } else {
                log::debug!(
                    "sampled {} points at {}x{} ({}px)",
                    points.len(),
                    layout.width,
                    layout.height,
                    layout.font_px
                );
            }
            self.cache = Some(points);
        }
        self.cache.as_deref().unwrap_or(&[])
    }

    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Number of raster passes performed so far.
    pub fn passes(&self) -> usize {
        self.passes
    }
}
