// mask.rs - Text mask raster and point extraction
//
// A mask is a plain RGBA8 buffer; only the alpha channel matters.
// Points come out in row-major scan order.

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone)]
pub struct Mask {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Mask {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(FieldError::MaskSize {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self { width, height, rgba })
    }

    /// Fully transparent mask.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    /// Alpha at pixel, 0 outside the raster.
    #[inline]
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height { return 0; }
        self.rgba[(y as usize * self.width as usize + x as usize) * 4 + 3]
    }

    pub fn set_alpha(&mut self, x: u32, y: u32, a: u8) {
        if x >= self.width || y >= self.height { return; }
        self.rgba[(y as usize * self.width as usize + x as usize) * 4 + 3] = a;
    }
}

/// Scan the mask every `stride` pixels in both axes, keeping pixels whose
/// alpha is strictly above `threshold`.
pub fn sample_points(mask: &Mask, stride: u32, threshold: u8) -> Vec<Point> {
    let stride = stride.max(1) as usize;
    let mut points = Vec::new();

    for y in (0..mask.height).step_by(stride) {
        for x in (0..mask.width).step_by(stride) {
            if mask.alpha(x, y) > threshold {
                points.push(Point::new(x as f32, y as f32));
            }
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pixel_stride_one() {
        let mut mask = Mask::blank(32, 32);
        mask.set_alpha(10, 10, 255);
        assert_eq!(sample_points(&mask, 1, 128), vec![Point::new(10.0, 10.0)]);
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut mask = Mask::blank(4, 4);
        mask.set_alpha(1, 1, 128);
        mask.set_alpha(2, 2, 129);
        assert_eq!(sample_points(&mask, 1, 128), vec![Point::new(2.0, 2.0)]);
    }

    #[test]
    fn stride_skips_off_grid_pixels() {
        let mut mask = Mask::blank(20, 20);
        mask.set_alpha(7, 7, 255);
        mask.set_alpha(8, 7, 255);
        mask.set_alpha(14, 0, 255);
        assert_eq!(
            sample_points(&mask, 7, 128),
            vec![Point::new(14.0, 0.0), Point::new(7.0, 7.0)]
        );
    }

    #[test]
    fn empty_mask_yields_nothing() {
        assert!(sample_points(&Mask::blank(50, 50), 1, 0).is_empty());
        assert!(sample_points(&Mask::blank(0, 0), 7, 128).is_empty());
    }

    #[test]
    fn rejects_mismatched_buffer() {
        let err = Mask::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, FieldError::MaskSize { expected: 16, actual: 15, .. }));
    }

    #[test]
    fn out_of_range_alpha_reads_zero() {
        let mask = Mask::new(1, 1, vec![255; 4]).unwrap();
        assert_eq!(mask.alpha(0, 0), 255);
        assert_eq!(mask.alpha(1, 0), 0);
        assert_eq!(mask.alpha(0, 5), 0);
    }
}
