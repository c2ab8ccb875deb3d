// render.rs - Paint particles onto a surface
//
// Surfaces:
//   Encoder      = packed f32 instances for host-side rendering
//   CanvasSurface (web/) = CanvasRenderingContext2d
//
// Encoder layout, STRIDE floats per glyph:
//   x, y, angle, size, glyph, hue, saturation, lightness, alpha

use crate::sim::Particle;

pub const STRIDE: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    /// CSS color string, e.g. `hsla(210, 10%, 55%, 0.3)`.
    pub fn css(&self) -> String {
        format!("hsla({}, {}%, {}%, {})", self.h, self.s, self.l, self.a)
    }
}

/// One glyph to paint, already resolved to its text.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite<'a> {
    pub glyph: &'a str,
    pub glyph_index: u16,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub size: f32,
    pub color: Hsla,
    pub font: &'a str,
}

pub trait Surface {
    fn clear(&mut self, width: f32, height: f32);

    /// Paint a glyph translated to (x, y) and rotated by `angle`,
    /// text origin at (-size/2, size/2) in the rotated frame.
    fn draw(&mut self, sprite: &Sprite);
}

/// Paint every particle in array order; later particles land on top.
pub fn draw_field<S: Surface + ?Sized>(
    particles: &[Particle],
    glyphs: &[String],
    font: &str,
    surface: &mut S,
) {
    for p in particles {
        let glyph = glyphs.get(p.glyph() as usize).map(String::as_str).unwrap_or("");
        surface.draw(&Sprite {
            glyph,
            glyph_index: p.glyph(),
            x: p.x,
            y: p.y,
            angle: p.angle,
            size: p.size(),
            color: p.color,
            font,
        });
    }
}

pub struct Encoder {
    out: Vec<f32>,
}

impl Encoder {
    pub fn new() -> Self {
        Self { out: Vec::new() }
    }

    pub fn ptr(&self) -> *const f32 {
        self.out.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Number of encoded glyphs
    pub fn count(&self) -> usize {
        self.out.len() / STRIDE
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.out
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for Encoder {
    fn clear(&mut self, _width: f32, _height: f32) {
        self.out.clear();
    }

    fn draw(&mut self, s: &Sprite) {
        self.out.extend_from_slice(&[
            s.x,
            s.y,
            s.angle,
            s.size,
            s.glyph_index as f32,
            s.color.h,
            s.color.s,
            s.color.l,
            s.color.a,
        ]);
    }
}
