// particle.rs - A single spinning glyph
//
// Two modes, recomputed every frame:
//   Idle       - drift + pointer repulsion, wraps at the canvas edges
//   Targeting  - spring pull toward an attraction point, no wrapping

use std::f32::consts::{PI, TAU};

use super::{Pointer, rand};
use crate::config::FieldConfig;
use crate::layout::Point;
use crate::render::Hsla;

/// Tone every targeting particle takes on.
pub const HIGHLIGHT: Hsla = Hsla::new(210.0, 20.0, 90.0, 0.95);

const BASE_HUE: f32 = 210.0;
const BASE_SATURATION: f32 = 10.0;
const SIZE_MIN: f32 = 20.0;
const SIZE_SPREAD: f32 = 25.0;
const SPIN_SPREAD: f32 = 0.005;
const START_SPEED: f32 = 0.2;
const SPRING_JITTER: f32 = 0.15;
const FRICTION_JITTER: f32 = 0.03;
const MAX_FRICTION: f32 = 0.99;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Idle,
    Targeting(Point),
}

/// Constants shared by every particle in a frame.
#[derive(Debug, Clone, Copy)]
pub struct Physics {
    pub angle_ease: f32,
    pub drift: f32,
    pub drift_rate: f32,
    pub repel_radius: f32,
    pub repel_strength: f32,
    pub wrap_margin: f32,
}

impl From<&FieldConfig> for Physics {
    fn from(c: &FieldConfig) -> Self {
        Self {
            angle_ease: c.angle_ease,
            drift: c.drift,
            drift_rate: c.drift_rate,
            repel_radius: c.repel_radius,
            repel_strength: c.repel_strength,
            wrap_margin: c.wrap_margin,
        }
    }
}

/// Per-frame inputs.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    pub width: f32,
    pub height: f32,
    /// Elapsed time in seconds
    pub time: f32,
    pub pointer: Pointer,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub angle: f32,
    pub color: Hsla,
    pub mode: Mode,

    glyph: u16,
    base: Hsla,
    size: f32,
    spin: f32,
    spring: f32,
    friction: f32,
    phase: f32,
}

impl Particle {
    pub fn new(x: f32, y: f32, glyph_count: usize, config: &FieldConfig, rng: &mut u32) -> Self {
        let glyph = ((rand(rng) * glyph_count as f32) as usize).min(glyph_count.saturating_sub(1));
        let base = Hsla::new(
            BASE_HUE,
            BASE_SATURATION,
            40.0 + rand(rng) * 40.0,
            0.1 + rand(rng) * 0.4,
        );
        let jitter = |rng: &mut u32, j: f32| 1.0 - j + rand(rng) * j * 2.0;

        Self {
            x,
            y,
            vx: (rand(rng) - 0.5) * START_SPEED,
            vy: (rand(rng) - 0.5) * START_SPEED,
            angle: rand(rng) * TAU,
            color: base,
            mode: Mode::Idle,
            glyph: glyph as u16,
            base,
            size: SIZE_MIN + rand(rng) * SIZE_SPREAD,
            spin: (rand(rng) - 0.5) * SPIN_SPREAD,
            spring: config.spring * jitter(rng, SPRING_JITTER),
            friction: (config.friction * jitter(rng, FRICTION_JITTER)).min(MAX_FRICTION),
            phase: rand(rng) * TAU,
        }
    }

    pub fn glyph(&self) -> u16 { self.glyph }
    pub fn base_color(&self) -> Hsla { self.base }
    pub fn size(&self) -> f32 { self.size }
    pub fn friction(&self) -> f32 { self.friction }

    pub fn is_targeting(&self) -> bool {
        matches!(self.mode, Mode::Targeting(_))
    }

    /// Advance one frame.
    pub fn update(&mut self, frame: &FrameInput, physics: &Physics) {
        match self.mode {
            Mode::Targeting(target) => {
                self.vx += (target.x - self.x) * self.spring;
                self.vy += (target.y - self.y) * self.spring;
                self.color = HIGHLIGHT;
                let a = wrap_angle(self.angle);
                self.angle = a - a * physics.angle_ease;
            }
            Mode::Idle => {
                let t = frame.time * physics.drift_rate + self.phase;
                self.vx += t.sin() * physics.drift;
                self.vy += t.cos() * physics.drift;
                if frame.pointer.active {
                    self.repel(frame.pointer, physics);
                }
                self.color = self.base;
                self.angle = (self.angle + self.spin).rem_euclid(TAU);
            }
        }

        self.vx *= self.friction;
        self.vy *= self.friction;
        self.x += self.vx;
        self.y += self.vy;

        if !(self.x.is_finite() && self.y.is_finite() && self.vx.is_finite() && self.vy.is_finite()) {
            self.x = frame.width * 0.5;
            self.y = frame.height * 0.5;
            self.vx = 0.0;
            self.vy = 0.0;
        }

        if self.mode == Mode::Idle {
            self.wrap(frame.width, frame.height, physics.wrap_margin);
        }
    }

    // Linear falloff push away from the pointer
    fn repel(&mut self, pointer: Pointer, physics: &Physics) {
        let dx = self.x - pointer.x;
        let dy = self.y - pointer.y;
        let d = (dx * dx + dy * dy).sqrt();
        if d <= f32::EPSILON || d >= physics.repel_radius { return; }

        let force = (1.0 - d / physics.repel_radius) * physics.repel_strength;
        self.vx += dx / d * force;
        self.vy += dy / d * force;
    }

    fn wrap(&mut self, w: f32, h: f32, m: f32) {
        if self.x < -m { self.x = w + m; } else if self.x > w + m { self.x = -m; }
        if self.y < -m { self.y = h + m; } else if self.y > h + m { self.y = -m; }
    }
}

/// Map an angle into (-PI, PI].
#[inline]
fn wrap_angle(a: f32) -> f32 {
    let r = (a + PI).rem_euclid(TAU) - PI;
    if r <= -PI { r + TAU } else { r }
}
