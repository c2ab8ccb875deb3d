// sim/ - Glyph particle simulation
//
// Instance-owned state: particles, pointer, cached text layout.
// Particles are regenerated on every resize; the layout cache is dropped
// at the same time.

mod assign;
mod particle;
mod pointer;

pub use assign::{assign, reset};
pub use particle::{FrameInput, HIGHLIGHT, Mode, Particle, Physics};
pub use pointer::Pointer;

use crate::config::FieldConfig;
use crate::error::Result;
use crate::layout::{LayoutSampler, Point, TextLayout, TextRasterizer};
use crate::render::{Surface, draw_field};

// Capacity limit
pub const MAX_PARTICLES: usize = 5000;

/// Glyph particle world
pub struct GlyphField<R> {
    // Canvas dimensions
    w: u32,
    h: u32,

    config: FieldConfig,
    physics: Physics,

    particles: Vec<Particle>,
    pointer: Pointer,
    sampler: LayoutSampler<R>,

    // Seconds, from the last frame timestamp
    time: f32,

    // RNG state
    rng: u32,
}

impl<R: TextRasterizer> GlyphField<R> {
    pub fn new(w: u32, h: u32, config: FieldConfig, raster: R) -> Result<Self> {
        config.validate()?;
        let sampler = LayoutSampler::new(raster, config.sample_stride, config.alpha_threshold);
        let mut field = Self {
            w: 0,
            h: 0,
            physics: Physics::from(&config),
            particles: Vec::new(),
            pointer: Pointer::default(),
            sampler,
            time: 0.0,
            rng: if config.seed == 0 { 0xDEADBEEF } else { config.seed },
            config,
        };
        field.resize(w, h);
        Ok(field)
    }

    /// Regenerate particles for the new size and drop the layout cache.
    pub fn resize(&mut self, w: u32, h: u32) {
        self.w = w;
        self.h = h;
        self.sampler.invalidate();

        let count = ((w as f32 * h as f32) / self.config.density_area) as usize;
        let count = count.min(MAX_PARTICLES);
        let glyph_count = self.config.glyphs.len();
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let x = rand(&mut self.rng) * w as f32;
            let y = rand(&mut self.rng) * h as f32;
            self.particles.push(Particle::new(x, y, glyph_count, &self.config, &mut self.rng));
        }

        log::debug!("glyph field {}x{}: {} particles", w, h, count);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer.move_to(x, y);
    }

    pub fn pointer_leave(&mut self) {
        self.pointer.leave();
    }

    /// Reset modes, assign targets if the pointer is active, move everything.
    pub fn step(&mut self, now_ms: f64) {
        self.time = (now_ms / 1000.0) as f32;
        reset(&mut self.particles);

        if self.pointer.active {
            let layout = TextLayout {
                text: &self.config.target_text,
                width: self.w,
                height: self.h,
                font_px: self.config.font_px(self.w as f32),
                font: &self.config.text_font,
            };
            let points = self.sampler.points(&layout);
            let offset = Point::new(
                (self.pointer.x - self.w as f32 * 0.5) * self.config.parallax,
                (self.pointer.y - self.h as f32 * 0.5) * self.config.parallax,
            );
            assign(&mut self.particles, points, offset, self.config.reuse_points);
        }

        let input = FrameInput {
            width: self.w as f32,
            height: self.h as f32,
            time: self.time,
            pointer: self.pointer,
        };
        for p in &mut self.particles {
            p.update(&input, &self.physics);
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        draw_field(&self.particles, &self.config.glyphs, &self.config.glyph_font, surface);
    }

    /// One full frame: clear, step, draw.
    pub fn tick<S: Surface + ?Sized>(&mut self, now_ms: f64, surface: &mut S) {
        surface.clear(self.w as f32, self.h as f32);
        self.step(now_ms);
        self.draw(surface);
    }

    pub fn particles(&self) -> &[Particle] { &self.particles }
    pub fn pointer(&self) -> Pointer { self.pointer }
    pub fn config(&self) -> &FieldConfig { &self.config }
    pub fn sampler(&self) -> &LayoutSampler<R> { &self.sampler }
    pub fn width(&self) -> u32 { self.w }
    pub fn height(&self) -> u32 { self.h }
}

/// Random number generator (xorshift32), uniform in [0, 1)
#[inline(always)]
pub fn rand(rng: &mut u32) -> f32 {
    *rng ^= *rng << 13;
    *rng ^= *rng >> 17;
    *rng ^= *rng << 5;
    (*rng >> 8) as f32 * (1.0 / 16777216.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Mask, NoRaster};
    use crate::render::Encoder;

    /// Foreground block in the middle of the canvas.
    struct CentreBlock;

    impl TextRasterizer for CentreBlock {
        fn rasterize(&mut self, layout: &TextLayout) -> Option<Mask> {
            let mut mask = Mask::blank(layout.width, layout.height);
            let (cx, cy) = (layout.width / 2, layout.height / 2);
            for y in cy.saturating_sub(10)..cy + 10 {
                for x in cx.saturating_sub(40)..cx + 40 {
                    mask.set_alpha(x, y, 255);
                }
            }
            Some(mask)
        }
    }

    fn field(w: u32, h: u32) -> GlyphField<CentreBlock> {
        GlyphField::new(w, h, FieldConfig::default(), CentreBlock).unwrap()
    }

    #[test]
    fn particle_count_follows_area() {
        let mut f = field(700, 100);
        assert_eq!(f.particles().len(), 10);
        f.resize(1400, 1000);
        assert_eq!(f.particles().len(), 200);
        f.resize(0, 0);
        assert!(f.particles().is_empty());
        f.step(16.0);
    }

    #[test]
    fn particle_count_is_capped() {
        let config = FieldConfig { density_area: 1.0, ..FieldConfig::default() };
        let mut f = GlyphField::new(800, 600, config, NoRaster).unwrap();
        assert_eq!(f.particles().len(), MAX_PARTICLES);
        f.resize(u32::MAX, u32::MAX);
        assert_eq!(f.particles().len(), MAX_PARTICLES);
        f.step(16.0);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = FieldConfig { sample_stride: 0, ..FieldConfig::default() };
        assert!(GlyphField::new(10, 10, config, NoRaster).is_err());
    }

    #[test]
    fn inactive_frame_leaves_no_targets() {
        let mut f = field(800, 600);
        f.pointer_move(400.0, 300.0);
        f.step(0.0);
        assert!(f.particles().iter().any(Particle::is_targeting));

        f.pointer_leave();
        f.step(16.0);
        assert!(f.particles().iter().all(|p| !p.is_targeting()));
    }

    #[test]
    fn sampler_runs_once_between_resizes() {
        let mut f = field(800, 600);
        assert_eq!(f.sampler().passes(), 0);
        f.pointer_move(100.0, 100.0);
        for i in 0..10 {
            f.step(i as f64 * 16.0);
        }
        assert_eq!(f.sampler().passes(), 1);

        f.resize(640, 480);
        assert!(!f.sampler().is_cached());
        f.step(200.0);
        assert_eq!(f.sampler().passes(), 2);
    }

    #[test]
    fn sampler_is_lazy() {
        let mut f = field(800, 600);
        for i in 0..5 {
            f.step(i as f64 * 16.0);
        }
        assert_eq!(f.sampler().passes(), 0);
    }

    #[test]
    fn idle_particles_stay_in_bounds() {
        let mut f = field(500, 400);
        let m = f.config().wrap_margin;
        f.pointer_move(250.0, 200.0);
        for i in 0..60 {
            f.step(i as f64 * 16.0);
        }
        f.pointer_leave();
        for i in 60..300 {
            f.step(i as f64 * 16.0);
            for p in f.particles() {
                assert!(p.x >= -m && p.x <= 500.0 + m);
                assert!(p.y >= -m && p.y <= 400.0 + m);
            }
        }
    }

    #[test]
    fn no_points_keeps_everything_idle() {
        let mut f = GlyphField::new(800, 600, FieldConfig::default(), NoRaster).unwrap();
        f.pointer_move(10.0, 10.0);
        f.step(0.0);
        f.step(16.0);
        assert!(f.particles().iter().all(|p| !p.is_targeting()));
        assert_eq!(f.sampler().passes(), 1);
    }

    #[test]
    fn leftover_particles_without_reuse() {
        // Stride 20 over an 80x20 block: 4 x 1 points
        let config = FieldConfig { sample_stride: 20, ..FieldConfig::default() };
        let mut f = GlyphField::new(800, 600, config, CentreBlock).unwrap();
        f.pointer_move(400.0, 300.0);
        f.step(0.0);
        let targeting = f.particles().iter().filter(|p| p.is_targeting()).count();
        assert_eq!(targeting, 4);
        assert!(f.particles()[..4].iter().all(Particle::is_targeting));
    }

    #[test]
    fn reuse_points_targets_everyone() {
        let config = FieldConfig { sample_stride: 20, reuse_points: true, ..FieldConfig::default() };
        let mut f = GlyphField::new(800, 600, config, CentreBlock).unwrap();
        f.pointer_move(400.0, 300.0);
        f.step(0.0);
        assert!(f.particles().iter().all(Particle::is_targeting));
    }

    #[test]
    fn parallax_shifts_targets() {
        let config = FieldConfig { sample_stride: 20, ..FieldConfig::default() };
        let mut f = GlyphField::new(800, 600, config, CentreBlock).unwrap();
        f.pointer_move(500.0, 300.0);
        f.step(0.0);
        let first = f.sampler_points_for_test()[0];
        match f.particles()[0].mode {
            Mode::Targeting(t) => {
                assert_eq!(t.x, first.x + 20.0);
                assert_eq!(t.y, first.y);
            }
            Mode::Idle => panic!("expected a target"),
        }
    }

    #[test]
    fn tick_draws_every_particle() {
        let mut f = field(700, 700);
        let mut enc = Encoder::new();
        f.tick(0.0, &mut enc);
        assert_eq!(enc.count(), f.particles().len());
        f.tick(16.0, &mut enc);
        assert_eq!(enc.count(), f.particles().len());
    }

    #[test]
    fn same_seed_same_field() {
        let a = field(300, 300);
        let b = field(300, 300);
        let pa: Vec<(f32, f32)> = a.particles().iter().map(|p| (p.x, p.y)).collect();
        let pb: Vec<(f32, f32)> = b.particles().iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(pa, pb);
    }

    impl<R: TextRasterizer> GlyphField<R> {
        fn sampler_points_for_test(&mut self) -> Vec<Point> {
            let layout = TextLayout {
                text: &self.config.target_text,
                width: self.w,
                height: self.h,
                font_px: self.config.font_px(self.w as f32),
                font: &self.config.text_font,
            };
            self.sampler.points(&layout).to_vec()
        }
    }

    #[test]
    fn rand_is_unit_interval() {
        let mut rng = 1;
        for _ in 0..10_000 {
            let r = rand(&mut rng);
            assert!((0.0..1.0).contains(&r));
        }
    }
}
