// config.rs - Tunables for the glyph field
//
// Every field has a default, so a host may pass a partial JSON object
// (or nothing at all) and get the stock portfolio look.

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};

/// Glyph indices travel as u16 through particles and encoded instances.
pub const MAX_GLYPHS: usize = u16::MAX as usize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Text the particles converge onto while the pointer is over the canvas.
    pub target_text: String,
    /// CSS font used to rasterize `target_text` (size is prepended).
    pub text_font: String,
    /// CSS font family used for the particle glyphs.
    pub glyph_font: String,
    /// Alphabet each particle picks its glyph from.
    pub glyphs: Vec<String>,

    /// Canvas area (px^2) per particle.
    pub density_area: f32,
    /// Sampling step in both axes, in pixels.
    pub sample_stride: u32,
    /// Minimum alpha (exclusive) for a mask pixel to count as foreground.
    pub alpha_threshold: u8,
    /// Font size as a fraction of canvas width.
    pub font_scale: f32,
    /// Upper bound on the text font size.
    pub max_font_px: f32,

    pub spring: f32,
    pub friction: f32,
    pub angle_ease: f32,
    pub drift: f32,
    pub drift_rate: f32,
    pub repel_radius: f32,
    pub repel_strength: f32,
    pub wrap_margin: f32,
    /// Fraction of the pointer's offset from centre applied to every target.
    pub parallax: f32,
    /// Wrap the point index so leftover particles reuse attraction points.
    pub reuse_points: bool,

    pub seed: u32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            target_text: "MOHAMMED SINAN".to_string(),
            text_font: "'Reem Kufi', sans-serif".to_string(),
            glyph_font: "'Amiri', serif".to_string(),
            glyphs: ["ﮮ", "ﮯ", "ﮰ", "ﮱ", "﴾", "﴿", "؏", "~", "،"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            density_area: 7000.0,
            sample_stride: 7,
            alpha_threshold: 128,
            font_scale: 0.1,
            max_font_px: 120.0,
            spring: 0.02,
            friction: 0.88,
            angle_ease: 0.1,
            drift: 0.012,
            drift_rate: 0.6,
            repel_radius: 120.0,
            repel_strength: 0.6,
            wrap_margin: 50.0,
            parallax: 0.2,
            reuse_points: false,
            seed: 0xDEADBEEF,
        }
    }
}

impl FieldConfig {
    /// Parse a (possibly partial) JSON object and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_stride == 0 {
            return Err(invalid("sample_stride must be at least 1"));
        }
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(invalid("friction must lie in (0, 1)"));
        }
        if !(self.density_area >= 1.0 && self.density_area.is_finite()) {
            return Err(invalid("density_area must be a finite value of at least 1"));
        }
        if self.glyphs.is_empty() {
            return Err(invalid("glyphs must not be empty"));
        }
        if self.glyphs.len() > MAX_GLYPHS {
            return Err(invalid("too many glyphs"));
        }
        if !(self.max_font_px > 0.0) || !(self.font_scale > 0.0) {
            return Err(invalid("font size parameters must be positive"));
        }
        let non_negative = |v: f32| v.is_finite() && v >= 0.0;
        if !non_negative(self.repel_radius) || !non_negative(self.wrap_margin) {
            return Err(invalid("repel_radius and wrap_margin must be finite and non-negative"));
        }
        let finite = [
            self.spring,
            self.angle_ease,
            self.drift,
            self.drift_rate,
            self.repel_strength,
            self.parallax,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(invalid("physics constants must be finite"));
        }
        Ok(())
    }

    /// Text font size for a canvas of the given width.
    pub fn font_px(&self, width: f32) -> f32 {
        (width * self.font_scale).min(self.max_font_px)
    }
}

fn invalid(msg: &str) -> FieldError {
    FieldError::InvalidConfig(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        FieldConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = FieldConfig::from_json(r#"{"target_text": "HI", "sample_stride": 3}"#).unwrap();
        assert_eq!(config.target_text, "HI");
        assert_eq!(config.sample_stride, 3);
        assert_eq!(config.density_area, 7000.0);
        assert_eq!(config.glyphs.len(), 9);
    }

    #[test]
    fn rejects_bad_friction() {
        let err = FieldConfig::from_json(r#"{"friction": 1.0}"#).unwrap_err();
        assert!(matches!(err, FieldError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_zero_stride_and_empty_glyphs() {
        assert!(FieldConfig::from_json(r#"{"sample_stride": 0}"#).is_err());
        assert!(FieldConfig::from_json(r#"{"glyphs": []}"#).is_err());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = FieldConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, FieldError::Config(_)));
    }

    #[test]
    fn rejects_tiny_density_area() {
        assert!(FieldConfig::from_json(r#"{"density_area": 1e-30}"#).is_err());
        assert!(FieldConfig::from_json(r#"{"density_area": 0.5}"#).is_err());
        assert!(FieldConfig::from_json(r#"{"density_area": 1.0}"#).is_ok());
    }

    #[test]
    fn rejects_unbounded_margins() {
        // 1e39 overflows f32 to infinity
        assert!(FieldConfig::from_json(r#"{"wrap_margin": 1e39}"#).is_err());
        assert!(FieldConfig::from_json(r#"{"repel_radius": 1e39}"#).is_err());
        let config = FieldConfig { wrap_margin: f32::NAN, ..FieldConfig::default() };
        assert!(config.validate().is_err());
        let config = FieldConfig { repel_radius: f32::NAN, ..FieldConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn glyph_alphabet_fits_u16_indices() {
        let config = FieldConfig { glyphs: vec!["~".to_string(); MAX_GLYPHS], ..FieldConfig::default() };
        assert!(config.validate().is_ok());
        let config = FieldConfig { glyphs: vec!["~".to_string(); MAX_GLYPHS + 1], ..FieldConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn font_size_is_capped() {
        let config = FieldConfig::default();
        assert_eq!(config.font_px(500.0), 50.0);
        assert_eq!(config.font_px(4000.0), 120.0);
    }
}
