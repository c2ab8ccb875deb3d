// mask2points - Sample attraction points from a pre-rendered text image
//
// Pipeline:
//   1. Load image (any format the image crate decodes)
//   2. Optionally resize to the target canvas size
//   3. Sample alpha on the configured stride
//   4. Write points as JSON
//
// Usage: cargo run --bin mask2points -- <image> [--width N] [--height N]
//        [--stride N] [--threshold N] [--out FILE]

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs::File;
    use std::io::{self, BufWriter, Write};
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::Parser;
    use glyph_field::{FieldConfig, Mask, Point, sample_points};
    use image::imageops::FilterType;
    use serde::Serialize;

    #[derive(Parser, Debug)]
    #[command(name = "mask2points", about = "Sample glyph attraction points from a text image")]
    pub struct Args {
        /// Image with the text drawn on a transparent background
        pub image: PathBuf,

        /// Resize to this width before sampling
        #[arg(long)]
        pub width: Option<u32>,

        /// Resize to this height before sampling
        #[arg(long)]
        pub height: Option<u32>,

        /// Sampling step in pixels
        #[arg(long, default_value_t = FieldConfig::default().sample_stride)]
        pub stride: u32,

        /// Alpha threshold (exclusive)
        #[arg(long, default_value_t = FieldConfig::default().alpha_threshold)]
        pub threshold: u8,

        /// Output file, stdout when omitted
        #[arg(long, short)]
        pub out: Option<PathBuf>,
    }

    #[derive(Serialize, Debug)]
    pub struct PointSet {
        pub width: u32,
        pub height: u32,
        pub stride: u32,
        pub points: Vec<Point>,
    }

    pub fn sample(mask: &Mask, stride: u32, threshold: u8) -> PointSet {
        PointSet {
            width: mask.width(),
            height: mask.height(),
            stride,
            points: sample_points(mask, stride, threshold),
        }
    }

    pub fn run(args: Args) -> anyhow::Result<()> {
        anyhow::ensure!(args.stride > 0, "--stride must be at least 1");

        let img = image::open(&args.image)
            .with_context(|| format!("failed to open {}", args.image.display()))?;
        let img = match (args.width, args.height) {
            (None, None) => img,
            (w, h) => {
                let w = w.unwrap_or(img.width());
                let h = h.unwrap_or(img.height());
                log::info!("resizing {}x{} -> {}x{}", img.width(), img.height(), w, h);
                img.resize_exact(w, h, FilterType::Lanczos3)
            }
        };

        let rgba = img.to_rgba8();
        let (w, h) = rgba.dimensions();
        let mask = Mask::new(w, h, rgba.into_raw())?;

        let set = sample(&mask, args.stride, args.threshold);
        log::info!("sampled {} points from {}x{} at stride {}", set.points.len(), w, h, args.stride);
        if set.points.is_empty() {
            log::warn!("no pixel above alpha {}; is the background opaque?", args.threshold);
        }

        match &args.out {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                let mut out = BufWriter::new(file);
                serde_json::to_writer_pretty(&mut out, &set)?;
                out.flush()?;
            }
            None => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                serde_json::to_writer_pretty(&mut out, &set)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    native::run(native::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
