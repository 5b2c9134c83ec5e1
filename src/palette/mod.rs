//! Dominant-color palette extraction.
//!
//! ```text
//! pixels ─► downsample (≤150 px edge) ─► bucket opaque pixels (step 8)
//!        ─► top K×5 buckets ─► weighted k-means (10 rounds) ─► PaletteEntry
//! ```
//!
//! The whole pipeline is deterministic: same pixels and options, same
//! palette. Bad input (empty buffers, fully transparent images, `colors == 0`)
//! yields an empty palette rather than an error.
//!
//! `percent` is a cluster's weight over *every* sampled pixel, transparent
//! ones included, so a partly transparent image sums to less than 100.

pub mod color;
pub mod export;
pub mod kmeans;
pub mod names;
pub mod quantize;

pub use color::{Cmyk, ColorFamily, Hsl, Rgb, WcagGrade, contrast_ratio, shades};
pub use export::{ExportFormat, render};
pub use names::closest_color_name;

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("failed to decode image: {0}")]
    Decode(String),
}

/// Row-major RGBA8 pixels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl PixelBuffer {
    /// A buffer whose length does not match `width * height * 4` is replaced
    /// by an empty one.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        let expected = u64::from(width) * u64::from(height) * 4;
        if rgba.len() as u64 != expected {
            log::warn!(
                "pixel buffer of {} bytes does not match {width}x{height}; treating as empty",
                rgba.len()
            );
            return Self::default();
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            rgba: img.into_raw(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteOptions {
    /// Target number of colors (K).
    pub colors: usize,
    /// Longest edge of the sampled image.
    pub max_sample_edge: u32,
    /// Pixels with lower alpha are skipped.
    pub alpha_threshold: u8,
    pub quantize_step: u16,
    /// Candidates kept for clustering, as a multiple of `colors`.
    pub candidate_factor: usize,
    pub iterations: usize,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self {
            colors: 8,
            max_sample_edge: 150,
            alpha_threshold: 128,
            quantize_step: 8,
            candidate_factor: 5,
            iterations: kmeans::DEFAULT_ITERATIONS,
        }
    }
}

impl PaletteOptions {
    pub fn with_colors(colors: usize) -> Self {
        Self {
            colors,
            ..Self::default()
        }
    }
}

/// One palette color. `hex` is lower-case `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteEntry {
    pub hex: String,
    pub rgb: Rgb,
    pub hsl: Hsl,
    pub percent: f64,
}

impl PaletteEntry {
    pub fn new(rgb: Rgb, percent: f64) -> Self {
        Self {
            hex: rgb.hex(),
            rgb,
            hsl: rgb.to_hsl(),
            percent,
        }
    }

    pub fn cmyk(&self) -> Cmyk {
        self.rgb.to_cmyk()
    }

    pub fn name(&self) -> &'static str {
        closest_color_name(self.rgb)
    }

    pub fn family(&self) -> ColorFamily {
        ColorFamily::of(self.hsl)
    }
}

/// Sampling size: scaled so neither edge exceeds `max_edge`, never enlarged,
/// each edge floored.
pub fn sample_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    let max = f64::from(max_edge);
    let scale = (max / f64::from(width)).min(max / f64::from(height)).min(1.0);
    (
        (f64::from(width) * scale).floor() as u32,
        (f64::from(height) * scale).floor() as u32,
    )
}

/// Extract the palette of a pixel buffer, downsampling it first when larger
/// than the sampling size.
pub fn extract_palette(buffer: &PixelBuffer, options: &PaletteOptions) -> Vec<PaletteEntry> {
    if options.colors == 0 || buffer.is_empty() {
        return Vec::new();
    }
    let (w, h) = sample_dimensions(buffer.width, buffer.height, options.max_sample_edge);
    if (w, h) == (buffer.width, buffer.height) {
        return quantize_sampled(buffer, options);
    }
    match RgbaImage::from_raw(buffer.width, buffer.height, buffer.rgba.clone()) {
        Some(img) => {
            let small = image::imageops::resize(&img, w, h, FilterType::Triangle);
            quantize_sampled(&PixelBuffer::from(small), options)
        }
        None => Vec::new(),
    }
}

pub fn extract_palette_from_image(
    img: &DynamicImage,
    options: &PaletteOptions,
) -> Vec<PaletteEntry> {
    extract_palette(&PixelBuffer::from(img.to_rgba8()), options)
}

/// Decode an encoded image and extract its palette.
pub fn load_and_extract(
    bytes: &[u8],
    options: &PaletteOptions,
) -> Result<Vec<PaletteEntry>, PaletteError> {
    let img = image::load_from_memory(bytes).map_err(|e| PaletteError::Decode(e.to_string()))?;
    Ok(extract_palette_from_image(&img, options))
}

/// Bucket, cluster and convert an already-sampled buffer.
fn quantize_sampled(sample: &PixelBuffer, options: &PaletteOptions) -> Vec<PaletteEntry> {
    let total = sample.pixel_count();
    if total == 0 {
        return Vec::new();
    }
    let buckets =
        quantize::bucket_pixels(&sample.rgba, options.alpha_threshold, options.quantize_step);
    if buckets.is_empty() {
        log::debug!("no opaque pixels in {}x{} sample", sample.width, sample.height);
        return Vec::new();
    }
    let limit = options.colors.saturating_mul(options.candidate_factor);
    let candidates = quantize::top_candidates(buckets, limit);
    let clusters = kmeans::cluster(&candidates, options.colors, options.iterations);
    log::debug!(
        "{} candidates clustered into {} colors",
        candidates.len(),
        clusters.len()
    );

    clusters
        .into_iter()
        .map(|c| PaletteEntry::new(Rgb::clamped(c.rgb), c.weight as f64 / total as f64 * 100.0))
        .collect()
}
