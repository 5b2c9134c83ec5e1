//! Rasterizing a source image into a square favicon PNG.
//!
//! The source is fitted inside the square canvas with its aspect ratio kept,
//! centered, and composited over the background. Large reductions go through
//! repeated halving before the final Lanczos3 pass, which keeps thin detail
//! from aliasing away at 16 px.

use super::FaviconError;
use crate::palette::Rgb;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Background {
    #[default]
    Transparent,
    Solid(Rgb),
}

impl Background {
    fn pixel(self) -> Rgba<u8> {
        match self {
            Background::Transparent => Rgba([0, 0, 0, 0]),
            Background::Solid(c) => Rgba([c.r, c.g, c.b, 255]),
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Background::Transparent => f.write_str("transparent"),
            Background::Solid(c) => f.write_str(&c.hex()),
        }
    }
}

impl FromStr for Background {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("transparent") {
            return Ok(Background::Transparent);
        }
        Rgb::from_hex(s)
            .map(Background::Solid)
            .ok_or_else(|| format!("invalid background '{s}' (expected \"transparent\" or #rrggbb)"))
    }
}

/// Placement of the scaled source on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// Fit `width × height` inside a `size × size` square, centered.
///
/// Edges are rounded and never drop below one pixel.
pub fn fit(width: u32, height: u32, size: u32) -> Placement {
    let target = f64::from(size);
    let scale = (target / f64::from(width.max(1))).min(target / f64::from(height.max(1)));
    let w = ((f64::from(width) * scale).round() as u32).clamp(1, size);
    let h = ((f64::from(height) * scale).round() as u32).clamp(1, size);
    Placement {
        width: w,
        height: h,
        x: (f64::from(size - w) / 2.0).round() as u32,
        y: (f64::from(size - h) / 2.0).round() as u32,
    }
}

/// Resize to exactly `width × height`.
///
/// When the target is under half the source in both directions the image is
/// halved (rounding) for as long as both halves stay above the target, then
/// resized the rest of the way.
pub fn downscale(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (mut cw, mut ch) = img.dimensions();
    if (cw, ch) == (width, height) {
        return img.clone();
    }
    if width * 2 >= cw || height * 2 >= ch {
        return imageops::resize(img, width, height, FilterType::Lanczos3);
    }

    let mut current = img.clone();
    while cw / 2 > width && ch / 2 > height {
        cw = (cw + 1) / 2;
        ch = (ch + 1) / 2;
        current = imageops::resize(&current, cw, ch, FilterType::Triangle);
    }
    imageops::resize(&current, width, height, FilterType::Lanczos3)
}

/// Render `img` as a `size × size` RGBA canvas.
pub fn render(img: &DynamicImage, size: u32, background: Background) -> RgbaImage {
    let source = img.to_rgba8();
    let place = fit(source.width(), source.height(), size);
    let scaled = downscale(&source, place.width, place.height);

    let mut canvas = RgbaImage::from_pixel(size, size, background.pixel());
    imageops::overlay(&mut canvas, &scaled, i64::from(place.x), i64::from(place.y));
    canvas
}

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, FaviconError> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| FaviconError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Render and PNG-encode one favicon size.
pub fn rasterize(
    img: &DynamicImage,
    size: u32,
    background: Background,
) -> Result<Vec<u8>, FaviconError> {
    let canvas = render(img, size, background);
    log::debug!("rendered {size}x{size} favicon on {background}");
    encode_png(&canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, px: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(px)))
    }

    // =========================================================================
    // Background
    // =========================================================================

    #[test]
    fn background_parsing() {
        assert_eq!("transparent".parse::<Background>(), Ok(Background::Transparent));
        assert_eq!("Transparent".parse::<Background>(), Ok(Background::Transparent));
        assert_eq!(
            "#FF8000".parse::<Background>(),
            Ok(Background::Solid(Rgb::new(255, 128, 0)))
        );
        assert!("red".parse::<Background>().is_err());
        assert_eq!(Background::Solid(Rgb::new(1, 2, 3)).to_string(), "#010203");
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    #[test]
    fn square_source_fills_canvas() {
        assert_eq!(
            fit(512, 512, 32),
            Placement { width: 32, height: 32, x: 0, y: 0 }
        );
    }

    #[test]
    fn wide_source_is_letterboxed() {
        assert_eq!(
            fit(200, 100, 16),
            Placement { width: 16, height: 8, x: 0, y: 4 }
        );
    }

    #[test]
    fn tall_source_is_pillarboxed() {
        // 48 * 100/300 = 16, centered at (48 - 16) / 2
        assert_eq!(
            fit(100, 300, 48),
            Placement { width: 16, height: 48, x: 16, y: 0 }
        );
    }

    #[test]
    fn sliver_keeps_one_pixel() {
        let place = fit(1000, 1, 16);
        assert_eq!((place.width, place.height), (16, 1));
    }

    #[test]
    fn small_source_is_upscaled() {
        assert_eq!(fit(8, 8, 32).width, 32);
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    #[test]
    fn downscale_hits_exact_target() {
        let img = RgbaImage::from_pixel(1000, 700, Rgba([10, 20, 30, 255]));
        let out = downscale(&img, 16, 11);
        assert_eq!(out.dimensions(), (16, 11));
        let px = out.get_pixel(8, 5);
        assert!(px[0].abs_diff(10) <= 1 && px[2].abs_diff(30) <= 1);
    }

    #[test]
    fn transparent_margins() {
        let canvas = render(&solid(200, 100, [255, 0, 0, 255]), 16, Background::Transparent);
        assert_eq!(canvas.dimensions(), (16, 16));
        assert_eq!(canvas.get_pixel(8, 0)[3], 0);
        let center = canvas.get_pixel(8, 8);
        assert!(center[0] >= 250 && center[1] <= 5 && center[3] >= 250);
    }

    #[test]
    fn solid_background_fills_margins() {
        let bg = Background::Solid(Rgb::new(0, 0, 255));
        let canvas = render(&solid(100, 300, [0, 255, 0, 255]), 48, bg);
        assert_eq!(canvas.get_pixel(2, 24), &Rgba([0, 0, 255, 255]));
        let center = canvas.get_pixel(24, 24);
        assert!(center[1] >= 250 && center[2] <= 5);
    }

    #[test]
    fn rasterize_produces_decodable_png() {
        let png = rasterize(&solid(64, 64, [9, 9, 9, 255]), 32, Background::default()).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 32));
    }
}
