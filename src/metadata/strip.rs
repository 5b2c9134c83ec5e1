//! Metadata removal by re-encoding.
//!
//! The image is decoded to pixels and written back out with a plain encoder,
//! so no EXIF, IPTC, XMP or ICC segment survives.
//!
//! | Source MIME | Output |
//! |---|---|
//! | `image/png` | PNG |
//! | `image/webp` | lossless WebP |
//! | anything else | JPEG, quality 95 |

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageError};
use thiserror::Error;

pub const JPEG_QUALITY: u8 = 95;

#[derive(Error, Debug)]
pub enum StripError {
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("failed to encode clean image: {0}")]
    Encode(String),
    #[error("unsupported image format: {0}")]
    Unsupported(String),
}

/// Re-encoded image bytes and their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrippedImage {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

/// Decode `bytes` and re-encode the pixels without any metadata.
pub fn strip_metadata(bytes: &[u8], mime: &str) -> Result<StrippedImage, StripError> {
    let img = image::load_from_memory(bytes).map_err(|e| match e {
        ImageError::Unsupported(u) => StripError::Unsupported(u.to_string()),
        other => StripError::Decode(other.to_string()),
    })?;
    let (width, height) = (img.width(), img.height());

    let mut out = Vec::new();
    let encoded = match mime {
        "image/png" => {
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            rgba.write_with_encoder(PngEncoder::new(&mut out))
                .map(|_| "image/png")
        }
        "image/webp" => {
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            rgba.write_with_encoder(WebPEncoder::new_lossless(&mut out))
                .map(|_| "image/webp")
        }
        _ => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))
                .map(|_| "image/jpeg")
        }
    };
    let mime = encoded.map_err(|e| StripError::Encode(e.to_string()))?;
    log::debug!(
        "re-encoded {width}x{height} image as {mime}: {} -> {} bytes",
        bytes.len(),
        out.len()
    );
    Ok(StrippedImage { bytes: out, mime })
}
