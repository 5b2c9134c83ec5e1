//! Favicon generation: square PNG renditions of an image packed into an ICO.
//!
//! | Stage | Function |
//! |-------|----------|
//! | fit, downscale, composite | [`render::rasterize`] |
//! | container | [`ico::encode`] |
//! | both, every size in parallel | [`create_favicon`] |
//! | standalone PNGs next to an ICO | [`preview_pngs`] |

pub mod ico;
pub mod render;

pub use ico::{IcoDirectory, IcoEntry, IcoImage};
pub use render::{Background, rasterize};

use image::DynamicImage;
use rayon::prelude::*;
use thiserror::Error;

/// Sizes packed into `favicon.ico`.
pub const STANDARD_SIZES: [u32; 3] = [16, 32, 48];
/// Sizes offered as standalone PNGs.
pub const PREVIEW_SIZES: [u32; 5] = [16, 32, 48, 64, 128];
pub const MAX_SIZE: u32 = 256;
pub const ICO_MIME: &str = "image/x-icon";

#[derive(Error, Debug)]
pub enum FaviconError {
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("failed to encode favicon: {0}")]
    Encode(String),
    #[error("favicon size {0} is outside 1-256")]
    InvalidSize(u32),
    #[error("no favicon sizes requested")]
    Empty,
}

pub fn validate_sizes(sizes: &[u32]) -> Result<(), FaviconError> {
    if sizes.is_empty() {
        return Err(FaviconError::Empty);
    }
    match sizes.iter().find(|&&s| s == 0 || s > MAX_SIZE) {
        Some(&bad) => Err(FaviconError::InvalidSize(bad)),
        None => Ok(()),
    }
}

/// Render `img` at every size, as PNG bytes in the order given.
pub fn render_pngs(
    img: &DynamicImage,
    sizes: &[u32],
    background: Background,
) -> Result<Vec<(u32, Vec<u8>)>, FaviconError> {
    validate_sizes(sizes)?;
    sizes
        .par_iter()
        .map(|&size| rasterize(img, size, background).map(|png| (size, png)))
        .collect()
}

/// Render `img` at every size and pack the results into one ICO file.
pub fn create_favicon(
    img: &DynamicImage,
    sizes: &[u32],
    background: Background,
) -> Result<Vec<u8>, FaviconError> {
    let images: Vec<IcoImage> = render_pngs(img, sizes, background)?
        .into_iter()
        .map(|(size, png)| IcoImage {
            size: size as u16,
            png,
        })
        .collect();
    log::debug!("packing {} images into ICO", images.len());
    Ok(ico::encode(&images))
}

/// PNGs for `sizes` alongside an already built `ico`.
///
/// Sizes packed in the ICO reuse its payloads; only the rest are rendered.
pub fn preview_pngs(
    img: &DynamicImage,
    ico: &[u8],
    sizes: &[u32],
    background: Background,
) -> Result<Vec<(u32, Vec<u8>)>, FaviconError> {
    validate_sizes(sizes)?;
    let dir = IcoDirectory::parse(ico)?;
    let packed = |size: u32| {
        dir.entries
            .iter()
            .find(|e| u32::from(e.width) == size)
            .and_then(|e| e.payload(ico))
    };

    let missing: Vec<u32> = sizes
        .iter()
        .copied()
        .filter(|&size| packed(size).is_none())
        .collect();
    let mut rendered = if missing.is_empty() {
        Vec::new()
    } else {
        render_pngs(img, &missing, background)?
    }
    .into_iter();
    log::debug!(
        "{} of {} preview sizes taken from the ICO",
        sizes.len() - missing.len(),
        sizes.len()
    );

    let mut pngs = Vec::with_capacity(sizes.len());
    for &size in sizes {
        match packed(size) {
            Some(png) => pngs.push((size, png.to_vec())),
            None => pngs.extend(rendered.next()),
        }
    }
    Ok(pngs)
}

/// Decode an encoded image, then [`create_favicon`].
pub fn load_and_create(
    bytes: &[u8],
    sizes: &[u32],
    background: Background,
) -> Result<Vec<u8>, FaviconError> {
    let img = image::load_from_memory(bytes).map_err(|e| FaviconError::Decode(e.to_string()))?;
    create_favicon(&img, sizes, background)
}
