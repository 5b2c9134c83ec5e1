//! Shared test utilities: small encoded images and hand-assembled TIFF/EXIF
//! blocks.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let png = png_bytes(8, 8);
//! let tiff = tiff_with_ifds(
//!     &[TiffEntry::ascii(0x010F, "Canon")],
//!     &[TiffEntry::ascii(0x0001, "N")],
//! );
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

// =========================================================================
// Encoded images
// =========================================================================

/// A `width × height` RGBA gradient encoded as PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 40 % 256) as u8, (y * 40 % 256) as u8, 128, 255])
    });
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

/// A `width × height` RGB gradient encoded as baseline JPEG, no EXIF.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 16 % 256) as u8, (y * 16 % 256) as u8, 64])
    });
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, 90);
    img.write_with_encoder(encoder).unwrap();
    buffer
}

// =========================================================================
// TIFF assembly
// =========================================================================

const ASCII: u16 = 2;
const SHORT: u16 = 3;
const LONG: u16 = 4;
const RATIONAL: u16 = 5;
const GPS_POINTER: u16 = 0x8825;

/// One little-endian IFD entry with its value bytes.
#[derive(Debug, Clone)]
pub struct TiffEntry {
    pub tag: u16,
    pub kind: u16,
    pub count: u32,
    pub data: Vec<u8>,
}

impl TiffEntry {
    pub fn ascii(tag: u16, text: &str) -> Self {
        let mut data = text.as_bytes().to_vec();
        data.push(0);
        Self {
            tag,
            kind: ASCII,
            count: data.len() as u32,
            data,
        }
    }

    pub fn short(tag: u16, value: u16) -> Self {
        Self {
            tag,
            kind: SHORT,
            count: 1,
            data: value.to_le_bytes().to_vec(),
        }
    }

    pub fn long(tag: u16, value: u32) -> Self {
        Self {
            tag,
            kind: LONG,
            count: 1,
            data: value.to_le_bytes().to_vec(),
        }
    }

    pub fn rationals(tag: u16, values: &[(u32, u32)]) -> Self {
        let data = values
            .iter()
            .flat_map(|(n, d)| n.to_le_bytes().into_iter().chain(d.to_le_bytes()))
            .collect();
        Self {
            tag,
            kind: RATIONAL,
            count: values.len() as u32,
            data,
        }
    }

    /// Bytes this entry needs outside the IFD, padded to a word boundary.
    fn external_len(&self) -> usize {
        if self.data.len() <= 4 {
            0
        } else {
            self.data.len() + self.data.len() % 2
        }
    }
}

fn ifd_len(entries: &[TiffEntry]) -> usize {
    2 + 12 * entries.len() + 4 + entries.iter().map(TiffEntry::external_len).sum::<usize>()
}

/// Append one IFD at absolute offset `start` (== `out.len()`), values that
/// do not fit in four bytes following the IFD.
fn write_ifd(out: &mut Vec<u8>, entries: &[TiffEntry]) {
    let start = out.len();
    let mut data_offset = start + 2 + 12 * entries.len() + 4;
    let mut external = Vec::new();

    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for entry in entries {
        out.extend_from_slice(&entry.tag.to_le_bytes());
        out.extend_from_slice(&entry.kind.to_le_bytes());
        out.extend_from_slice(&entry.count.to_le_bytes());
        if entry.data.len() <= 4 {
            let mut inline = entry.data.clone();
            inline.resize(4, 0);
            out.extend_from_slice(&inline);
        } else {
            out.extend_from_slice(&(data_offset as u32).to_le_bytes());
            external.extend_from_slice(&entry.data);
            if entry.data.len() % 2 == 1 {
                external.push(0);
            }
            data_offset += entry.external_len();
        }
    }
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&external);
}

/// A little-endian TIFF with IFD0 and, when `gps` is non-empty, a GPS IFD
/// linked from IFD0 through tag 0x8825.
pub fn tiff_with_ifds(ifd0: &[TiffEntry], gps: &[TiffEntry]) -> Vec<u8> {
    let mut primary = ifd0.to_vec();
    if !gps.is_empty() {
        // placeholder; the GPS IFD offset depends on IFD0's own length
        primary.push(TiffEntry::long(GPS_POINTER, 0));
        let gps_offset = 8 + ifd_len(&primary);
        if let Some(pointer) = primary.last_mut() {
            *pointer = TiffEntry::long(GPS_POINTER, gps_offset as u32);
        }
    }

    let mut out = b"II".to_vec();
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());
    write_ifd(&mut out, &primary);
    if !gps.is_empty() {
        write_ifd(&mut out, gps);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gps_pointer_targets_gps_ifd() {
        let tiff = tiff_with_ifds(
            &[TiffEntry::ascii(0x010F, "Canon")],
            &[TiffEntry::ascii(0x0001, "N")],
        );
        // IFD0: 2 entries + 6 bytes of "Canon\0" outside
        let gps_offset = 8 + 2 + 24 + 4 + 6;
        assert_eq!(&tiff[gps_offset..gps_offset + 2], &[1, 0]);
        let pointer = &tiff[8 + 2 + 12 + 8..8 + 2 + 12 + 12];
        assert_eq!(pointer, &(gps_offset as u32).to_le_bytes());
    }

    #[test]
    fn images_decode() {
        assert_eq!(image::load_from_memory(&png_bytes(3, 2)).unwrap().width(), 3);
        assert_eq!(image::load_from_memory(&jpeg_bytes(8, 4)).unwrap().height(), 4);
    }
}
