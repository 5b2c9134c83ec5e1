//! Windows ICO container with PNG-compressed entries.
//!
//! ```text
//! ┌──────────────┬─────────────────────────┬──────────────────────┐
//! │ header (6 B) │ directory (16 B each)   │ PNG payloads         │
//! │ 0, 1, count  │ w h 0 0 1 32 size offset│ in directory order   │
//! └──────────────┴─────────────────────────┴──────────────────────┘
//! ```
//!
//! All integers are little-endian. Width and height are stored in one byte,
//! so a 256-pixel entry is written as 0.

use super::FaviconError;

const HEADER_LEN: usize = 6;
const ENTRY_LEN: usize = 16;
const ICON_TYPE: u16 = 1;

/// One entry to embed: its nominal edge length and encoded PNG bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcoImage {
    pub size: u16,
    pub png: Vec<u8>,
}

/// Build an ICO file from `images`, in the given order.
///
/// Payloads are embedded as-is; nothing checks that they are PNG or that
/// their pixel size matches `size`.
pub fn encode(images: &[IcoImage]) -> Vec<u8> {
    let count = images.len();
    let payload_len: usize = images.iter().map(|img| img.png.len()).sum();
    let mut out = Vec::with_capacity(HEADER_LEN + ENTRY_LEN * count + payload_len);

    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&ICON_TYPE.to_le_bytes());
    out.extend_from_slice(&(count as u16).to_le_bytes());

    let mut offset = (HEADER_LEN + ENTRY_LEN * count) as u32;
    for img in images {
        let edge = (img.size % 256) as u8;
        let len = img.png.len() as u32;
        out.push(edge);
        out.push(edge);
        out.push(0); // palette colors
        out.push(0); // reserved
        out.extend_from_slice(&1u16.to_le_bytes()); // planes
        out.extend_from_slice(&32u16.to_le_bytes()); // bits per pixel
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());
        offset += len;
    }

    for img in images {
        out.extend_from_slice(&img.png);
    }
    out
}

/// A directory entry read back from an ICO file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcoEntry {
    /// Decoded width; a stored 0 reads as 256.
    pub width: u16,
    pub height: u16,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub size: u32,
    pub offset: u32,
}

impl IcoEntry {
    /// The entry's payload within `bytes`, if it lies inside the file.
    pub fn payload<'a>(&self, bytes: &'a [u8]) -> Option<&'a [u8]> {
        let start = self.offset as usize;
        let end = start.checked_add(self.size as usize)?;
        bytes.get(start..end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcoDirectory {
    pub entries: Vec<IcoEntry>,
}

impl IcoDirectory {
    pub fn parse(bytes: &[u8]) -> Result<Self, FaviconError> {
        let header = bytes
            .get(..HEADER_LEN)
            .ok_or_else(|| FaviconError::Decode("ICO header truncated".into()))?;
        let reserved = u16::from_le_bytes([header[0], header[1]]);
        let kind = u16::from_le_bytes([header[2], header[3]]);
        if reserved != 0 || kind != ICON_TYPE {
            return Err(FaviconError::Decode(format!(
                "not an icon file (reserved {reserved}, type {kind})"
            )));
        }
        let count = u16::from_le_bytes([header[4], header[5]]) as usize;

        let mut entries = Vec::with_capacity(count);
        for i in 0..count {
            let start = HEADER_LEN + i * ENTRY_LEN;
            let raw = bytes.get(start..start + ENTRY_LEN).ok_or_else(|| {
                FaviconError::Decode(format!("directory entry {i} truncated"))
            })?;
            let u16_at = |at: usize| u16::from_le_bytes([raw[at], raw[at + 1]]);
            let u32_at =
                |at: usize| u32::from_le_bytes([raw[at], raw[at + 1], raw[at + 2], raw[at + 3]]);
            let edge = |b: u8| if b == 0 { 256 } else { u16::from(b) };
            entries.push(IcoEntry {
                width: edge(raw[0]),
                height: edge(raw[1]),
                planes: u16_at(4),
                bits_per_pixel: u16_at(6),
                size: u32_at(8),
                offset: u32_at(12),
            });
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
