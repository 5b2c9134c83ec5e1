//! Direct byte-level container scanning.
//!
//! Complements the external tag service with facts read straight from the
//! container structure. The format is chosen by magic number:
//!
//! | Magic | Format | Module |
//! |---|---|---|
//! | `FF D8` | JPEG | [`jpeg`] — marker walk, JFIF, SOF, tables, APP13 IPTC |
//! | `89 50 4E 47` | PNG | [`png`] — IHDR + ancillary chunk walk |
//! | `RIFF` … `WEBP` | WebP | [`webp`] — RIFF size, VP8/VP8L/VP8X |
//! | `GIF` | GIF | [`gif`] — logical screen descriptor |
//! | `BM` | BMP | [`bmp`] — file and info headers |
//! | `II` / `MM` | TIFF | [`tiff`] — byte order, IPTC from the IFD chain |
//!
//! Every read goes through [`ByteReader`]; a short buffer ends the scan of
//! that format and keeps whatever fields were already collected.

pub mod bmp;
pub mod gif;
pub mod iptc;
pub mod jpeg;
pub mod png;
pub mod reader;
pub mod tiff;
pub mod webp;

pub use reader::{ByteReader, ScanError};

use super::value::{Scalar, TagValue};

/// Container formats recognised by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
    Bmp,
    Tiff { big_endian: bool },
}

impl ContainerFormat {
    /// Identify a buffer by its magic number.
    ///
    /// Checks run in a fixed order and each needs its own bytes; a buffer too
    /// short for a check is an error rather than a non-match.
    pub fn detect(r: &ByteReader) -> Result<Option<Self>, ScanError> {
        let first = r.u16_be(0)?;
        if first == 0xFFD8 {
            return Ok(Some(Self::Jpeg));
        }
        let magic = r.u32_be(0)?;
        if magic == 0x8950_4E47 {
            return Ok(Some(Self::Png));
        }
        if magic == 0x5249_4646 {
            return Ok((r.u32_be(8)? == 0x5745_4250).then_some(Self::WebP));
        }
        if r.bytes(0, 3)? == b"GIF" {
            return Ok(Some(Self::Gif));
        }
        if first == 0x424D {
            return Ok(Some(Self::Bmp));
        }
        if first == 0x4949 || first == 0x4D4D {
            return Ok(Some(Self::Tiff {
                big_endian: first == 0x4D4D,
            }));
        }
        Ok(None)
    }

    /// Value written to `FileFormat`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::WebP => "WebP",
            Self::Gif => "GIF",
            Self::Bmp => "BMP",
            Self::Tiff { .. } => "TIFF",
        }
    }
}

/// Ordered fields produced by one container scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    fields: Vec<(&'static str, TagValue)>,
}

impl ScanReport {
    pub(crate) fn set(&mut self, key: &'static str, value: impl Into<TagValue>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub(crate) fn set_flag(&mut self, key: &'static str, present: bool) {
        self.set(key, if present { "Yes" } else { "No" });
    }

    /// Add one to a counter field, starting from zero.
    pub(crate) fn increment(&mut self, key: &'static str) {
        let current = match self.get(key) {
            Some(TagValue::Scalar(Scalar::Int(n))) => *n,
            _ => 0,
        };
        self.set(key, current + 1);
    }

    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &TagValue)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> Vec<(&'static str, TagValue)> {
        self.fields
    }
}

/// Scan a file's bytes. Never fails; malformed input yields fewer fields.
pub fn scan_container(bytes: &[u8]) -> ScanReport {
    let r = ByteReader::new(bytes);
    let mut report = ScanReport::default();
    match ContainerFormat::detect(&r) {
        Ok(Some(format)) => {
            report.set("FileFormat", format.name());
            match format {
                ContainerFormat::Jpeg => jpeg::scan(&r, &mut report),
                ContainerFormat::Png => png::scan(&r, &mut report),
                ContainerFormat::WebP => webp::scan(&r, &mut report),
                ContainerFormat::Gif => gif::scan(&r, &mut report),
                ContainerFormat::Bmp => bmp::scan(&r, &mut report),
                ContainerFormat::Tiff { big_endian } => tiff::scan(&r, big_endian, &mut report),
            }
        }
        Ok(None) => log::debug!("no known container signature in {} bytes", bytes.len()),
        Err(err) => log::debug!("container detection aborted: {err}"),
    }
    report
}
