//! External tag service seam.
//!
//! The normalizer never parses EXIF/IPTC/XMP itself; it asks a [`TagSource`]
//! for a full tag dump plus three specialized lookups (GPS, thumbnail,
//! orientation). The accessors are called concurrently, so implementations
//! must be `Sync`.
//!
//! | Implementation | Backing |
//! |---|---|
//! | [`ExifTagSource`](super::exif_source::ExifTagSource) | `kamadak-exif` |
//! | [`NoTagSource`] | nothing; every call reports [`TagSourceError::Unavailable`] |

use super::value::RawValue;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagSourceError {
    #[error("tag service unavailable")]
    Unavailable,
    #[error("tag parse failed: {0}")]
    Parse(String),
}

/// Segment families to request, plus value translation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagParseOptions {
    pub tiff: bool,
    pub exif: bool,
    pub gps: bool,
    pub ifd0: bool,
    pub ifd1: bool,
    pub interop: bool,
    pub iptc: bool,
    pub xmp: bool,
    pub icc: bool,
    pub maker_note: bool,
    pub user_comment: bool,
    /// Replace enumerated codes with their descriptions where the service
    /// knows them.
    pub translate_values: bool,
}

impl TagParseOptions {
    /// Every family with value translation enabled.
    pub fn all() -> Self {
        Self {
            tiff: true,
            exif: true,
            gps: true,
            ifd0: true,
            ifd1: true,
            interop: true,
            iptc: true,
            xmp: true,
            icc: true,
            maker_note: true,
            user_comment: true,
            translate_values: true,
        }
    }
}

/// Decimal position reported by the dedicated GPS accessor. Either axis may
/// be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GpsPosition {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Parsed tags in service order. `Ok(None)` means the file carries no tags.
pub type TagList = Vec<(String, RawValue)>;

pub trait TagSource: Sync {
    /// Parse every tag in the requested families.
    fn parse_all_tags(
        &self,
        bytes: &[u8],
        options: &TagParseOptions,
    ) -> Result<Option<TagList>, TagSourceError>;

    /// Decimal GPS position.
    fn parse_gps(&self, bytes: &[u8]) -> Result<Option<GpsPosition>, TagSourceError>;

    /// Embedded thumbnail bytes.
    fn parse_thumbnail(&self, bytes: &[u8]) -> Result<Option<Vec<u8>>, TagSourceError>;

    /// EXIF orientation code (1–8).
    fn parse_orientation(&self, bytes: &[u8]) -> Result<Option<u16>, TagSourceError>;
}

/// Source for running without a tag service: only container scanning
/// contributes fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTagSource;

impl TagSource for NoTagSource {
    fn parse_all_tags(
        &self,
        _bytes: &[u8],
        _options: &TagParseOptions,
    ) -> Result<Option<TagList>, TagSourceError> {
        Err(TagSourceError::Unavailable)
    }

    fn parse_gps(&self, _bytes: &[u8]) -> Result<Option<GpsPosition>, TagSourceError> {
        Err(TagSourceError::Unavailable)
    }

    fn parse_thumbnail(&self, _bytes: &[u8]) -> Result<Option<Vec<u8>>, TagSourceError> {
        Err(TagSourceError::Unavailable)
    }

    fn parse_orientation(&self, _bytes: &[u8]) -> Result<Option<u16>, TagSourceError> {
        Err(TagSourceError::Unavailable)
    }
}
