//! [`TagSource`] backed by `kamadak-exif`.
//!
//! Reads the EXIF block from any container the library understands (JPEG,
//! TIFF, PNG, WebP, HEIF). Tag names follow the library, with the few
//! conventional aliases below so downstream lookups (`ISO`, `CreateDate`,
//! `ModifyDate`, …) find them:
//!
//! | Library name | Stored as |
//! |---|---|
//! | `PhotographicSensitivity` | `ISO` |
//! | `DateTime` | `ModifyDate` |
//! | `DateTimeDigitized` | `CreateDate` |
//! | `PixelXDimension` / `PixelYDimension` | `ExifImageWidth` / `ExifImageHeight` |
//!
//! Enumerated codes (orientation, flash, …) stay numeric; they are turned
//! into text by [`format_value`](super::format_value). Value translation only
//! applies to short `UNDEFINED` fields such as `ExifVersion`.

use super::source::{GpsPosition, TagList, TagParseOptions, TagSource, TagSourceError};
use super::value::RawValue;
use chrono::NaiveDateTime;
use exif::{Context, Exif, Field, In, Reader, Tag, Value};
use std::collections::HashSet;
use std::io::Cursor;

const TAG_IPTC: u16 = 33723;
const TAG_XMP: u16 = 700;
const TAG_ICC: u16 = 34675;
/// `UNDEFINED` payloads longer than this are treated as binary blobs.
const MAX_TRANSLATED_UNDEFINED: usize = 64;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExifTagSource;

impl ExifTagSource {
    pub fn new() -> Self {
        Self
    }

    /// Parse the EXIF block. `Ok(None)` when the container has none.
    fn read(bytes: &[u8]) -> Result<Option<Exif>, TagSourceError> {
        match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
            Ok(exif) => Ok(Some(exif)),
            Err(exif::Error::NotFound(_)) => Ok(None),
            Err(err) => Err(TagSourceError::Parse(err.to_string())),
        }
    }
}

impl TagSource for ExifTagSource {
    fn parse_all_tags(
        &self,
        bytes: &[u8],
        options: &TagParseOptions,
    ) -> Result<Option<TagList>, TagSourceError> {
        let Some(exif) = Self::read(bytes)? else {
            return Ok(None);
        };

        let mut seen = HashSet::new();
        let mut tags = Vec::new();
        for field in exif.fields() {
            if !wanted(field, options) {
                continue;
            }
            let key = tag_name(field.tag);
            // primary IFD fields come first and win over thumbnail duplicates
            if !seen.insert(key.clone()) {
                continue;
            }
            tags.push((key, convert_field(field, options.translate_values)));
        }
        log::debug!("EXIF parse produced {} tags", tags.len());
        Ok(Some(tags))
    }

    fn parse_gps(&self, bytes: &[u8]) -> Result<Option<GpsPosition>, TagSourceError> {
        let Some(exif) = Self::read(bytes)? else {
            return Ok(None);
        };
        let axis = |value: Tag, reference: Tag| {
            let field = exif.get_field(value, In::PRIMARY)?;
            let Value::Rational(parts) = &field.value else {
                return None;
            };
            let part = |i: usize| parts.get(i).map(|r| r.to_f64()).unwrap_or(0.0);
            let decimal = parts.first()?.to_f64() + part(1) / 60.0 + part(2) / 3600.0;
            let negative = exif
                .get_field(reference, In::PRIMARY)
                .and_then(|f| ascii(&f.value))
                .is_some_and(|r| matches!(r.as_str(), "S" | "W"));
            Some(if negative { -decimal } else { decimal })
        };

        let position = GpsPosition {
            latitude: axis(Tag::GPSLatitude, Tag::GPSLatitudeRef),
            longitude: axis(Tag::GPSLongitude, Tag::GPSLongitudeRef),
        };
        Ok((position.latitude.is_some() || position.longitude.is_some()).then_some(position))
    }

    fn parse_thumbnail(&self, bytes: &[u8]) -> Result<Option<Vec<u8>>, TagSourceError> {
        let Some(exif) = Self::read(bytes)? else {
            return Ok(None);
        };
        let uint = |tag: Tag| {
            exif.get_field(tag, In::THUMBNAIL)
                .and_then(|f| f.value.get_uint(0))
                .map(|v| v as usize)
        };
        let (Some(offset), Some(length)) = (
            uint(Tag::JPEGInterchangeFormat),
            uint(Tag::JPEGInterchangeFormatLength),
        ) else {
            return Ok(None);
        };
        Ok(offset
            .checked_add(length)
            .and_then(|end| exif.buf().get(offset..end))
            .map(<[u8]>::to_vec))
    }

    fn parse_orientation(&self, bytes: &[u8]) -> Result<Option<u16>, TagSourceError> {
        let Some(exif) = Self::read(bytes)? else {
            return Ok(None);
        };
        Ok(exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|f| f.value.get_uint(0))
            .and_then(|v| u16::try_from(v).ok()))
    }
}

/// Whether a field belongs to one of the requested families.
fn wanted(field: &Field, options: &TagParseOptions) -> bool {
    let number = field.tag.number();
    if field.tag == Tag::MakerNote {
        return options.maker_note;
    }
    if field.tag == Tag::UserComment {
        return options.user_comment;
    }
    match number {
        TAG_IPTC => return options.iptc,
        TAG_XMP => return options.xmp,
        TAG_ICC => return options.icc,
        _ => {}
    }
    if field.ifd_num == In::THUMBNAIL {
        return options.ifd1;
    }
    match field.tag.context() {
        Context::Tiff => options.tiff && options.ifd0,
        Context::Exif => options.exif,
        Context::Gps => options.gps,
        Context::Interop => options.interop,
        _ => false,
    }
}

/// Record key for a tag.
fn tag_name(tag: Tag) -> String {
    match tag {
        Tag::PhotographicSensitivity => "ISO".to_string(),
        Tag::DateTime => "ModifyDate".to_string(),
        Tag::DateTimeDigitized => "CreateDate".to_string(),
        Tag::PixelXDimension => "ExifImageWidth".to_string(),
        Tag::PixelYDimension => "ExifImageHeight".to_string(),
        _ => match tag.number() {
            TAG_IPTC => "IPTC".to_string(),
            TAG_XMP => "XMP".to_string(),
            TAG_ICC => "ICC_Profile".to_string(),
            // Display falls back to the debug form for unknown tags
            n if tag.description().is_none() => format!("UnknownTag{n:#06x}"),
            _ => tag.to_string(),
        },
    }
}

fn is_date_tag(tag: Tag) -> bool {
    matches!(
        tag,
        Tag::DateTime | Tag::DateTimeOriginal | Tag::DateTimeDigitized
    )
}

fn ascii(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(strings) => strings
            .first()
            .map(|raw| String::from_utf8_lossy(raw).trim_matches('\0').trim().to_string()),
        _ => None,
    }
}

fn numbers<T: Copy>(values: &[T], convert: impl Fn(T) -> RawValue) -> RawValue {
    match values {
        [] => RawValue::Null,
        [single] => convert(*single),
        many => RawValue::List(many.iter().map(|v| convert(*v)).collect()),
    }
}

fn convert_field(field: &Field, translate: bool) -> RawValue {
    match &field.value {
        Value::Ascii(strings) if strings.len() > 1 => RawValue::List(
            strings
                .iter()
                .map(|s| RawValue::Text(String::from_utf8_lossy(s).trim_matches('\0').to_string()))
                .collect(),
        ),
        Value::Ascii(_) => {
            let text = ascii(&field.value).unwrap_or_default();
            if is_date_tag(field.tag) {
                if let Ok(date) = NaiveDateTime::parse_from_str(&text, "%Y:%m:%d %H:%M:%S") {
                    return RawValue::Date(date);
                }
            }
            RawValue::Text(text)
        }
        Value::Byte(v) => numbers(v, |n| RawValue::Int(i64::from(n))),
        Value::Short(v) => numbers(v, |n| RawValue::Int(i64::from(n))),
        Value::Long(v) => numbers(v, |n| RawValue::Int(i64::from(n))),
        Value::SByte(v) => numbers(v, |n| RawValue::Int(i64::from(n))),
        Value::SShort(v) => numbers(v, |n| RawValue::Int(i64::from(n))),
        Value::SLong(v) => numbers(v, |n| RawValue::Int(i64::from(n))),
        Value::Rational(v) => numbers(v, |r| RawValue::Float(r.to_f64())),
        Value::SRational(v) => numbers(v, |r| RawValue::Float(r.to_f64())),
        Value::Float(v) => numbers(v, |f| RawValue::Float(f64::from(f))),
        Value::Double(v) => numbers(v, RawValue::Float),
        Value::Undefined(bytes, _) => {
            let textual = field.tag == Tag::UserComment
                || (translate && bytes.len() <= MAX_TRANSLATED_UNDEFINED);
            if textual && field.tag != Tag::MakerNote {
                RawValue::Text(field.display_value().to_string())
            } else {
                RawValue::Bytes(bytes.clone())
            }
        }
        _ => RawValue::Null,
    }
}
