//! The metadata pipeline: one call, one fresh record.
//!
//! Fields are written in a fixed order and later writers win:
//!
//! 1. basic file facts from [`FileContext`]
//! 2. the full tag-service dump
//! 3. the GPS, thumbnail and orientation accessors (run concurrently)
//! 4. direct container scanning
//! 5. GPS normalization
//!
//! Tag-service failures are logged and skipped; the caller always gets a
//! record back.

use super::format::{format_date_minutes, format_file_size};
use super::gps::{DEFAULT_MAP_URL, normalize_gps};
use super::record::MetadataRecord;
use super::scan::scan_container;
use super::source::{GpsPosition, TagParseOptions, TagSource, TagSourceError};
use super::value::to_fixed;
use chrono::NaiveDateTime;

/// Everything known about the file before parsing it.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    pub file_name: &'a str,
    pub bytes: &'a [u8],
    /// MIME type as reported by the host, e.g. `image/jpeg`. May be empty.
    pub mime: &'a str,
    /// Last-modified time in local wall-clock time.
    pub modified: Option<NaiveDateTime>,
    /// Decoded pixel dimensions, when the host could decode the image.
    pub dimensions: Option<(u32, u32)>,
}

impl<'a> FileContext<'a> {
    pub fn new(file_name: &'a str, bytes: &'a [u8], mime: &'a str) -> Self {
        Self {
            file_name,
            bytes,
            mime,
            modified: None,
            dimensions: None,
        }
    }

    pub fn modified(mut self, modified: NaiveDateTime) -> Self {
        self.modified = Some(modified);
        self
    }

    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some((width, height));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataOptions {
    /// Ask the tag service for the thumbnail and orientation.
    pub include_thumbnail: bool,
    /// Map link template with `{lat}` and `{lng}` placeholders.
    pub map_url: String,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            include_thumbnail: true,
            map_url: DEFAULT_MAP_URL.to_string(),
        }
    }
}

/// Build the normalized record for one file.
pub fn extract_metadata(
    file: &FileContext,
    source: &impl TagSource,
    options: &MetadataOptions,
) -> MetadataRecord {
    let mut record = MetadataRecord::new();
    write_basic_fields(&mut record, file);

    match source.parse_all_tags(file.bytes, &TagParseOptions::all()) {
        Ok(Some(tags)) => {
            let total = tags.len();
            let mut merged = 0;
            for (key, raw) in tags {
                if record.merge_raw(key, raw) {
                    merged += 1;
                }
            }
            log::debug!("{}: merged {merged} of {total} parsed tags", file.file_name);
        }
        Ok(None) => log::debug!("{}: no tags found", file.file_name),
        Err(err) => log::debug!("{}: full parse failed: {err}", file.file_name),
    }

    let (gps, (thumbnail, orientation)) = rayon::join(
        || source.parse_gps(file.bytes),
        || {
            if options.include_thumbnail {
                rayon::join(
                    || source.parse_thumbnail(file.bytes),
                    || source.parse_orientation(file.bytes),
                )
            } else {
                (Ok(None), Ok(None))
            }
        },
    );
    if let Some(gps) = accessor_result(file, "GPS", gps) {
        write_gps_position(&mut record, gps);
    }
    if let Some(thumb) = accessor_result(file, "thumbnail", thumbnail) {
        record.insert(
            "ThumbnailImage",
            format!("Yes ({})", format_file_size(thumb.len() as u64)),
        );
    }
    if let Some(code) = accessor_result(file, "orientation", orientation).filter(|&c| c != 0) {
        record.insert("OrientationValue", code);
    }

    let report = scan_container(file.bytes);
    log::debug!("{}: container scan found {} fields", file.file_name, report.len());
    for (key, value) in report.into_fields() {
        record.insert(key, value);
    }

    normalize_gps(&mut record, &options.map_url);
    record
}

fn accessor_result<T>(
    file: &FileContext,
    what: &str,
    result: Result<Option<T>, TagSourceError>,
) -> Option<T> {
    result.unwrap_or_else(|err| {
        log::debug!("{}: {what} lookup failed: {err}", file.file_name);
        None
    })
}

fn write_basic_fields(record: &mut MetadataRecord, file: &FileContext) {
    let size = file.bytes.len() as u64;
    record.insert("FileName", file.file_name);
    record.insert("FileSize", format_file_size(size));
    record.insert("FileSizeBytes", format!("{size} bytes"));
    record.insert("FileType", file_type(file.mime));
    record.insert("MIMEType", file.mime);
    if let Some(modified) = &file.modified {
        record.insert("FileModifyDate", format_date_minutes(modified));
    }
    record.insert("FileExtension", file_extension(file.file_name));

    if let Some((width, height)) = file.dimensions {
        record.insert("ImageWidth", format!("{width} px"));
        record.insert("ImageHeight", format!("{height} px"));
        record.insert("ImageSize", format!("{width} × {height}"));
        let megapixels = f64::from(width) * f64::from(height) / 1_000_000.0;
        record.insert("Megapixels", format!("{} MP", to_fixed(megapixels, 2)));
    }
}

fn write_gps_position(record: &mut MetadataRecord, gps: GpsPosition) {
    if let Some(lat) = gps.latitude {
        record.insert("latitude", lat);
        record.insert("GPSLatitudeDecimal", to_fixed(lat, 6));
    }
    if let Some(lng) = gps.longitude {
        record.insert("longitude", lng);
        record.insert("GPSLongitudeDecimal", to_fixed(lng, 6));
    }
}

/// MIME subtype upper-cased, `"Unknown"` when there is none.
fn file_type(mime: &str) -> String {
    match mime.split('/').nth(1) {
        Some(sub) if !sub.is_empty() => sub.to_uppercase(),
        _ => "Unknown".to_string(),
    }
}

/// Last dot-separated segment of the name, upper-cased. A name without a dot
/// is its own extension.
fn file_extension(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::source::tests::{Call, MockTagSource};
    use crate::metadata::source::NoTagSource;
    use crate::metadata::value::{RawValue, TagValue};
    use crate::test_helpers::png_bytes;
    use chrono::NaiveDate;

    fn text<'a>(record: &'a MetadataRecord, key: &str) -> &'a str {
        record
            .get(key)
            .and_then(TagValue::as_text)
            .unwrap_or_else(|| panic!("{key} missing or not text in {record:?}"))
    }

    // =========================================================================
    // Basic fields
    // =========================================================================

    #[test]
    fn basic_fields_without_tags() {
        let bytes = vec![0u8; 1536];
        let file = FileContext::new("holiday.photo.jpg", &bytes, "image/jpeg")
            .modified(
                NaiveDate::from_ymd_opt(2024, 3, 9)
                    .unwrap()
                    .and_hms_opt(14, 5, 0)
                    .unwrap(),
            )
            .dimensions(4000, 3000);
        let record = extract_metadata(&file, &NoTagSource, &MetadataOptions::default());

        assert_eq!(text(&record, "FileName"), "holiday.photo.jpg");
        assert_eq!(text(&record, "FileSize"), "1.5 KB");
        assert_eq!(text(&record, "FileSizeBytes"), "1536 bytes");
        assert_eq!(text(&record, "FileType"), "JPEG");
        assert_eq!(text(&record, "MIMEType"), "image/jpeg");
        assert_eq!(text(&record, "FileModifyDate"), "Mar 9, 2024, 02:05 PM");
        assert_eq!(text(&record, "FileExtension"), "JPG");
        assert_eq!(text(&record, "ImageWidth"), "4000 px");
        assert_eq!(text(&record, "ImageSize"), "4000 × 3000");
        assert_eq!(text(&record, "Megapixels"), "12.00 MP");
        // zero bytes carry no recognizable container
        assert!(!record.contains_key("FileFormat"));
    }

    #[test]
    fn unknown_mime_and_dotless_name() {
        assert_eq!(file_type(""), "Unknown");
        assert_eq!(file_type("image/"), "Unknown");
        assert_eq!(file_type("image/webp"), "WEBP");
        assert_eq!(file_extension("README"), "README");
        assert_eq!(file_extension("a.b.tiff"), "TIFF");
    }

    // =========================================================================
    // Tag service merge
    // =========================================================================

    #[test]
    fn parsed_tags_are_merged_and_converted() {
        let source = MockTagSource::with_tags(vec![
            ("Make", RawValue::Text("Canon".into())),
            ("Software", RawValue::Text(String::new())),
            ("Nothing", RawValue::Null),
            ("MakerNote", RawValue::Bytes(vec![1, 2, 3])),
            ("FNumber", RawValue::Float(2.8)),
        ]);
        let file = FileContext::new("a.jpg", &[], "image/jpeg");
        let record = extract_metadata(&file, &source, &MetadataOptions::default());

        assert_eq!(text(&record, "Make"), "Canon");
        assert!(!record.contains_key("Software"));
        assert!(!record.contains_key("Nothing"));
        assert_eq!(record.get("MakerNote"), Some(&TagValue::Binary));
        assert_eq!(record.get("FNumber").and_then(TagValue::as_f64), Some(2.8));
        assert_eq!(*source.last_options.lock().unwrap(), Some(TagParseOptions::all()));
    }

    #[test]
    fn accessors_write_their_fields() {
        let source = MockTagSource::new()
            .gps(Some(40.446111), Some(-79.982222))
            .thumbnail(vec![0; 2048])
            .orientation(6);
        let file = FileContext::new("a.jpg", &[], "image/jpeg");
        let record = extract_metadata(&file, &source, &MetadataOptions::default());

        assert_eq!(record.get("latitude").and_then(TagValue::as_f64), Some(40.446111));
        assert_eq!(text(&record, "GPSLatitudeDecimal"), "40.446111");
        assert_eq!(text(&record, "GPSLongitudeDecimal"), "-79.982222");
        assert_eq!(text(&record, "GPSCoordinates"), "40.446111, -79.982222");
        assert_eq!(text(&record, "ThumbnailImage"), "Yes (2 KB)");
        assert_eq!(record.get("OrientationValue"), Some(&TagValue::from(6u16)));
    }

    #[test]
    fn failing_calls_are_isolated() {
        let source = MockTagSource::with_tags(vec![("Make", RawValue::Text("Sony".into()))])
            .orientation(3)
            .failing(Call::Gps)
            .failing(Call::Thumbnail);
        let file = FileContext::new("a.jpg", &[], "image/jpeg");
        let record = extract_metadata(&file, &source, &MetadataOptions::default());

        assert_eq!(text(&record, "Make"), "Sony");
        assert!(!record.contains_key("GPSLatitudeDecimal"));
        assert!(!record.contains_key("ThumbnailImage"));
        assert_eq!(record.get("OrientationValue"), Some(&TagValue::from(3u16)));

        assert_eq!(source.get_calls().len(), 4);
    }

    #[test]
    fn full_parse_failure_still_returns_record() {
        let source = MockTagSource::new().failing(Call::AllTags);
        let file = FileContext::new("a.png", &[], "image/png");
        let record = extract_metadata(&file, &source, &MetadataOptions::default());
        assert_eq!(text(&record, "FileType"), "PNG");
    }

    #[test]
    fn zero_orientation_is_not_written() {
        let source = MockTagSource::new().orientation(0);
        let file = FileContext::new("a.jpg", &[], "image/jpeg");
        let record = extract_metadata(&file, &source, &MetadataOptions::default());
        assert!(!record.contains_key("OrientationValue"));
    }

    #[test]
    fn thumbnail_lookups_can_be_disabled() {
        let source = MockTagSource::new().thumbnail(vec![0; 10]).orientation(6);
        let options = MetadataOptions {
            include_thumbnail: false,
            ..MetadataOptions::default()
        };
        let file = FileContext::new("a.jpg", &[], "image/jpeg");
        let record = extract_metadata(&file, &source, &options);
        assert!(!record.contains_key("ThumbnailImage"));
        assert_eq!(source.get_calls(), vec![Call::AllTags, Call::Gps]);
    }

    // =========================================================================
    // Ordering and scan merge
    // =========================================================================

    #[test]
    fn scan_fields_override_parsed_tags() {
        let png = png_bytes(3, 2);
        let source = MockTagSource::with_tags(vec![
            ("FileFormat", RawValue::Text("bogus".into())),
            ("PNGBitDepth", RawValue::Int(1)),
        ]);
        let file = FileContext::new("tiny.png", &png, "image/png");
        let record = extract_metadata(&file, &source, &MetadataOptions::default());

        assert_eq!(text(&record, "FileFormat"), "PNG");
        assert_eq!(text(&record, "PNGBitDepth"), "8 bits per channel");
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(&keys[..3], &["FileName", "FileSize", "FileSizeBytes"]);
        // overridden keys keep their first position
        let format_pos = keys.iter().position(|k| *k == "FileFormat").unwrap();
        let depth_pos = keys.iter().position(|k| *k == "PNGBitDepth").unwrap();
        assert!(format_pos < depth_pos);
    }

    #[test]
    fn gps_from_dms_tags_gets_custom_map_link() {
        let source = MockTagSource::with_tags(vec![
            (
                "GPSLatitude",
                RawValue::List(vec![RawValue::Int(51), RawValue::Int(30), RawValue::Int(0)]),
            ),
            ("GPSLatitudeRef", RawValue::Text("N".into())),
            (
                "GPSLongitude",
                RawValue::List(vec![RawValue::Int(0), RawValue::Int(7), RawValue::Int(30)]),
            ),
            ("GPSLongitudeRef", RawValue::Text("W".into())),
        ]);
        let options = MetadataOptions {
            map_url: "geo:{lat},{lng}".into(),
            ..MetadataOptions::default()
        };
        let file = FileContext::new("a.jpg", &[], "image/jpeg");
        let record = extract_metadata(&file, &source, &options);
        assert_eq!(text(&record, "GPSCoordinates"), "51.500000, -0.125000");
        assert_eq!(text(&record, "GPSMapLink"), "geo:51.5,-0.125");
    }
}
