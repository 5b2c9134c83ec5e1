//! At-a-glance facts shown above the full field listing.

use super::format::{format_exif_date, format_exposure};
use super::record::MetadataRecord;
use super::value::{Scalar, TagValue, number_to_string};
use serde::Serialize;

/// Placeholder for a missing summary fact.
pub const MISSING: &str = "-";

const DATE_KEYS: [&str; 4] = ["DateTimeOriginal", "CreateDate", "DateTime", "ModifyDate"];
const LENS_KEYS: [&str; 3] = ["LensModel", "Lens", "LensInfo"];
const ISO_KEYS: [&str; 2] = ["ISO", "ISOSpeedRatings"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataSummary {
    pub camera: String,
    pub date_taken: String,
    pub lens: String,
    /// `f/2.8 • 1/250s • ISO 200 • 35mm`
    pub settings: String,
}

impl MetadataSummary {
    pub fn from_record(record: &MetadataRecord) -> Self {
        let text = |key: &str| {
            record
                .get(key)
                .filter(|v| v.is_truthy())
                .map(TagValue::to_string)
                .unwrap_or_default()
        };
        let camera = format!("{} {}", text("Make"), text("Model")).trim().to_string();

        let date_taken = record
            .first_truthy(&DATE_KEYS)
            .map(format_exif_date)
            .unwrap_or_else(|| MISSING.to_string());

        let lens = record
            .first_truthy(&LENS_KEYS)
            .map(TagValue::to_string)
            .unwrap_or_else(|| MISSING.to_string());

        Self {
            camera: or_missing(camera),
            date_taken,
            lens,
            settings: or_missing(settings_line(record)),
        }
    }
}

fn or_missing(text: String) -> String {
    if text.is_empty() {
        MISSING.to_string()
    } else {
        text
    }
}

/// Aperture, shutter, ISO and focal length, joined with bullets. Numbers get
/// their units; pre-formatted text passes through.
fn settings_line(record: &MetadataRecord) -> String {
    let truthy = |key: &str| record.get(key).filter(|v| v.is_truthy());

    let aperture = truthy("FNumber").map(|v| match v.as_f64() {
        Some(n) => format!("f/{}", number_to_string(n)),
        None => v.to_string(),
    });
    let exposure = truthy("ExposureTime").map(|v| match v {
        TagValue::Scalar(s) => format_exposure(s),
        other => other.to_string(),
    });
    let iso = record
        .first_truthy(&ISO_KEYS)
        .map(|v| format!("ISO {v}"));
    let focal = truthy("FocalLength").map(|v| match v {
        TagValue::Scalar(s @ (Scalar::Int(_) | Scalar::Float(_))) => format!("{s}mm"),
        other => other.to_string(),
    });

    [aperture, exposure, iso, focal]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" • ")
}
