//! GPS normalization.
//!
//! Decimal coordinates are taken from the first available source:
//!
//! 1. `GPSLatitudeDecimal` / `GPSLongitudeDecimal` (written from the tag
//!    service's dedicated GPS accessor)
//! 2. `latitude` / `longitude`
//! 3. `GPSLatitude` / `GPSLongitude` converted from degrees-minutes-seconds,
//!    signed by `GPSLatitudeRef` / `GPSLongitudeRef`
//!
//! When both axes resolve, the record gains 6-decimal strings, a combined
//! `GPSCoordinates` field and a `GPSMapLink`.

use super::record::MetadataRecord;
use super::value::{Scalar, TagValue, number_to_string, to_fixed};
use regex::Regex;
use std::sync::LazyLock;

/// Default map link; `{lat}` and `{lng}` are replaced by the coordinates.
pub const DEFAULT_MAP_URL: &str = "https://www.google.com/maps?q={lat},{lng}";

/// Half-width in degrees of the bounding box around an embedded map marker.
const EMBED_MARGIN: f64 = 0.005;

/// `D° M' S"` and space-separated variants.
static DMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\d+)[°\s]+(\d+)['\s]+(\d+\.?\d*)"#).expect("valid DMS pattern")
});

/// Leading decimal number, as accepted by lenient float parsing.
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid number pattern")
});

/// Parse the numeric prefix of a string, ignoring leading whitespace and any
/// trailing text (`"40.5 N"` → `40.5`).
pub fn parse_leading_float(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse().ok())
}

fn scalar_number(value: &Scalar) -> Option<f64> {
    match value {
        Scalar::Text(s) => parse_leading_float(s),
        other => other.as_f64(),
    }
}

fn is_negative_ref(reference: Option<&TagValue>) -> bool {
    matches!(
        reference.and_then(TagValue::as_text),
        Some("S" | "W" | "South" | "West")
    )
}

/// Convert a coordinate to signed decimal degrees.
///
/// Arrays are `[degrees, minutes, seconds]` with missing parts as zero and
/// are negated for southern/western references. Plain numbers are returned
/// as-is. Strings are matched as DMS, falling back to their numeric prefix.
pub fn convert_to_decimal(coord: &TagValue, reference: Option<&TagValue>) -> Option<f64> {
    let (degrees, minutes, seconds) = match coord {
        TagValue::Array(parts) => {
            let part = |i: usize| parts.get(i).and_then(scalar_number);
            let degrees = part(0)?;
            (
                degrees,
                part(1).unwrap_or(0.0),
                part(2).unwrap_or(0.0),
            )
        }
        TagValue::Scalar(Scalar::Text(text)) => match DMS.captures(text) {
            Some(caps) => {
                let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<f64>().ok());
                (num(1)?, num(2)?, num(3)?)
            }
            None => return parse_leading_float(text),
        },
        TagValue::Scalar(s) => return s.as_f64(),
        TagValue::Date(_) | TagValue::Binary => return None,
    };

    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    Some(if is_negative_ref(reference) {
        -decimal
    } else {
        decimal
    })
}

fn numeric(value: &TagValue) -> Option<f64> {
    match value {
        TagValue::Scalar(s) => scalar_number(s),
        _ => None,
    }
}

fn resolve_axis(
    record: &MetadataRecord,
    decimal_keys: [&str; 2],
    dms: &str,
    reference: &str,
) -> Option<f64> {
    let value = match record.first_truthy(&decimal_keys) {
        Some(value) => numeric(value),
        None => record
            .get(dms)
            .filter(|v| v.is_truthy())
            .and_then(|v| convert_to_decimal(v, record.get(reference))),
    };
    value.filter(|n| !n.is_nan())
}

/// Fill `{lat}` / `{lng}` in a map URL template.
pub fn map_link(template: &str, lat: f64, lng: f64) -> String {
    template
        .replace("{lat}", &number_to_string(lat))
        .replace("{lng}", &number_to_string(lng))
}

/// OpenStreetMap embed URL centered on a point.
pub fn osm_embed_url(lat: f64, lng: f64) -> String {
    format!(
        "https://www.openstreetmap.org/export/embed.html?bbox={}%2C{}%2C{}%2C{}&layer=mapnik&marker={}%2C{}",
        number_to_string(lng - EMBED_MARGIN),
        number_to_string(lat - EMBED_MARGIN),
        number_to_string(lng + EMBED_MARGIN),
        number_to_string(lat + EMBED_MARGIN),
        number_to_string(lat),
        number_to_string(lng),
    )
}

/// Normalized decimal position of a record, if it has one.
pub fn coordinates(record: &MetadataRecord) -> Option<(f64, f64)> {
    let lat = record.get("GPSLatitudeDecimal").and_then(numeric)?;
    let lng = record.get("GPSLongitudeDecimal").and_then(numeric)?;
    Some((lat, lng))
}

/// Derive decimal coordinates, the map link and formatted altitude.
pub fn normalize_gps(record: &mut MetadataRecord, map_url: &str) {
    let lat = resolve_axis(
        record,
        ["GPSLatitudeDecimal", "latitude"],
        "GPSLatitude",
        "GPSLatitudeRef",
    );
    let lng = resolve_axis(
        record,
        ["GPSLongitudeDecimal", "longitude"],
        "GPSLongitude",
        "GPSLongitudeRef",
    );

    if let (Some(lat), Some(lng)) = (lat, lng) {
        let (lat_text, lng_text) = (to_fixed(lat, 6), to_fixed(lng, 6));
        record.insert("GPSCoordinates", format!("{lat_text}, {lng_text}"));
        record.insert("GPSLatitudeDecimal", lat_text);
        record.insert("GPSLongitudeDecimal", lng_text);
        record.insert("GPSMapLink", map_link(map_url, lat, lng));
        log::debug!("GPS position resolved to {lat}, {lng}");
    }

    if let Some(altitude) = record.get("GPSAltitude").and_then(TagValue::as_f64) {
        let below_sea_level = record.get("GPSAltitudeRef").is_some_and(|r| {
            r.as_f64() == Some(1.0) || matches!(r.as_text(), Some("1" | "Below Sea Level"))
        });
        let altitude = if below_sea_level { -altitude } else { altitude };
        record.insert(
            "GPSAltitudeFormatted",
            format!("{} meters", to_fixed(altitude, 1)),
        );
    }
}
