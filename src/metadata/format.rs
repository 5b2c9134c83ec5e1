//! Human-readable rendering of metadata fields.
//!
//! [`format_value`] applies, in order:
//!
//! 1. enumeration tables (`Orientation`, `Flash`, `MeteringMode`, …) when the
//!    value is one of the table's integer codes
//! 2. date values
//! 3. per-key unit formatting (exposure, f-number, focal length, resolution,
//!    exposure compensation)
//! 4. element-wise formatting of arrays, joined with `", "`
//!
//! Anything else is rendered as-is.

use super::value::{Scalar, TagValue, number_to_string, to_fixed};
use chrono::NaiveDateTime;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// `YYYY:MM:DD HH:MM:SS` as written by cameras, anywhere in the string.
static EXIF_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4}):(\d{2}):(\d{2})\s+(\d{2}):(\d{2}):(\d{2})").expect("valid EXIF date pattern")
});

/// Substrings marking a field as personally identifying.
const SENSITIVE_PATTERNS: [&str; 8] = [
    "serial",
    "gpslatitude",
    "gpslongitude",
    "latitude",
    "longitude",
    "owner",
    "author",
    "artist",
];

// ============================================================================
// Display names
// ============================================================================

/// Curated display name for a well-known key.
pub fn friendly_name(key: &str) -> Option<&'static str> {
    Some(match key {
        // basic
        "ImageWidth" => "Image Width",
        "ImageHeight" => "Image Height",
        "ImageSize" => "Image Size",
        "Megapixels" => "Megapixels",
        "BitDepth" => "Bit Depth",
        "ColorType" => "Color Type",
        "BitsPerSample" => "Bits Per Sample",
        "SamplesPerPixel" => "Samples Per Pixel",
        // camera
        "Make" => "Camera Make",
        "Model" => "Camera Model",
        "LensMake" => "Lens Manufacturer",
        "LensModel" => "Lens Model",
        "LensInfo" => "Lens Info",
        "Lens" => "Lens",
        "LensSerialNumber" => "Lens Serial Number",
        "SerialNumber" | "CameraSerialNumber" => "Camera Serial Number",
        "InternalSerialNumber" => "Internal Serial Number",
        "BodySerialNumber" => "Body Serial Number",
        "Software" => "Software",
        "ProcessingSoftware" => "Processing Software",
        "Artist" => "Artist/Photographer",
        "Copyright" => "Copyright",
        "ImageDescription" => "Image Description",
        "UserComment" => "User Comment",
        "OwnerName" => "Owner Name",
        "CameraOwnerName" => "Camera Owner",
        // exposure
        "ExposureTime" => "Shutter Speed",
        "ShutterSpeedValue" => "Shutter Speed Value",
        "FNumber" => "Aperture (f-stop)",
        "ApertureValue" => "Aperture Value",
        "ISO" => "ISO Speed",
        "ISOSpeedRatings" => "ISO Speed Ratings",
        "PhotographicSensitivity" => "Photographic Sensitivity",
        "ExposureProgram" => "Exposure Program",
        "ExposureMode" => "Exposure Mode",
        "ExposureCompensation" => "Exposure Compensation",
        "ExposureBiasValue" => "Exposure Bias",
        "MeteringMode" => "Metering Mode",
        "LightSource" => "Light Source",
        "BrightnessValue" => "Brightness",
        // flash
        "Flash" => "Flash",
        "FlashMode" => "Flash Mode",
        "FlashEnergy" => "Flash Energy",
        "FlashpixVersion" => "FlashPix Version",
        // focus and lens
        "FocalLength" => "Focal Length",
        "FocalLengthIn35mmFormat" => "Focal Length (35mm)",
        "FocalPlaneXResolution" => "Focal Plane X Resolution",
        "FocalPlaneYResolution" => "Focal Plane Y Resolution",
        "FocalPlaneResolutionUnit" => "Focal Plane Resolution Unit",
        "SubjectDistance" => "Subject Distance",
        "SubjectDistanceRange" => "Subject Distance Range",
        "MaxApertureValue" => "Max Aperture",
        "FocusMode" => "Focus Mode",
        "AFAreaMode" => "AF Area Mode",
        // color
        "WhiteBalance" => "White Balance",
        "WhiteBalanceMode" => "White Balance Mode",
        "ColorSpace" => "Color Space",
        "Contrast" => "Contrast",
        "Saturation" => "Saturation",
        "Sharpness" => "Sharpness",
        "DigitalZoomRatio" => "Digital Zoom",
        "SceneCaptureType" => "Scene Capture Type",
        "SceneType" => "Scene Type",
        "GainControl" => "Gain Control",
        // date and time
        "DateTimeOriginal" => "Date Taken",
        "CreateDate" => "Date Created",
        "ModifyDate" => "Date Modified",
        "DateTime" => "Date/Time",
        "DateTimeDigitized" => "Date Digitized",
        "SubSecTime" => "Sub-second Time",
        "SubSecTimeOriginal" => "Sub-second Time Original",
        "SubSecTimeDigitized" => "Sub-second Time Digitized",
        "OffsetTime" => "Timezone Offset",
        "OffsetTimeOriginal" => "Timezone (Original)",
        "OffsetTimeDigitized" => "Timezone (Digitized)",
        // gps
        "GPSLatitude" => "GPS Latitude",
        "GPSLongitude" => "GPS Longitude",
        "GPSLatitudeRef" => "GPS Latitude Ref",
        "GPSLongitudeRef" => "GPS Longitude Ref",
        "GPSAltitude" => "GPS Altitude",
        "GPSAltitudeRef" => "GPS Altitude Ref",
        "GPSTimeStamp" => "GPS Time",
        "GPSDateStamp" => "GPS Date",
        "GPSSpeed" => "GPS Speed",
        "GPSSpeedRef" => "GPS Speed Ref",
        "GPSImgDirection" => "GPS Image Direction",
        "GPSImgDirectionRef" => "GPS Direction Ref",
        "GPSDestLatitude" => "GPS Dest Latitude",
        "GPSDestLongitude" => "GPS Dest Longitude",
        "GPSProcessingMethod" => "GPS Processing Method",
        "GPSAreaInformation" => "GPS Area Info",
        "GPSVersionID" => "GPS Version",
        "GPSMapDatum" => "GPS Map Datum",
        "latitude" => "Latitude (Decimal)",
        "longitude" => "Longitude (Decimal)",
        // image structure
        "Orientation" => "Orientation",
        "XResolution" => "X Resolution (DPI)",
        "YResolution" => "Y Resolution (DPI)",
        "ResolutionUnit" => "Resolution Unit",
        "Compression" => "Compression",
        "PhotometricInterpretation" => "Photometric Interpretation",
        "PlanarConfiguration" => "Planar Configuration",
        "YCbCrSubSampling" => "YCbCr SubSampling",
        "YCbCrPositioning" => "YCbCr Positioning",
        // exif
        "ExifVersion" => "EXIF Version",
        "ExifImageWidth" => "EXIF Image Width",
        "ExifImageHeight" => "EXIF Image Height",
        "ComponentsConfiguration" => "Components Configuration",
        "CompressedBitsPerPixel" => "Compressed Bits/Pixel",
        "PixelXDimension" => "Pixel X Dimension",
        "PixelYDimension" => "Pixel Y Dimension",
        "ImageUniqueID" => "Image Unique ID",
        "InteropIndex" => "Interoperability Index",
        "SensingMethod" => "Sensing Method",
        "FileSource" => "File Source",
        "CustomRendered" => "Custom Rendered",
        "CFAPattern" => "CFA Pattern",
        // thumbnail
        "ThumbnailOffset" => "Thumbnail Offset",
        "ThumbnailLength" => "Thumbnail Length",
        "ThumbnailImage" => "Thumbnail Present",
        // xmp
        "Rating" => "Rating",
        "RatingPercent" => "Rating Percent",
        "Label" => "Label",
        "Title" => "Title",
        "Description" => "Description",
        "Subject" => "Subject/Keywords",
        "Creator" => "Creator",
        "Rights" => "Rights",
        "MetadataDate" => "Metadata Date",
        "CreatorTool" => "Creator Tool",
        "DocumentID" => "Document ID",
        "InstanceID" => "Instance ID",
        "OriginalDocumentID" => "Original Document ID",
        // iptc
        "Headline" => "Headline",
        "Caption" => "Caption",
        "Keywords" => "Keywords",
        "City" => "City",
        "State" => "State/Province",
        "Country" => "Country",
        "CountryCode" => "Country Code",
        "Location" => "Location",
        "Credit" => "Credit",
        "Source" => "Source",
        "CopyrightNotice" => "Copyright Notice",
        "Contact" => "Contact",
        "Writer" => "Writer/Editor",
        "Category" => "Category",
        "SupplementalCategories" => "Supplemental Categories",
        "TransmissionReference" => "Transmission Reference",
        "Urgency" => "Urgency",
        "ObjectName" => "Object Name",
        "DateCreated" => "Date Created (IPTC)",
        "TimeCreated" => "Time Created (IPTC)",
        // icc profile
        "ProfileDescription" => "ICC Profile Description",
        "ProfileClass" => "ICC Profile Class",
        "ColorSpaceData" => "Color Space Data",
        "ProfileConnectionSpace" => "Profile Connection Space",
        "ProfileCreator" => "Profile Creator",
        "ProfileCopyright" => "Profile Copyright",
        "ProfileDateTime" => "Profile Date/Time",
        "DeviceMfgDesc" => "Device Manufacturer",
        "DeviceModelDesc" => "Device Model",
        "RenderingIntent" => "Rendering Intent",
        "MediaWhitePoint" => "Media White Point",
        // maker notes
        "ShutterCount" => "Shutter Count",
        "ImageCount" => "Image Count",
        "ImageStabilization" => "Image Stabilization",
        "VibrationReduction" => "Vibration Reduction",
        "MacroMode" => "Macro Mode",
        "Quality" => "Quality Setting",
        "FocusDistance" => "Focus Distance",
        "DriveMode" => "Drive Mode",
        "ContinuousDrive" => "Continuous Drive",
        "SelfTimer" => "Self Timer",
        "AFPoint" => "AF Point",
        "AFPointsInFocus" => "AF Points In Focus",
        _ => return None,
    })
}

/// Display name for any key: the curated name, or the key split before each
/// capital letter (`ImageWidth` → `Image Width`).
pub fn display_name(key: &str) -> Cow<'static, str> {
    if let Some(name) = friendly_name(key) {
        return Cow::Borrowed(name);
    }
    let mut spaced = String::with_capacity(key.len() + 8);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(ch);
    }
    let mut chars = spaced.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    Cow::Owned(capitalized.trim().to_string())
}

/// Whether a field should be flagged as personally identifying.
pub fn is_sensitive(key: &str) -> bool {
    let lower = key.to_lowercase();
    SENSITIVE_PATTERNS.iter().any(|p| lower.contains(p))
}

// ============================================================================
// Enumeration tables
// ============================================================================

/// Description of an integer EXIF code for keys with a fixed vocabulary.
pub fn enum_label(key: &str, code: i64) -> Option<&'static str> {
    Some(match (key, code) {
        ("Orientation", 1) => "Horizontal (normal)",
        ("Orientation", 2) => "Mirror horizontal",
        ("Orientation", 3) => "Rotate 180°",
        ("Orientation", 4) => "Mirror vertical",
        ("Orientation", 5) => "Mirror horizontal, rotate 270° CW",
        ("Orientation", 6) => "Rotate 90° CW",
        ("Orientation", 7) => "Mirror horizontal, rotate 90° CW",
        ("Orientation", 8) => "Rotate 270° CW",

        ("ExposureProgram", 0) => "Not defined",
        ("ExposureProgram", 1) => "Manual",
        ("ExposureProgram", 2) => "Program AE",
        ("ExposureProgram", 3) => "Aperture Priority",
        ("ExposureProgram", 4) => "Shutter Priority",
        ("ExposureProgram", 5) => "Creative (depth of field)",
        ("ExposureProgram", 6) => "Action (fast shutter)",
        ("ExposureProgram", 7) => "Portrait",
        ("ExposureProgram", 8) => "Landscape",
        ("ExposureProgram", 9) => "Bulb",

        ("MeteringMode", 0) => "Unknown",
        ("MeteringMode", 1) => "Average",
        ("MeteringMode", 2) => "Center-weighted average",
        ("MeteringMode", 3) => "Spot",
        ("MeteringMode", 4) => "Multi-spot",
        ("MeteringMode", 5) => "Pattern (matrix)",
        ("MeteringMode", 6) => "Partial",
        ("MeteringMode", 255) => "Other",

        ("Flash", 0) => "No Flash",
        ("Flash", 1) => "Flash Fired",
        ("Flash", 5) => "Flash Fired, Strobe Return not detected",
        ("Flash", 7) => "Flash Fired, Strobe Return detected",
        ("Flash", 9) => "Flash Fired, Compulsory",
        ("Flash", 13) => "Flash Fired, Compulsory, Return not detected",
        ("Flash", 15) => "Flash Fired, Compulsory, Return detected",
        ("Flash", 16) => "Flash Did Not Fire, Compulsory",
        ("Flash", 24) => "Flash Did Not Fire, Auto",
        ("Flash", 25) => "Flash Fired, Auto",
        ("Flash", 29) => "Flash Fired, Auto, Return not detected",
        ("Flash", 31) => "Flash Fired, Auto, Return detected",
        ("Flash", 32) => "No Flash Function",
        ("Flash", 48) => "Flash Did Not Fire, No Flash Function",
        ("Flash", 65) => "Flash Fired, Red-eye reduction",
        ("Flash", 69) => "Flash Fired, Red-eye, Return not detected",
        ("Flash", 71) => "Flash Fired, Red-eye, Return detected",
        ("Flash", 73) => "Flash Fired, Compulsory, Red-eye",
        ("Flash", 77) => "Flash Fired, Compulsory, Red-eye, Return not detected",
        ("Flash", 79) => "Flash Fired, Compulsory, Red-eye, Return detected",
        ("Flash", 89) => "Flash Fired, Auto, Red-eye",
        ("Flash", 93) => "Flash Fired, Auto, Red-eye, Return not detected",
        ("Flash", 95) => "Flash Fired, Auto, Red-eye, Return detected",

        ("WhiteBalance", 0) => "Auto",
        ("WhiteBalance", 1) => "Manual",
        ("WhiteBalance", 2) => "Auto (bias)",
        ("WhiteBalance", 3) => "Auto (ambiance)",
        ("WhiteBalance", 4) => "Auto (white)",

        ("LightSource", 0) => "Unknown",
        ("LightSource", 1) => "Daylight",
        ("LightSource", 2) => "Fluorescent",
        ("LightSource", 3) => "Tungsten",
        ("LightSource", 4) => "Flash",
        ("LightSource", 9) => "Fine Weather",
        ("LightSource", 10) => "Cloudy",
        ("LightSource", 11) => "Shade",
        ("LightSource", 12) => "Daylight Fluorescent",
        ("LightSource", 13) => "Day White Fluorescent",
        ("LightSource", 14) => "Cool White Fluorescent",
        ("LightSource", 15) => "White Fluorescent",
        ("LightSource", 17) => "Standard Light A",
        ("LightSource", 18) => "Standard Light B",
        ("LightSource", 19) => "Standard Light C",
        ("LightSource", 20) => "D55",
        ("LightSource", 21) => "D65",
        ("LightSource", 22) => "D75",
        ("LightSource", 23) => "D50",
        ("LightSource", 24) => "ISO Studio Tungsten",
        ("LightSource", 255) => "Other",

        ("ColorSpace", 1) => "sRGB",
        ("ColorSpace", 2) => "Adobe RGB",
        ("ColorSpace", 65535) => "Uncalibrated",

        ("ExposureMode", 0) => "Auto",
        ("ExposureMode", 1) => "Manual",
        ("ExposureMode", 2) => "Auto Bracket",

        ("SceneCaptureType", 0) => "Standard",
        ("SceneCaptureType", 1) => "Landscape",
        ("SceneCaptureType", 2) => "Portrait",
        ("SceneCaptureType", 3) => "Night Scene",
        ("SceneCaptureType", 4) => "Other",

        ("ResolutionUnit", 1) => "None",
        ("ResolutionUnit", 2) => "inches",
        ("ResolutionUnit", 3) => "centimeters",

        ("SensingMethod", 1) => "Not defined",
        ("SensingMethod", 2) => "One-chip color area",
        ("SensingMethod", 3) => "Two-chip color area",
        ("SensingMethod", 4) => "Three-chip color area",
        ("SensingMethod", 5) => "Color sequential area",
        ("SensingMethod", 7) => "Trilinear",
        ("SensingMethod", 8) => "Color sequential linear",

        ("Contrast" | "Saturation", 0) => "Normal",
        ("Contrast" | "Saturation", 1) => "Low",
        ("Contrast" | "Saturation", 2) => "High",

        ("Sharpness", 0) => "Normal",
        ("Sharpness", 1) => "Soft",
        ("Sharpness", 2) => "Hard",

        ("SubjectDistanceRange", 0) => "Unknown",
        ("SubjectDistanceRange", 1) => "Macro",
        ("SubjectDistanceRange", 2) => "Close",
        ("SubjectDistanceRange", 3) => "Distant",

        ("GainControl", 0) => "None",
        ("GainControl", 1) => "Low gain up",
        ("GainControl", 2) => "High gain up",
        ("GainControl", 3) => "Low gain down",
        ("GainControl", 4) => "High gain down",

        ("CustomRendered", 0) => "Normal",
        ("CustomRendered", 1) => "Custom",

        ("FileSource", 1) => "Film Scanner",
        ("FileSource", 2) => "Reflection Print Scanner",
        ("FileSource", 3) => "Digital Camera",
        _ => return None,
    })
}

/// Integer code carried by a scalar: an integer, an integral float, or text
/// spelling an integer.
fn enum_code(value: &Scalar) -> Option<i64> {
    match value {
        Scalar::Int(i) => Some(*i),
        Scalar::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
        Scalar::Text(s) => s.parse::<i64>().ok().filter(|n| n.to_string() == *s),
        _ => None,
    }
}

// ============================================================================
// Value formatting
// ============================================================================

/// Format a record value for display.
pub fn format_value(key: &str, value: &TagValue) -> String {
    match value {
        TagValue::Scalar(s) => format_scalar(key, s),
        TagValue::Array(items) => items
            .iter()
            .map(|item| format_scalar(key, item))
            .collect::<Vec<_>>()
            .join(", "),
        TagValue::Date(date) => format_date_time(date),
        TagValue::Binary => value.to_string(),
    }
}

fn format_scalar(key: &str, value: &Scalar) -> String {
    if let Some(label) = enum_code(value).and_then(|code| enum_label(key, code)) {
        return label.to_string();
    }
    if matches!(key, "ExposureTime" | "ShutterSpeedValue") {
        return format_exposure(value);
    }
    let Some(n) = value.as_f64() else {
        return value.to_string();
    };
    match key {
        "FNumber" | "ApertureValue" => format!("f/{}", to_fixed(n, 1)),
        "FocalLength" => format!("{} mm", number_to_string(n)),
        "FocalLengthIn35mmFormat" => format!("{} mm (35mm equiv.)", number_to_string(n)),
        "XResolution" | "YResolution" => format!("{} dpi", number_to_string(n)),
        "ExposureCompensation" | "ExposureBiasValue" => {
            let sign = if n >= 0.0 { "+" } else { "" };
            format!("{sign}{} EV", to_fixed(n, 2))
        }
        _ => value.to_string(),
    }
}

/// Shutter speed: fractions of a second as `1/Ns`, longer times as `Ns`.
/// Non-numeric values pass through.
pub fn format_exposure(value: &Scalar) -> String {
    match value.as_f64() {
        Some(n) if n < 1.0 => format!("1/{}s", number_to_string((1.0 / n).round())),
        Some(n) => format!("{}s", number_to_string(n)),
        None => value.to_string(),
    }
}

/// `Mar 9, 2024, 02:05:30 PM`.
pub fn format_date_time(date: &NaiveDateTime) -> String {
    date.format("%b %-d, %Y, %I:%M:%S %p").to_string()
}

/// `Mar 9, 2024, 02:05 PM`.
pub fn format_date_minutes(date: &NaiveDateTime) -> String {
    date.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// Date display for summary fields. Date values keep their seconds, camera
/// date strings (`2024:03:09 14:05:30`) are shown to the minute, and other
/// text is returned unchanged. Falsy values render as `-`.
pub fn format_exif_date(value: &TagValue) -> String {
    if !value.is_truthy() {
        return "-".to_string();
    }
    match value {
        TagValue::Date(date) => format_date_time(date),
        other => {
            let text = other.to_string();
            parse_exif_date(&text)
                .map(|date| format_date_minutes(&date))
                .unwrap_or(text)
        }
    }
}

/// Find and parse the first `YYYY:MM:DD HH:MM:SS` timestamp in a string.
pub fn parse_exif_date(text: &str) -> Option<NaiveDateTime> {
    let caps = EXIF_DATE.captures(text)?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let year = caps.get(1)?.as_str().parse::<i32>().ok()?;
    chrono::NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)?.and_hms_opt(
        field(4)?,
        field(5)?,
        field(6)?,
    )
}

/// Binary (1024-based) size with up to two decimals, trailing zeros dropped:
/// `0 Bytes`, `512 Bytes`, `1.5 KB`, `2 MB`. Sizes beyond gigabytes stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let bytes = bytes as f64;
    let exponent = ((bytes.ln() / 1024f64.ln()).floor() as usize).min(UNITS.len() - 1);
    let scaled = bytes / 1024f64.powi(exponent as i32);
    let rounded: f64 = to_fixed(scaled, 2).parse().unwrap_or(scaled);
    format!("{} {}", number_to_string(rounded), UNITS[exponent])
}
