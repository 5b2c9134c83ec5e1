//! Field categories and the categorized view of a record.
//!
//! A key's category is a pure function of its name: exact matches against
//! five keyword lists (checked in display order), then substring heuristics,
//! then `Advanced`.

use super::format::{display_name, format_value, is_sensitive};
use super::record::MetadataRecord;
use super::value::{BINARY_SENTINEL, TagValue};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Basic,
    Camera,
    Exif,
    Gps,
    Advanced,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Basic,
        Category::Camera,
        Category::Exif,
        Category::Gps,
        Category::Advanced,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Basic => "Basic",
            Category::Camera => "Camera",
            Category::Exif => "EXIF",
            Category::Gps => "GPS",
            Category::Advanced => "Advanced",
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::Basic => BASIC_KEYS,
            Category::Camera => CAMERA_KEYS,
            Category::Exif => EXIF_KEYS,
            Category::Gps => GPS_KEYS,
            Category::Advanced => ADVANCED_KEYS,
        }
    }
}

const BASIC_KEYS: &[&str] = &[
    "FileName", "FileSize", "FileType", "MIMEType", "ImageWidth", "ImageHeight", "ImageSize",
    "Megapixels", "BitDepth", "ColorType", "BitsPerSample", "SamplesPerPixel", "Compression",
    "FileFormat", "FileExtension", "FileSizeBytes", "FileModifyDate", "JFIFVersion", "JFIFUnits",
    "PNGBitDepth", "PNGColorType", "PNGCompression", "PNGInterlace", "HasAlpha",
    "ColorComponents", "JPEGCompression", "Width", "Height", "PixelWidth", "PixelHeight",
];

const CAMERA_KEYS: &[&str] = &[
    "Make", "Model", "LensMake", "LensModel", "LensInfo", "Lens", "LensSerialNumber",
    "SerialNumber", "InternalSerialNumber", "BodySerialNumber", "CameraSerialNumber", "Software",
    "ProcessingSoftware", "HostComputer", "Artist", "Copyright", "OwnerName", "CameraOwnerName",
    "ImageDescription", "UserComment", "UniqueCameraModel", "FirmwareVersion", "CameraType",
    "LensType", "LensSpec", "DeviceMfgDesc", "DeviceModelDesc",
];

const EXIF_KEYS: &[&str] = &[
    "ExposureTime", "ShutterSpeedValue", "FNumber", "ApertureValue", "ISO", "ISOSpeedRatings",
    "PhotographicSensitivity", "ExposureProgram", "ExposureMode", "ExposureCompensation",
    "ExposureBiasValue", "MeteringMode", "LightSource", "Flash", "FlashMode", "FlashEnergy",
    "FocalLength", "FocalLengthIn35mmFormat", "FocalPlaneXResolution", "FocalPlaneYResolution",
    "WhiteBalance", "WhiteBalanceMode", "ColorSpace", "Contrast", "Saturation", "Sharpness",
    "DigitalZoomRatio", "SceneCaptureType", "SceneType", "GainControl", "BrightnessValue",
    "SubjectDistance", "SubjectDistanceRange", "MaxApertureValue", "FocusMode", "AFAreaMode",
    "DateTimeOriginal", "CreateDate", "ModifyDate", "DateTime", "DateTimeDigitized",
    "SubSecTime", "SubSecTimeOriginal", "SubSecTimeDigitized", "OffsetTime", "Orientation",
    "XResolution", "YResolution", "ResolutionUnit", "ExifVersion", "ExifImageWidth",
    "ExifImageHeight", "PixelXDimension", "PixelYDimension", "SensingMethod", "FileSource",
    "CustomRendered", "CFAPattern", "ImageUniqueID", "ShutterCount", "ImageStabilization",
    "VibrationReduction", "Quality", "DriveMode", "SelfTimer", "AFPoint", "MacroMode",
    "FocusDistance", "SubjectArea",
];

const GPS_KEYS: &[&str] = &[
    "GPSLatitude", "GPSLongitude", "GPSLatitudeRef", "GPSLongitudeRef", "GPSAltitude",
    "GPSAltitudeRef", "GPSTimeStamp", "GPSDateStamp", "GPSSpeed", "GPSSpeedRef", "GPSTrack",
    "GPSTrackRef", "GPSImgDirection", "GPSImgDirectionRef", "GPSDestLatitude",
    "GPSDestLongitude", "GPSDestLatitudeRef", "GPSDestLongitudeRef", "GPSProcessingMethod",
    "GPSAreaInformation", "GPSVersionID", "GPSMapDatum", "GPSDifferential",
    "GPSHPositioningError", "GPSCoordinates", "GPSMapLink", "latitude", "longitude",
    "GPSPosition",
];

const ADVANCED_KEYS: &[&str] = &[
    "ProfileDescription", "ProfileClass", "ColorSpaceData", "ProfileConnectionSpace",
    "ProfileCreator", "ProfileCopyright", "ProfileDateTime", "RenderingIntent",
    "MediaWhitePoint", "ThumbnailOffset", "ThumbnailLength", "ThumbnailImage", "Rating",
    "RatingPercent", "Label", "Title", "Description", "Subject", "Creator", "Rights",
    "MetadataDate", "CreatorTool", "DocumentID", "InstanceID", "OriginalDocumentID", "Headline",
    "Caption", "Keywords", "City", "State", "Country", "CountryCode", "Location", "Credit",
    "Source", "CopyrightNotice", "Contact", "Writer", "Category", "SupplementalCategories",
    "TransmissionReference", "Urgency", "ObjectName", "DateCreated", "TimeCreated",
    "PhotometricInterpretation", "PlanarConfiguration", "YCbCrSubSampling", "YCbCrPositioning",
    "ComponentsConfiguration", "CompressedBitsPerPixel", "InteropIndex", "FlashpixVersion",
    "MakerNote", "PrintIM", "ApplicationNotes", "PreviewImage", "ICC_Profile", "XMP",
];

/// Category of a field key.
pub fn categorize_key(key: &str) -> Category {
    let lower = key.to_lowercase();
    for category in Category::ALL {
        if category
            .keywords()
            .iter()
            .any(|k| k.eq_ignore_ascii_case(&lower))
        {
            return category;
        }
    }

    let has = |needle: &str| lower.contains(needle);
    let any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if has("gps") || lower == "latitude" || lower == "longitude" {
        Category::Gps
    } else if any(&["lens", "camera", "make", "model", "serial"]) {
        Category::Camera
    } else if any(&[
        "exposure", "flash", "focal", "iso", "aperture", "shutter", "white", "meter",
    ]) {
        Category::Exif
    } else if has("file") || (has("image") && any(&["width", "height", "size"])) {
        Category::Basic
    } else if any(&["png", "jpeg", "jfif", "gif", "bmp", "webp"]) {
        Category::Basic
    } else if has("date") || has("time") {
        Category::Exif
    } else {
        Category::Advanced
    }
}

/// One displayed field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRow {
    pub key: String,
    pub name: String,
    pub value: String,
    pub sensitive: bool,
}

/// Rows grouped by category, in record order within each group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategorizedView {
    pub basic: Vec<FieldRow>,
    pub camera: Vec<FieldRow>,
    pub exif: Vec<FieldRow>,
    pub gps: Vec<FieldRow>,
    pub advanced: Vec<FieldRow>,
}

impl CategorizedView {
    pub fn rows(&self, category: Category) -> &[FieldRow] {
        match category {
            Category::Basic => &self.basic,
            Category::Camera => &self.camera,
            Category::Exif => &self.exif,
            Category::Gps => &self.gps,
            Category::Advanced => &self.advanced,
        }
    }

    fn rows_mut(&mut self, category: Category) -> &mut Vec<FieldRow> {
        match category {
            Category::Basic => &mut self.basic,
            Category::Camera => &mut self.camera,
            Category::Exif => &mut self.exif,
            Category::Gps => &mut self.gps,
            Category::Advanced => &mut self.advanced,
        }
    }

    pub fn count(&self, category: Category) -> usize {
        self.rows(category).len()
    }

    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.count(*c)).sum()
    }

    /// Categories with at least one row, in display order.
    pub fn non_empty(&self) -> impl Iterator<Item = (Category, &[FieldRow])> {
        Category::ALL
            .into_iter()
            .map(|c| (c, self.rows(c)))
            .filter(|(_, rows)| !rows.is_empty())
    }
}

/// Group a record's displayable fields. Empty text and binary blobs are left
/// out.
pub fn categorize(record: &MetadataRecord) -> CategorizedView {
    let mut view = CategorizedView::default();
    for (key, value) in record.iter() {
        if is_hidden(value) {
            continue;
        }
        view.rows_mut(categorize_key(key)).push(FieldRow {
            key: key.to_string(),
            name: display_name(key).into_owned(),
            value: format_value(key, value),
            sensitive: is_sensitive(key),
        });
    }
    view
}

fn is_hidden(value: &TagValue) -> bool {
    match value {
        TagValue::Binary => true,
        TagValue::Scalar(_) => value
            .as_text()
            .is_some_and(|t| t.is_empty() || t == BINARY_SENTINEL),
        _ => false,
    }
}
