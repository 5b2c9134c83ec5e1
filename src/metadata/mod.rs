//! Image metadata: tag-service merge, container scanning and presentation.
//!
//! A record is built by [`extract_metadata`] from a [`FileContext`] and any
//! [`TagSource`]. The pipeline never fails: tag-service errors are logged and
//! skipped, and a malformed container only shortens the scan.
//!
//! | Module | Role |
//! |---|---|
//! | [`value`] | [`TagValue`] / [`RawValue`] and number rendering |
//! | [`record`] | insertion-ordered [`MetadataRecord`] |
//! | [`source`] | the [`TagSource`] seam, [`NoTagSource`] |
//! | [`exif_source`] | [`ExifTagSource`] over `kamadak-exif` |
//! | [`scan`] | byte-level JPEG/PNG/WebP/GIF/BMP/TIFF scanning |
//! | [`gps`] | DMS parsing, decimal coordinates, map links |
//! | [`normalize`] | the pipeline itself |
//! | [`category`] | Basic/Camera/EXIF/GPS/Advanced grouping |
//! | [`format`] | friendly names, enum tables, value formatting |
//! | [`summary`] | camera / date / lens / settings line |
//! | [`export`] | JSON and plain-text dumps |
//! | [`strip`] | metadata removal by re-encoding |

pub mod category;
pub mod exif_source;
pub mod export;
pub mod format;
pub mod gps;
pub mod normalize;
pub mod record;
pub mod scan;
pub mod source;
pub mod strip;
pub mod summary;
pub mod value;

pub use category::{CategorizedView, Category, FieldRow, categorize, categorize_key};
pub use exif_source::ExifTagSource;
pub use format::{display_name, format_value};
pub use normalize::{FileContext, MetadataOptions, extract_metadata};
pub use record::MetadataRecord;
pub use scan::scan_container;
pub use source::{GpsPosition, NoTagSource, TagParseOptions, TagSource, TagSourceError};
pub use strip::{StripError, StrippedImage, strip_metadata};
pub use summary::MetadataSummary;
pub use value::{BINARY_SENTINEL, RawValue, Scalar, TagValue};
