//! # imgrunner
//!
//! Three image utilities behind one library and one small CLI:
//!
//! - **Palette extraction**: the dominant colors of an image, with
//!   conversions, names and stylesheet exports.
//! - **Metadata normalization**: EXIF, GPS and container-level fields merged
//!   into one ordered record, grouped and formatted for reading.
//! - **Favicon encoding**: square renditions of an image packed into a
//!   multi-size Windows ICO.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`palette`] | bucketing, weighted k-means, color conversions, exports |
//! | [`metadata`] | tag-service merge, byte-level container scans, presentation |
//! | [`favicon`] | rasterization and the ICO container |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`naming`] | names of the files the CLI writes |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Deterministic Palettes
//!
//! k-means is seeded from the heaviest buckets rather than at random, runs a
//! fixed number of rounds, and breaks every tie by position. The same image
//! always yields the same palette, which keeps exports diffable and tests
//! exact.
//!
//! ## The Tag Service Is a Seam
//!
//! EXIF parsing goes through the [`metadata::TagSource`] trait.
//! [`metadata::ExifTagSource`] is the real implementation; tests script a mock
//! instead. Everything the tag service cannot see (PNG chunks, JFIF, WebP and
//! GIF headers) is read directly from the bytes by [`metadata::scan`], and
//! neither path can make extraction fail.
//!
//! ## PNG-Compressed ICO
//!
//! Every ICO entry is a complete PNG at 32 bits per pixel. All current
//! browsers and Windows since Vista read this form, and it avoids writing
//! BMP/AND-mask payloads entirely.

pub mod config;
pub mod favicon;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod palette;

#[cfg(test)]
pub(crate) mod test_helpers;
