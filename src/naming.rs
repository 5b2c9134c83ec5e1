//! Names of the files the tool writes.
//!
//! | Output | Name |
//! |--------|------|
//! | ICO | `favicon.ico` |
//! | single favicon size | `favicon-32x32.png` |
//! | palette export | `palette.css`, `palette.js`, ... |
//! | metadata export | `<base>_metadata.json` |
//! | stripped copy | `<base>_clean.<ext>` |
//!
//! `<base>` is the input file name with its last extension removed:
//! - `IMG_0042.JPG` → `IMG_0042`
//! - `archive.tar.gz` → `archive.tar`
//! - `README` → `README`

use crate::palette::ExportFormat;

pub const FAVICON_ICO: &str = "favicon.ico";

/// Split `name` into base and extension at the last dot.
///
/// A dot at the very start or end does not count, so `.profile` and
/// `notes.` have no extension.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < name.len() => (&name[..pos], Some(&name[pos + 1..])),
        _ => (name, None),
    }
}

pub fn base_name(name: &str) -> &str {
    split_extension(name).0
}

pub fn favicon_png_name(size: u32) -> String {
    format!("favicon-{size}x{size}.png")
}

pub fn palette_file_name(format: ExportFormat) -> String {
    format!("palette.{}", format.extension())
}

pub fn metadata_json_name(file_name: &str) -> String {
    format!("{}_metadata.json", base_name(file_name))
}

/// Name of the metadata-free copy. The input's own extension is kept;
/// `fallback_ext` is used only when the input has none.
pub fn clean_file_name(file_name: &str, fallback_ext: &str) -> String {
    let (base, ext) = split_extension(file_name);
    format!("{base}_clean.{}", ext.unwrap_or(fallback_ext))
}

/// File extension conventionally used for an image MIME type.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        "image/x-icon" => "ico",
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_split() {
        assert_eq!(split_extension("IMG_0042.JPG"), ("IMG_0042", Some("JPG")));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", Some("gz")));
        assert_eq!(split_extension("README"), ("README", None));
        assert_eq!(split_extension(".profile"), (".profile", None));
        assert_eq!(split_extension("notes."), ("notes.", None));
    }

    #[test]
    fn download_names() {
        assert_eq!(FAVICON_ICO, "favicon.ico");
        assert_eq!(favicon_png_name(32), "favicon-32x32.png");
        assert_eq!(palette_file_name(ExportFormat::Scss), "palette.scss");
        assert_eq!(palette_file_name(ExportFormat::Tailwind), "palette.js");
        assert_eq!(metadata_json_name("holiday.photo.jpeg"), "holiday.photo_metadata.json");
    }

    #[test]
    fn clean_name_keeps_original_extension() {
        assert_eq!(clean_file_name("scan.TIF", "jpg"), "scan_clean.TIF");
        assert_eq!(clean_file_name("scan", "jpg"), "scan_clean.jpg");
    }

    #[test]
    fn mime_extensions() {
        assert_eq!(extension_for_mime("image/png"), "png");
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("application/octet-stream"), "jpg");
    }
}
