//! BMP file header and BITMAPINFOHEADER.
//!
//! All fields are little-endian. Info-header fields are only read when the
//! declared header size is at least 40 bytes; older core headers report
//! just the file-level fields.

use super::ScanReport;
use super::reader::{ByteReader, ScanError};
use crate::metadata::format::format_file_size;

const INFO_HEADER_SIZE: u32 = 40;
const METERS_PER_INCH: f64 = 39.3701;

pub fn compression_name(compression: u32) -> &'static str {
    match compression {
        0 => "None (BI_RGB)",
        1 => "RLE8 (BI_RLE8)",
        2 => "RLE4 (BI_RLE4)",
        3 => "Bitfields (BI_BITFIELDS)",
        4 => "JPEG (BI_JPEG)",
        5 => "PNG (BI_PNG)",
        _ => "Unknown",
    }
}

pub(super) fn scan(r: &ByteReader, report: &mut ScanReport) {
    if let Err(err) = read_headers(r, report) {
        log::debug!("BMP header truncated: {err}");
    }
}

fn read_headers(r: &ByteReader, report: &mut ScanReport) -> Result<(), ScanError> {
    report.set("BMPFileSize", format_file_size(u64::from(r.u32_le(2)?)));
    report.set("BMPDataOffset", format!("{} bytes", r.u32_le(10)?));

    let header_size = r.u32_le(14)?;
    report.set("BMPHeaderSize", format!("{header_size} bytes"));
    if header_size < INFO_HEADER_SIZE {
        return Ok(());
    }

    let width = r.i32_le(18)?;
    let height = r.i32_le(22)?;
    r.u16_le(26)?; // planes
    let bits_per_pixel = r.u16_le(28)?;
    let compression = r.u32_le(30)?;

    report.set("BMPWidth", format!("{} px", width.unsigned_abs()));
    report.set("BMPHeight", format!("{} px", height.unsigned_abs()));
    // negative height marks a top-down bitmap
    report.set_flag("BMPTopDown", height < 0);
    report.set("BMPBitsPerPixel", format!("{bits_per_pixel} bits"));
    report.set("BMPCompression", compression_name(compression));

    let x_ppm = r.i32_le(38)?;
    let y_ppm = r.i32_le(42)?;
    if x_ppm > 0 {
        report.set("BMPXResolution", format!("{} DPI", dpi(x_ppm)));
    }
    if y_ppm > 0 {
        report.set("BMPYResolution", format!("{} DPI", dpi(y_ppm)));
    }

    match r.u32_le(46)? {
        0 => report.set("BMPColorsUsed", "Default"),
        n => report.set("BMPColorsUsed", n),
    }
    match r.u32_le(50)? {
        0 => report.set("BMPImportantColors", "All"),
        n => report.set("BMPImportantColors", n),
    }
    Ok(())
}

fn dpi(pixels_per_meter: i32) -> i64 {
    (f64::from(pixels_per_meter) / METERS_PER_INCH).round() as i64
}
