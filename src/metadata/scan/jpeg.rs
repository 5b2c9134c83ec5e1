//! JPEG marker walk.
//!
//! ```text
//! FF D8 | FF mm LL LL payload… | FF mm LL LL payload… | … FF DA (scan data)
//!         ^ marker  ^ big-endian length, includes itself but not FF mm
//! ```
//!
//! The walk starts right after SOI and advances by `length + 2` per segment.
//! It stops at the first non-`FF` marker position, at SOS or EOI, or when a
//! read runs past the buffer.

use super::ScanReport;
use super::iptc;
use super::reader::{ByteReader, ScanError};

const APP0: u8 = 0xE0;
const APP13: u8 = 0xED;
const DHT: u8 = 0xC4;
const DQT: u8 = 0xDB;
const DRI: u8 = 0xDD;
const SOS: u8 = 0xDA;
const EOI: u8 = 0xD9;

/// Compression name for a start-of-frame marker.
pub fn compression_name(marker: u8) -> Option<&'static str> {
    Some(match marker {
        0xC0 => "Baseline DCT",
        0xC1 => "Extended Sequential DCT",
        0xC2 => "Progressive DCT",
        0xC3 => "Lossless (Sequential)",
        0xC5 => "Differential Sequential DCT",
        0xC6 => "Differential Progressive DCT",
        0xC7 => "Differential Lossless",
        0xC9 => "Extended Sequential DCT, Arithmetic",
        0xCA => "Progressive DCT, Arithmetic",
        0xCB => "Lossless (Sequential), Arithmetic",
        0xCD => "Differential Sequential DCT, Arithmetic",
        0xCE => "Differential Progressive DCT, Arithmetic",
        0xCF => "Differential Lossless, Arithmetic",
        _ => return None,
    })
}

fn is_start_of_frame(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xC3 | 0xC5..=0xCB | 0xCD..=0xCF)
}

pub(super) fn scan(r: &ByteReader, report: &mut ScanReport) {
    let mut offset = 2;
    while offset + 4 < r.len() {
        match scan_segment(r, offset, report) {
            Ok(Some(next)) => offset = next,
            Ok(None) => break,
            Err(err) => {
                log::debug!("JPEG marker walk stopped: {err}");
                break;
            }
        }
    }
}

/// Decode one segment. Returns the next segment offset, or `None` when the
/// walk is finished.
fn scan_segment(
    r: &ByteReader,
    offset: usize,
    report: &mut ScanReport,
) -> Result<Option<usize>, ScanError> {
    if r.u8(offset)? != 0xFF {
        return Ok(None);
    }
    let marker = r.u8(offset + 1)?;
    let length = r.u16_be(offset + 2)? as usize;

    // Payload decoders fail on their own without ending the walk.
    if marker == APP0 && length >= 14 {
        if let Err(err) = read_jfif(r, offset, report) {
            log::debug!("truncated JFIF header: {err}");
        }
    }
    if is_start_of_frame(marker) {
        if let Err(err) = read_frame(r, offset, marker, report) {
            log::debug!("truncated frame header: {err}");
        }
    }
    if marker == APP13 {
        read_app13(r, offset, length, report);
    }

    match marker {
        DQT => report.set("HasQuantizationTable", "Yes"),
        DHT => report.set("HasHuffmanTable", "Yes"),
        DRI => {
            let interval = r.u16_be(offset + 4)?;
            report.set("RestartInterval", format!("{interval} MCUs"));
        }
        _ => {}
    }

    if marker == SOS || marker == EOI {
        return Ok(None);
    }
    Ok(Some(offset + length + 2))
}

fn read_jfif(r: &ByteReader, offset: usize, report: &mut ScanReport) -> Result<(), ScanError> {
    if r.bytes(offset + 4, 4)? != b"JFIF" {
        return Ok(());
    }
    let major = r.u8(offset + 9)?;
    let minor = r.u8(offset + 10)?;
    report.set("JFIFVersion", format!("{major}.{minor:02}"));

    let units = match r.u8(offset + 11)? {
        0 => "Aspect ratio",
        1 => "Dots per inch",
        _ => "Dots per cm",
    };
    report.set("JFIFUnits", units);
    report.set("JFIFXDensity", r.u16_be(offset + 12)?);
    report.set("JFIFYDensity", r.u16_be(offset + 14)?);
    Ok(())
}

fn read_frame(
    r: &ByteReader,
    offset: usize,
    marker: u8,
    report: &mut ScanReport,
) -> Result<(), ScanError> {
    let precision = r.u8(offset + 4)?;
    // height and width precede the component count
    r.u16_be(offset + 5)?;
    r.u16_be(offset + 7)?;
    let components = r.u8(offset + 9)?;

    report.set("JPEGPrecision", format!("{precision} bits"));
    let suffix = match components {
        1 => " (Grayscale)",
        3 => " (RGB/YCbCr)",
        4 => " (CMYK)",
        _ => "",
    };
    report.set("ColorComponents", format!("{components}{suffix}"));
    report.set(
        "JPEGCompression",
        compression_name(marker).unwrap_or("Unknown"),
    );
    Ok(())
}

fn read_app13(r: &ByteReader, offset: usize, length: usize, report: &mut ScanReport) {
    let start = offset + 4;
    let end = (offset + 2 + length).min(r.len());
    let Some(count) = end.checked_sub(start) else {
        return;
    };
    let Ok(segment) = r.bytes(start, count) else {
        return;
    };
    if let Some(iim) = iptc::find_in_8bim(segment) {
        let fields = iptc::parse_iim(iim);
        if !fields.is_empty() {
            fields.write_to(report);
        }
    }
}
