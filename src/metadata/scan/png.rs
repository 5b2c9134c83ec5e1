//! PNG header and chunk walk.
//!
//! IHDR is read at its fixed position right after the signature. The chunk
//! walk then starts over at offset 8 and follows declared lengths
//! (`length`, `type`, data, CRC) until IEND or a short read.

use super::ScanReport;
use super::reader::{ByteReader, ScanError};
use crate::metadata::value::to_fixed;

const IHDR: u32 = 0x4948_4452;
const METERS_PER_INCH: f64 = 39.3701;

const RENDERING_INTENTS: [&str; 4] = [
    "Perceptual",
    "Relative colorimetric",
    "Saturation",
    "Absolute colorimetric",
];

pub fn color_type_name(color_type: u8) -> &'static str {
    match color_type {
        0 => "Grayscale",
        2 => "RGB (Truecolor)",
        3 => "Indexed (Palette)",
        4 => "Grayscale with Alpha",
        6 => "RGBA (Truecolor with Alpha)",
        _ => "Unknown",
    }
}

/// Bits per pixel from the per-channel depth and the channel count implied
/// by the color type.
pub fn bits_per_pixel(color_type: u8, bit_depth: u8) -> u32 {
    let channels = match color_type {
        2 => 3,
        4 => 2,
        6 => 4,
        _ => 1,
    };
    u32::from(bit_depth) * channels
}

pub(super) fn scan(r: &ByteReader, report: &mut ScanReport) {
    if let Err(err) = read_header(r, report) {
        log::debug!("PNG header unreadable: {err}");
        return;
    }
    let mut offset = 8;
    while offset + 12 < r.len() {
        match read_chunk(r, offset, report) {
            Ok(Some(next)) => offset = next,
            Ok(None) => break,
            Err(err) => {
                log::debug!("PNG chunk walk stopped: {err}");
                break;
            }
        }
    }
}

fn read_header(r: &ByteReader, report: &mut ScanReport) -> Result<(), ScanError> {
    r.u32_be(8)?;
    if r.u32_be(12)? != IHDR {
        return Ok(());
    }
    r.u32_be(16)?;
    r.u32_be(20)?;
    let bit_depth = r.u8(24)?;
    let color_type = r.u8(25)?;
    let compression = r.u8(26)?;
    let filter = r.u8(27)?;
    let interlace = r.u8(28)?;

    report.set("PNGBitDepth", format!("{bit_depth} bits per channel"));
    report.set("PNGColorType", color_type_name(color_type));
    report.set_flag("HasAlpha", matches!(color_type, 4 | 6));
    report.set(
        "BitsPerPixel",
        format!("{} bits", bits_per_pixel(color_type, bit_depth)),
    );
    report.set(
        "PNGCompression",
        if compression == 0 { "Deflate/Inflate" } else { "Unknown" },
    );
    report.set(
        "PNGFilter",
        if filter == 0 { "Adaptive (5 filter types)" } else { "Unknown" },
    );
    report.set(
        "PNGInterlace",
        match interlace {
            0 => "None (Progressive display)",
            1 => "Adam7 interlace",
            _ => "Unknown",
        },
    );
    Ok(())
}

/// Decode one chunk, returning the offset of the next or `None` at IEND.
fn read_chunk(
    r: &ByteReader,
    offset: usize,
    report: &mut ScanReport,
) -> Result<Option<usize>, ScanError> {
    let length = r.u32_be(offset)? as usize;
    let data = offset + 8;

    match &r.tag(offset + 4)? {
        b"gAMA" => {
            let gamma = f64::from(r.u32_be(data)?) / 100_000.0;
            report.set("PNGGamma", to_fixed(gamma, 5));
        }
        b"cHRM" => report.set("PNGChromaticity", "Present"),
        b"sRGB" => {
            let intent = r.u8(data)? as usize;
            report.set("PNGsRGB", RENDERING_INTENTS.get(intent).copied().unwrap_or("Yes"));
        }
        b"iCCP" => report.set("PNGICCProfile", "Present"),
        b"tEXt" | b"iTXt" | b"zTXt" => report.increment("PNGTextChunks"),
        b"pHYs" => read_physical(r, data, report)?,
        b"tIME" => {
            let year = r.u16_be(data)?;
            let [month, day, hour, minute, second] = [
                r.u8(data + 2)?,
                r.u8(data + 3)?,
                r.u8(data + 4)?,
                r.u8(data + 5)?,
                r.u8(data + 6)?,
            ];
            report.set(
                "PNGModificationTime",
                format!("{year}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"),
            );
        }
        b"IEND" => return Ok(None),
        _ => {}
    }
    Ok(Some(offset + length + 12))
}

fn read_physical(r: &ByteReader, data: usize, report: &mut ScanReport) -> Result<(), ScanError> {
    let x = r.u32_be(data)?;
    let y = r.u32_be(data + 4)?;
    let unit = r.u8(data + 8)?;
    if unit == 1 {
        report.set("PNGXResolution", format!("{} DPI", dpi(x)));
        report.set("PNGYResolution", format!("{} DPI", dpi(y)));
    } else if y != 0 {
        report.set(
            "PNGPixelAspectRatio",
            to_fixed(f64::from(x) / f64::from(y), 4),
        );
    }
    Ok(())
}

fn dpi(pixels_per_meter: u32) -> u64 {
    (f64::from(pixels_per_meter) / METERS_PER_INCH).round() as u64
}

#[cfg(test)]
mod tests {
    use super::super::scan_container;
    use super::*;

    const SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = (data.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(kind);
        out.extend_from_slice(data);
        out.extend_from_slice(&[0; 4]); // CRC is not checked
        out
    }

    fn ihdr(width: u32, height: u32, bit_depth: u8, color_type: u8, interlace: u8) -> Vec<u8> {
        let mut data = width.to_be_bytes().to_vec();
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[bit_depth, color_type, 0, 0, interlace]);
        chunk(b"IHDR", &data)
    }

    fn png(chunks: &[Vec<u8>]) -> Vec<u8> {
        let mut out = SIGNATURE.to_vec();
        for c in chunks {
            out.extend_from_slice(c);
        }
        out.extend(chunk(b"IEND", &[]));
        out
    }

    fn text<'a>(report: &'a ScanReport, key: &str) -> Option<&'a str> {
        report.get(key).and_then(|v| v.as_text())
    }

    #[test]
    fn minimal_rgba_header() {
        let report = scan_container(&png(&[ihdr(1, 1, 8, 6, 0)]));
        assert_eq!(text(&report, "FileFormat"), Some("PNG"));
        assert_eq!(text(&report, "HasAlpha"), Some("Yes"));
        assert_eq!(
            text(&report, "PNGColorType"),
            Some("RGBA (Truecolor with Alpha)")
        );
        assert_eq!(text(&report, "BitsPerPixel"), Some("32 bits"));
        assert_eq!(text(&report, "PNGBitDepth"), Some("8 bits per channel"));
        assert_eq!(text(&report, "PNGCompression"), Some("Deflate/Inflate"));
        assert_eq!(text(&report, "PNGFilter"), Some("Adaptive (5 filter types)"));
        assert_eq!(
            text(&report, "PNGInterlace"),
            Some("None (Progressive display)")
        );
    }

    #[test]
    fn bits_per_pixel_by_color_type() {
        assert_eq!(bits_per_pixel(0, 16), 16);
        assert_eq!(bits_per_pixel(2, 8), 24);
        assert_eq!(bits_per_pixel(3, 4), 4);
        assert_eq!(bits_per_pixel(4, 8), 16);
        assert_eq!(bits_per_pixel(6, 16), 64);
        assert_eq!(bits_per_pixel(9, 8), 8);
    }

    #[test]
    fn palette_image_without_alpha() {
        let report = scan_container(&png(&[ihdr(4, 4, 8, 3, 1)]));
        assert_eq!(text(&report, "HasAlpha"), Some("No"));
        assert_eq!(text(&report, "PNGColorType"), Some("Indexed (Palette)"));
        assert_eq!(text(&report, "PNGInterlace"), Some("Adam7 interlace"));
    }

    #[test]
    fn ancillary_chunks() {
        let mut time = 2023u16.to_be_bytes().to_vec();
        time.extend_from_slice(&[7, 4, 9, 5, 3]);
        let mut phys = 2835u32.to_be_bytes().to_vec();
        phys.extend_from_slice(&2835u32.to_be_bytes());
        phys.push(1);

        let data = png(&[
            ihdr(2, 2, 8, 2, 0),
            chunk(b"gAMA", &45455u32.to_be_bytes()),
            chunk(b"cHRM", &[0; 32]),
            chunk(b"sRGB", &[1]),
            chunk(b"tEXt", b"Title\0x"),
            chunk(b"zTXt", b"Comment\0\0x"),
            chunk(b"pHYs", &phys),
            chunk(b"tIME", &time),
        ]);
        let report = scan_container(&data);
        assert_eq!(text(&report, "PNGGamma"), Some("0.45455"));
        assert_eq!(text(&report, "PNGChromaticity"), Some("Present"));
        assert_eq!(text(&report, "PNGsRGB"), Some("Relative colorimetric"));
        assert_eq!(report.get("PNGTextChunks").unwrap().as_f64(), Some(2.0));
        assert_eq!(text(&report, "PNGXResolution"), Some("72 DPI"));
        assert_eq!(text(&report, "PNGYResolution"), Some("72 DPI"));
        assert_eq!(
            text(&report, "PNGModificationTime"),
            Some("2023-07-04 09:05:03")
        );
    }

    #[test]
    fn unknown_srgb_intent_and_aspect_ratio() {
        let mut phys = 3u32.to_be_bytes().to_vec();
        phys.extend_from_slice(&2u32.to_be_bytes());
        phys.push(0);
        let report = scan_container(&png(&[
            ihdr(2, 2, 8, 0, 0),
            chunk(b"sRGB", &[9]),
            chunk(b"pHYs", &phys),
        ]));
        assert_eq!(text(&report, "PNGsRGB"), Some("Yes"));
        assert_eq!(text(&report, "PNGPixelAspectRatio"), Some("1.5000"));
    }

    #[test]
    fn zero_vertical_density_has_no_aspect_ratio() {
        let mut phys = 3u32.to_be_bytes().to_vec();
        phys.extend_from_slice(&0u32.to_be_bytes());
        phys.push(0);
        let report = scan_container(&png(&[ihdr(2, 2, 8, 0, 0), chunk(b"pHYs", &phys)]));
        assert!(report.get("PNGPixelAspectRatio").is_none());
    }

    #[test]
    fn walk_stops_at_iend() {
        let mut data = png(&[ihdr(1, 1, 8, 6, 0)]);
        data.extend(chunk(b"iCCP", b"icc\0\0data"));
        let report = scan_container(&data);
        assert!(report.get("PNGICCProfile").is_none());
    }

    #[test]
    fn bogus_length_keeps_header_fields() {
        let mut data = SIGNATURE.to_vec();
        data.extend(ihdr(1, 1, 8, 6, 0));
        data.extend_from_slice(&0xFFFF_FF00u32.to_be_bytes());
        data.extend_from_slice(b"gAMA");
        data.extend_from_slice(&[0; 8]);
        let report = scan_container(&data);
        assert_eq!(text(&report, "HasAlpha"), Some("Yes"));
        assert!(report.get("PNGGamma").is_some());
    }

    #[test]
    fn truncated_header_yields_format_only() {
        let mut data = SIGNATURE.to_vec();
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&[0, 0, 0, 1]);
        let report = scan_container(&data);
        assert_eq!(report.len(), 1);
    }
}
