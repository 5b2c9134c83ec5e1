//! WebP RIFF header.
//!
//! Only the first chunk is inspected. For the extended format the VP8X
//! feature byte at offset 20 carries presence bits:
//!
//! | Bit | Field |
//! |---|---|
//! | `0x20` | `WebPHasICC` |
//! | `0x10` | `WebPHasAlpha` |
//! | `0x08` | `WebPHasEXIF` |
//! | `0x04` | `WebPHasXMP` |
//! | `0x02` | `WebPHasAnimation` |

use super::ScanReport;
use super::reader::{ByteReader, ScanError};
use crate::metadata::format::format_file_size;

const FEATURE_FLAGS: [(&str, u8); 5] = [
    ("WebPHasICC", 0x20),
    ("WebPHasAlpha", 0x10),
    ("WebPHasEXIF", 0x08),
    ("WebPHasXMP", 0x04),
    ("WebPHasAnimation", 0x02),
];

pub(super) fn scan(r: &ByteReader, report: &mut ScanReport) {
    if let Err(err) = read_header(r, report) {
        log::debug!("WebP header truncated: {err}");
    }
}

fn read_header(r: &ByteReader, report: &mut ScanReport) -> Result<(), ScanError> {
    // RIFF size excludes the 8-byte RIFF header itself
    let riff_size = r.u32_le(4)?;
    report.set("WebPFileSize", format_file_size(u64::from(riff_size) + 8));

    match &r.tag(12)? {
        b"VP8 " => report.set("WebPFormat", "Lossy (VP8)"),
        b"VP8L" => report.set("WebPFormat", "Lossless (VP8L)"),
        b"VP8X" => {
            report.set("WebPFormat", "Extended (VP8X)");
            let flags = r.u8(20)?;
            for (key, bit) in FEATURE_FLAGS {
                report.set_flag(key, flags & bit != 0);
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::scan_container;
    use super::*;

    fn webp(chunk: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = b"RIFF".to_vec();
        out.extend_from_slice(&((payload.len() + 12) as u32).to_le_bytes());
        out.extend_from_slice(b"WEBP");
        out.extend_from_slice(chunk);
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        out
    }

    fn text<'a>(report: &'a ScanReport, key: &str) -> Option<&'a str> {
        report.get(key).and_then(|v| v.as_text())
    }

    #[test]
    fn lossy_and_lossless() {
        let report = scan_container(&webp(b"VP8 ", &[0; 10]));
        assert_eq!(text(&report, "FileFormat"), Some("WebP"));
        assert_eq!(text(&report, "WebPFormat"), Some("Lossy (VP8)"));
        assert_eq!(text(&report, "WebPFileSize"), Some("30 Bytes"));

        let report = scan_container(&webp(b"VP8L", &[0; 5]));
        assert_eq!(text(&report, "WebPFormat"), Some("Lossless (VP8L)"));
        assert!(report.get("WebPHasAlpha").is_none());
    }

    #[test]
    fn extended_feature_flags() {
        let mut payload = vec![0x10 | 0x08 | 0x02];
        payload.extend_from_slice(&[0; 9]);
        let report = scan_container(&webp(b"VP8X", &payload));
        assert_eq!(text(&report, "WebPFormat"), Some("Extended (VP8X)"));
        assert_eq!(text(&report, "WebPHasICC"), Some("No"));
        assert_eq!(text(&report, "WebPHasAlpha"), Some("Yes"));
        assert_eq!(text(&report, "WebPHasEXIF"), Some("Yes"));
        assert_eq!(text(&report, "WebPHasXMP"), Some("No"));
        assert_eq!(text(&report, "WebPHasAnimation"), Some("Yes"));
    }

    #[test]
    fn truncated_keeps_file_size() {
        let report = scan_container(b"RIFF\x10\0\0\0WEBPVP8");
        assert_eq!(text(&report, "WebPFileSize"), Some("24 Bytes"));
        assert!(report.get("WebPFormat").is_none());
    }
}
