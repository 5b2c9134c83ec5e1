//! GIF header and logical screen descriptor.

use super::ScanReport;
use super::reader::{ByteReader, ScanError};
use crate::metadata::value::to_fixed;

pub(super) fn scan(r: &ByteReader, report: &mut ScanReport) {
    if let Err(err) = read_screen_descriptor(r, report) {
        log::debug!("GIF header truncated: {err}");
    }
}

fn read_screen_descriptor(r: &ByteReader, report: &mut ScanReport) -> Result<(), ScanError> {
    let version = String::from_utf8_lossy(r.bytes(3, 3)?);
    report.set("GIFVersion", format!("GIF{version}"));

    r.u16_le(6)?;
    r.u16_le(8)?;
    let packed = r.u8(10)?;

    let resolution = ((packed & 0x70) >> 4) + 1;
    let table_size = 2u32 << (packed & 0x07);
    report.set_flag("GIFHasGlobalColorTable", packed & 0x80 != 0);
    report.set("GIFColorResolution", format!("{resolution} bits"));
    report.set("GIFColorTableSize", format!("{table_size} colors"));
    report.set("GIFBackgroundColor", r.u8(11)?);

    let aspect = r.u8(12)?;
    if aspect != 0 {
        let ratio = (f64::from(aspect) + 15.0) / 64.0;
        report.set("GIFPixelAspectRatio", to_fixed(ratio, 4));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::scan_container;
    use super::*;

    fn text<'a>(report: &'a ScanReport, key: &str) -> Option<&'a str> {
        report.get(key).and_then(|v| v.as_text())
    }

    fn header(version: &[u8; 3], packed: u8, background: u8, aspect: u8) -> Vec<u8> {
        let mut out = b"GIF".to_vec();
        out.extend_from_slice(version);
        out.extend_from_slice(&320u16.to_le_bytes());
        out.extend_from_slice(&200u16.to_le_bytes());
        out.extend_from_slice(&[packed, background, aspect]);
        out
    }

    #[test]
    fn logical_screen_descriptor() {
        // global table, 8-bit resolution, 256 entries
        let report = scan_container(&header(b"89a", 0xF7, 3, 0));
        assert_eq!(text(&report, "FileFormat"), Some("GIF"));
        assert_eq!(text(&report, "GIFVersion"), Some("GIF89a"));
        assert_eq!(text(&report, "GIFHasGlobalColorTable"), Some("Yes"));
        assert_eq!(text(&report, "GIFColorResolution"), Some("8 bits"));
        assert_eq!(text(&report, "GIFColorTableSize"), Some("256 colors"));
        assert_eq!(report.get("GIFBackgroundColor").unwrap().as_f64(), Some(3.0));
        assert!(report.get("GIFPixelAspectRatio").is_none());
    }

    #[test]
    fn no_global_table_and_aspect_ratio() {
        let report = scan_container(&header(b"87a", 0x00, 0, 49));
        assert_eq!(text(&report, "GIFVersion"), Some("GIF87a"));
        assert_eq!(text(&report, "GIFHasGlobalColorTable"), Some("No"));
        assert_eq!(text(&report, "GIFColorResolution"), Some("1 bits"));
        assert_eq!(text(&report, "GIFColorTableSize"), Some("2 colors"));
        assert_eq!(text(&report, "GIFPixelAspectRatio"), Some("1.0000"));
    }

    #[test]
    fn truncated_keeps_version() {
        let report = scan_container(b"GIF89a\x01\x00");
        assert_eq!(text(&report, "GIFVersion"), Some("GIF89a"));
        assert!(report.get("GIFColorTableSize").is_none());
    }
}
