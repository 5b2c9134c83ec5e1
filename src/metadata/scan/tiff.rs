//! TIFF byte order and IPTC lookup.
//!
//! After recording the byte order, the IFD chain is walked for the two tags
//! that can carry IPTC-IIM: 33723 (raw IIM) and 34377 (Photoshop resources).
//! The first one that decodes to a non-empty block wins.

use super::ScanReport;
use super::iptc::{self, IptcFields};
use super::reader::{ByteReader, ScanError};

const TAG_IPTC_NAA: u16 = 33723;
const TAG_PHOTOSHOP: u16 = 34377;
const TIFF_MAGIC: u16 = 42;
const ENTRY_SIZE: usize = 12;
/// Guards against IFD chains that loop back on themselves.
const MAX_IFDS: usize = 64;

pub(super) fn scan(r: &ByteReader, big_endian: bool, report: &mut ScanReport) {
    report.set(
        "ByteOrder",
        if big_endian {
            "Big-endian (Motorola)"
        } else {
            "Little-endian (Intel)"
        },
    );
    match find_iptc(r, big_endian) {
        Ok(Some(fields)) => fields.write_to(report),
        Ok(None) => {}
        Err(err) => log::debug!("TIFF IFD walk stopped: {err}"),
    }
}

/// Size in bytes of one value of a TIFF field type.
fn type_size(field_type: u16) -> usize {
    match field_type {
        3 | 8 => 2,
        4 | 9 | 11 => 4,
        5 | 10 | 12 => 8,
        _ => 1,
    }
}

fn find_iptc(r: &ByteReader, big_endian: bool) -> Result<Option<IptcFields>, ScanError> {
    if r.u16_with(2, big_endian)? != TIFF_MAGIC {
        return Ok(None);
    }
    let mut ifd = r.u32_with(4, big_endian)? as usize;

    for _ in 0..MAX_IFDS {
        if ifd == 0 || ifd + 2 >= r.len() {
            break;
        }
        let count = r.u16_with(ifd, big_endian)? as usize;
        let entries = ifd + 2;

        for i in 0..count {
            let entry = entries + i * ENTRY_SIZE;
            let tag = r.u16_with(entry, big_endian)?;
            if tag != TAG_IPTC_NAA && tag != TAG_PHOTOSHOP {
                continue;
            }
            let field_type = r.u16_with(entry + 2, big_endian)?;
            let value_count = r.u32_with(entry + 4, big_endian)? as usize;
            let offset = r.u32_with(entry + 8, big_endian)? as usize;
            let Some(byte_len) = value_count.checked_mul(type_size(field_type)) else {
                continue;
            };
            let Ok(payload) = r.bytes(offset, byte_len) else {
                continue;
            };

            let iim = if tag == TAG_IPTC_NAA {
                Some(payload)
            } else {
                iptc::find_in_8bim(payload)
            };
            if let Some(fields) = iim.map(iptc::parse_iim).filter(|f| !f.is_empty()) {
                return Ok(Some(fields));
            }
        }

        ifd = r.u32_with(entries + count * ENTRY_SIZE, big_endian)? as usize;
    }
    Ok(None)
}
