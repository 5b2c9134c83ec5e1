//! IPTC-IIM decoding for APP13 segments and TIFF IPTC tags.
//!
//! Reads three Record 2 datasets into the scan report:
//!
//! | Dataset | Field |
//! |---|---|
//! | 2:05 | `ObjectName` |
//! | 2:25 | `Keywords` (repeatable) |
//! | 2:120 | `Caption` |
//!
//! JPEG carries IIM inside a Photoshop 8BIM resource (id 0x0404) in APP13;
//! TIFF stores it under IFD tag 33723 or inside a 8BIM block under 34377.

use super::ScanReport;
use super::reader::{ByteReader, ScanError};

const PHOTOSHOP_HEADER: &[u8] = b"Photoshop 3.0\0";
const BIM_MARKER: &[u8] = b"8BIM";
const IPTC_RESOURCE_ID: u16 = 0x0404;

/// Record 2 datasets found in one IIM block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IptcFields {
    pub object_name: Option<String>,
    pub caption: Option<String>,
    pub keywords: Vec<String>,
}

impl IptcFields {
    pub fn is_empty(&self) -> bool {
        self.object_name.is_none() && self.caption.is_none() && self.keywords.is_empty()
    }

    pub(crate) fn write_to(self, report: &mut ScanReport) {
        if let Some(name) = self.object_name {
            report.set("ObjectName", name);
        }
        if let Some(caption) = self.caption {
            report.set("Caption", caption);
        }
        if !self.keywords.is_empty() {
            report.set("Keywords", self.keywords);
        }
    }
}

/// Decode IIM datasets.
///
/// Each dataset is `0x1C`, record, dataset, big-endian u16 length, data.
/// Bytes between datasets are skipped; a length running past the end stops
/// decoding.
pub fn parse_iim(data: &[u8]) -> IptcFields {
    let r = ByteReader::new(data);
    let mut fields = IptcFields::default();
    let mut pos = 0;

    while pos + 5 <= data.len() {
        if data[pos] != 0x1C {
            pos += 1;
            continue;
        }
        let Ok(header) = r.bytes(pos + 1, 4) else {
            break;
        };
        let (record, dataset) = (header[0], header[1]);
        let length = u16::from_be_bytes([header[2], header[3]]) as usize;
        pos += 5;

        let Ok(payload) = r.bytes(pos, length) else {
            break;
        };
        if record == 2 {
            let value = String::from_utf8_lossy(payload).trim().to_string();
            if !value.is_empty() {
                match dataset {
                    5 => fields.object_name = Some(value),
                    25 => fields.keywords.push(value),
                    120 => fields.caption = Some(value),
                    _ => {}
                }
            }
        }
        pos += length;
    }

    fields
}

/// Locate the IIM block inside Photoshop image resources.
///
/// Accepts data with or without the `Photoshop 3.0\0` prefix. Each resource
/// is `8BIM`, u16 id, even-padded Pascal name, u32 size, even-padded data.
pub fn find_in_8bim(segment: &[u8]) -> Option<&[u8]> {
    let data = segment.strip_prefix(PHOTOSHOP_HEADER).unwrap_or(segment);
    let r = ByteReader::new(data);
    let mut pos = 0;

    while pos + 12 <= data.len() {
        if &data[pos..pos + 4] != BIM_MARKER {
            pos += 1;
            continue;
        }
        match read_resource(&r, pos + 4) {
            Ok((IPTC_RESOURCE_ID, payload, _)) => return Some(payload),
            Ok((_, _, next)) => pos = next,
            Err(_) => break,
        }
    }
    None
}

/// Read one resource after its `8BIM` marker: `(id, payload, next offset)`.
fn read_resource<'a>(
    r: &ByteReader<'a>,
    mut pos: usize,
) -> Result<(u16, &'a [u8], usize), ScanError> {
    let resource_id = r.u16_be(pos)?;
    pos += 2;
    let name_len = r.u8(pos)? as usize;
    pos += 1 + name_len + ((1 + name_len) % 2);
    let size = r.u32_be(pos)? as usize;
    pos += 4;
    let payload = r.bytes(pos, size)?;
    Ok((resource_id, payload, pos + size + (size % 2)))
}
