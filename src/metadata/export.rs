//! Record exports: pretty JSON and the plain "copy all" text dump.

use super::format::{format_value, friendly_name};
use super::record::MetadataRecord;
use super::value::BINARY_SENTINEL;

const RULE_WIDTH: usize = 50;

/// Pretty-printed JSON object in record order. Dates are ISO-8601 strings,
/// blobs the binary sentinel.
pub fn to_json(record: &MetadataRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(record)
}

/// One `Name: value` line per field under a title and a rule. Names come from
/// the friendly-name table, falling back to the raw key. Fields whose
/// formatted value is the binary sentinel are left out.
pub fn to_text(record: &MetadataRecord, file_name: &str) -> String {
    let mut text = format!("Image Metadata: {file_name}\n");
    text.push_str(&"═".repeat(RULE_WIDTH));
    text.push_str("\n\n");
    for (key, value) in record.iter() {
        let formatted = format_value(key, value);
        if formatted == BINARY_SENTINEL {
            continue;
        }
        let name = friendly_name(key).unwrap_or(key);
        text.push_str(&format!("{name}: {formatted}\n"));
    }
    text
}
