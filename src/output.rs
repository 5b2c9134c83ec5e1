//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Palette
//!
//! ```text
//! 001 #306898  62.50%  SteelBlue
//!     rgb(48, 104, 152)  hsl(208, 52%, 39%)  cmyk(68%, 32%, 0%, 40%)
//!     on white 6.26:1 AA  on black 3.36:1 AA Large
//!     tints #9fbfdf … #5a8ec2  shades #264d73 … #0d1a26
//! 002 #f8f8f8  37.50%  WhiteSmoke
//!     ...
//! ```
//!
//! ## Metadata
//!
//! ```text
//! Camera:   Canon EOS R5
//! Taken:    Jul 4, 2023, 09:05 AM
//! Lens:     RF24-70mm F2.8 L IS USM
//! Settings: f/2.8 • 1/250s • ISO 200 • 35mm
//!
//! Basic (6)
//!     File Name: photo.jpg
//!     ...
//! GPS (4)
//!     Latitude: 40.446111 (sensitive)
//!
//! Location: 40.446111, -79.982222
//!     map:   https://www.google.com/maps?q=40.446111,-79.982222
//!     embed: https://www.openstreetmap.org/export/embed.html?bbox=…
//! ```
//!
//! ## Favicon
//!
//! ```text
//! favicon.ico (image/x-icon, 3 sizes, 2.1 KB)
//!     16x16  412 B
//!     32x32  903 B
//!     48x48  1.4 KB
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::favicon::ICO_MIME;
use crate::metadata::format::format_file_size;
use crate::metadata::gps;
use crate::metadata::{CategorizedView, MetadataRecord, MetadataSummary};
use crate::palette::{PaletteEntry, Rgb, WcagGrade, contrast_ratio, shades};
use std::path::{Path, PathBuf};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

// ============================================================================
// Palette
// ============================================================================

fn contrast_note(label: &str, color: Rgb, against: Rgb) -> String {
    let ratio = contrast_ratio(color, against);
    format!(
        "on {} {:.2}:1 {}",
        label,
        ratio,
        WcagGrade::for_ratio(ratio).label()
    )
}

/// Format a palette as one header line per color with indented details.
pub fn format_palette(palette: &[PaletteEntry]) -> Vec<String> {
    if palette.is_empty() {
        return vec!["No colors found (image is empty or fully transparent)".to_string()];
    }
    let white = Rgb::new(255, 255, 255);
    let black = Rgb::new(0, 0, 0);
    let mut lines = Vec::new();
    for (i, entry) in palette.iter().enumerate() {
        lines.push(format!(
            "{} {}  {:>6.2}%  {}",
            format_index(i + 1),
            entry.hex,
            entry.percent,
            entry.name()
        ));
        lines.push(format!(
            "{}{}  {}  {}",
            indent(1),
            entry.rgb,
            entry.hsl,
            entry.cmyk()
        ));
        lines.push(format!(
            "{}{}  {}",
            indent(1),
            contrast_note("white", entry.rgb, white),
            contrast_note("black", entry.rgb, black)
        ));
        let steps = shades(entry.rgb);
        lines.push(format!(
            "{}tints {}  shades {}",
            indent(1),
            steps.tints.join(" "),
            steps.shades.join(" ")
        ));
    }
    lines
}

pub fn print_palette(palette: &[PaletteEntry]) {
    for line in format_palette(palette) {
        println!("{}", line);
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Format the summary block followed by every non-empty category.
pub fn format_metadata(summary: &MetadataSummary, view: &CategorizedView) -> Vec<String> {
    let mut lines = vec![
        format!("Camera:   {}", summary.camera),
        format!("Taken:    {}", summary.date_taken),
        format!("Lens:     {}", summary.lens),
        format!("Settings: {}", summary.settings),
    ];
    for (category, rows) in view.non_empty() {
        lines.push(String::new());
        lines.push(format!("{} ({})", category.label(), rows.len()));
        for row in rows {
            let flag = if row.sensitive { " (sensitive)" } else { "" };
            lines.push(format!("{}{}: {}{}", indent(1), row.name, row.value, flag));
        }
    }
    let sensitive = view
        .non_empty()
        .flat_map(|(_, rows)| rows.iter())
        .filter(|row| row.sensitive)
        .count();
    if sensitive > 0 {
        lines.push(String::new());
        lines.push(format!(
            "{} field{} may reveal location or identity",
            sensitive,
            if sensitive == 1 { "" } else { "s" }
        ));
    }
    lines
}

pub fn print_metadata(summary: &MetadataSummary, view: &CategorizedView) {
    for line in format_metadata(summary, view) {
        println!("{}", line);
    }
}

/// Format the resolved position with its map and embed links; empty when
/// the record has no position.
pub fn format_location(record: &MetadataRecord) -> Vec<String> {
    let Some((lat, lng)) = gps::coordinates(record) else {
        return Vec::new();
    };
    let mut lines = vec![format!("Location: {:.6}, {:.6}", lat, lng)];
    if let Some(link) = record.get("GPSMapLink").and_then(|v| v.as_text()) {
        lines.push(format!("{}map:   {}", indent(1), link));
    }
    lines.push(format!(
        "{}embed: {}",
        indent(1),
        gps::osm_embed_url(lat, lng)
    ));
    lines
}

pub fn print_location(record: &MetadataRecord) {
    let lines = format_location(record);
    if lines.is_empty() {
        return;
    }
    println!();
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Favicon
// ============================================================================

/// Format the written ICO and its entries.
pub fn format_favicon_output(path: &Path, ico_len: usize, entries: &[(u32, usize)]) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({}, {} size{}, {})",
        path.display(),
        ICO_MIME,
        entries.len(),
        if entries.len() == 1 { "" } else { "s" },
        format_file_size(ico_len as u64)
    )];
    for (size, len) in entries {
        lines.push(format!(
            "{}{}x{}  {}",
            indent(1),
            size,
            size,
            format_file_size(*len as u64)
        ));
    }
    lines
}

pub fn print_favicon_output(path: &Path, ico_len: usize, entries: &[(u32, usize)]) {
    for line in format_favicon_output(path, ico_len, entries) {
        println!("{}", line);
    }
}

/// One line per file written alongside the main output.
pub fn format_written(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| format!("Wrote {}", p.display()))
        .collect()
}

pub fn print_written(paths: &[PathBuf]) {
    for line in format_written(paths) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{FieldRow, MetadataRecord, categorize};

    // =========================================================================
    // Palette
    // =========================================================================

    #[test]
    fn palette_lines_per_color() {
        let palette = vec![
            PaletteEntry::new(Rgb::new(0x30, 0x68, 0x98), 62.5),
            PaletteEntry::new(Rgb::new(255, 255, 255), 37.5),
        ];
        let lines = format_palette(&palette);
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "001 #306898   62.50%  SteelBlue");
        assert!(lines[1].starts_with("    rgb(48, 104, 152)  hsl("));
        assert!(lines[2].starts_with("    on white "));
        assert!(lines[4].starts_with("002 #ffffff"));
        assert!(lines[6].contains("on black 21.00:1 AAA"));
    }

    #[test]
    fn palette_lists_tints_and_shades() {
        let base = Rgb::new(0x33, 0x66, 0x99);
        let steps = shades(base);
        let lines = format_palette(&[PaletteEntry::new(base, 100.0)]);
        let line = &lines[3];
        assert!(line.starts_with("    tints "));
        assert!(line.contains(&steps.tints.join(" ")));
        assert!(line.ends_with(&format!("shades {}", steps.shades.join(" "))));
    }

    #[test]
    fn empty_palette_message() {
        let lines = format_palette(&[]);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("No colors found"));
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    fn summary() -> MetadataSummary {
        MetadataSummary {
            camera: "Canon EOS R5".into(),
            date_taken: "-".into(),
            lens: "-".into(),
            settings: "f/2.8".into(),
        }
    }

    #[test]
    fn metadata_sections() {
        let mut record = MetadataRecord::new();
        record.insert("FileName", "photo.jpg");
        record.insert("Make", "Canon");
        let view = categorize(&record);
        let lines = format_metadata(&summary(), &view);
        assert_eq!(lines[0], "Camera:   Canon EOS R5");
        assert_eq!(lines[3], "Settings: f/2.8");
        assert!(lines.contains(&"Basic (1)".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("    ") && l.ends_with(": Canon")));
        assert!(!lines.iter().any(|l| l.contains("may reveal")));
    }

    #[test]
    fn sensitive_rows_are_flagged() {
        let view = CategorizedView {
            gps: vec![FieldRow {
                key: "GPSLatitude".into(),
                name: "Latitude".into(),
                value: "40.446111".into(),
                sensitive: true,
            }],
            ..CategorizedView::default()
        };
        let lines = format_metadata(&summary(), &view);
        assert!(lines.contains(&"GPS (1)".to_string()));
        assert!(lines.contains(&"    Latitude: 40.446111 (sensitive)".to_string()));
        assert_eq!(lines.last().unwrap(), "1 field may reveal location or identity");
    }

    #[test]
    fn location_lines_with_links() {
        let mut record = MetadataRecord::new();
        record.insert("GPSLatitudeDecimal", "10.000000");
        record.insert("GPSLongitudeDecimal", "20.000000");
        record.insert("GPSMapLink", "https://www.google.com/maps?q=10,20");
        let lines = format_location(&record);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Location: 10.000000, 20.000000");
        assert_eq!(lines[1], "    map:   https://www.google.com/maps?q=10,20");
        assert_eq!(
            lines[2],
            format!("    embed: {}", gps::osm_embed_url(10.0, 20.0))
        );
        assert!(lines[2].contains("marker=10%2C20"));
    }

    #[test]
    fn no_location_without_both_axes() {
        let mut record = MetadataRecord::new();
        record.insert("GPSLatitudeDecimal", "10.000000");
        assert!(format_location(&record).is_empty());
    }

    // =========================================================================
    // Favicon
    // =========================================================================

    #[test]
    fn favicon_summary() {
        let lines = format_favicon_output(Path::new("favicon.ico"), 2048, &[(16, 400), (32, 900)]);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("favicon.ico (image/x-icon, 2 sizes, "));
        assert!(lines[1].starts_with("    16x16  "));
    }

    #[test]
    fn written_paths() {
        let lines = format_written(&[PathBuf::from("out/palette.css")]);
        assert_eq!(lines, vec!["Wrote out/palette.css"]);
    }
}
