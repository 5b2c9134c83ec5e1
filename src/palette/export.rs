//! Palette export as stylesheet variables, a Tailwind config or JSON.

use super::PaletteEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Css,
    Scss,
    Tailwind,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Css,
        ExportFormat::Scss,
        ExportFormat::Tailwind,
        ExportFormat::Json,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Css => "css",
            ExportFormat::Scss => "scss",
            ExportFormat::Tailwind => "tailwind",
            ExportFormat::Json => "json",
        }
    }

    /// File extension of the downloadable export.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Css => "css",
            ExportFormat::Scss => "scss",
            ExportFormat::Tailwind => "js",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown export format '{s}' (expected css, scss, tailwind or json)"))
    }
}

#[derive(Serialize)]
struct JsonPalette<'a> {
    name: &'a str,
    colors: Vec<JsonColor>,
}

#[derive(Serialize)]
struct JsonColor {
    id: String,
    hex: String,
    rgb: String,
    hsl: String,
    percentage: String,
}

/// Render a palette. Colors are numbered from 1 in palette order.
pub fn render(palette: &[PaletteEntry], format: ExportFormat) -> String {
    match format {
        ExportFormat::Css => {
            let vars: Vec<String> = palette
                .iter()
                .enumerate()
                .map(|(i, c)| format!("  --color-{}: {};", i + 1, c.hex))
                .collect();
            format!(":root {{\n{}\n}}", vars.join("\n"))
        }
        ExportFormat::Scss => {
            let vars: Vec<String> = palette
                .iter()
                .enumerate()
                .map(|(i, c)| format!("$color-{}: {};", i + 1, c.hex))
                .collect();
            let map: Vec<String> = palette
                .iter()
                .enumerate()
                .map(|(i, c)| format!("  'color-{}': {}", i + 1, c.hex))
                .collect();
            format!(
                "// Color Palette Variables\n{}\n\n// As a map\n$palette: (\n{}\n);",
                vars.join("\n"),
                map.join(",\n")
            )
        }
        ExportFormat::Tailwind => {
            let colors: Vec<String> = palette
                .iter()
                .enumerate()
                .map(|(i, c)| format!("        'brand-{}': '{}'", i + 1, c.hex))
                .collect();
            format!(
                "// tailwind.config.js\nmodule.exports = {{\n  theme: {{\n    extend: {{\n      colors: {{\n{}\n      }}\n    }}\n  }}\n}}",
                colors.join(",\n")
            )
        }
        ExportFormat::Json => {
            let doc = JsonPalette {
                name: "Extracted Palette",
                colors: palette
                    .iter()
                    .enumerate()
                    .map(|(i, c)| JsonColor {
                        id: format!("color-{}", i + 1),
                        hex: c.hex.clone(),
                        rgb: c.rgb.to_string(),
                        hsl: c.hsl.to_string(),
                        percentage: format!("{:.2}%", c.percent),
                    })
                    .collect(),
            };
            serde_json::to_string_pretty(&doc).unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::color::Rgb;

    fn palette() -> Vec<PaletteEntry> {
        vec![
            PaletteEntry::new(Rgb::new(0x33, 0x66, 0x99), 62.5),
            PaletteEntry::new(Rgb::new(0xff, 0xff, 0xff), 12.0),
        ]
    }

    #[test]
    fn css_variables() {
        assert_eq!(
            render(&palette(), ExportFormat::Css),
            ":root {\n  --color-1: #336699;\n  --color-2: #ffffff;\n}"
        );
    }

    #[test]
    fn scss_variables_and_map() {
        let out = render(&palette(), ExportFormat::Scss);
        assert!(out.starts_with("// Color Palette Variables\n$color-1: #336699;\n$color-2: #ffffff;\n\n"));
        assert!(out.ends_with("$palette: (\n  'color-1': #336699,\n  'color-2': #ffffff\n);"));
    }

    #[test]
    fn tailwind_config() {
        let out = render(&palette(), ExportFormat::Tailwind);
        assert!(out.contains("        'brand-1': '#336699',\n        'brand-2': '#ffffff'\n"));
        assert!(out.starts_with("// tailwind.config.js\nmodule.exports = {"));
    }

    #[test]
    fn json_document() {
        let out = render(&palette(), ExportFormat::Json);
        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(doc["name"], "Extracted Palette");
        assert_eq!(doc["colors"][0]["id"], "color-1");
        assert_eq!(doc["colors"][0]["rgb"], "rgb(51, 102, 153)");
        assert_eq!(doc["colors"][0]["hsl"], "hsl(210, 50%, 40%)");
        assert_eq!(doc["colors"][0]["percentage"], "62.50%");
    }

    #[test]
    fn format_names_and_extensions() {
        assert_eq!("SCSS".parse::<ExportFormat>(), Ok(ExportFormat::Scss));
        assert!("less".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Tailwind.extension(), "js");
        assert_eq!(ExportFormat::default(), ExportFormat::Css);
    }
}
