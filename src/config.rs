//! Tool configuration.
//!
//! Settings come from an optional `config.toml` (the working directory's, or
//! the file passed with `--config`). Stock defaults are serialized to a TOML
//! table first and the user file is merged on top, so a config file only
//! needs the keys it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [palette]
//! colors = 8                # Number of colors to extract (1-20)
//! max_sample_edge = 150     # Images are sampled at most this many px per edge
//! alpha_threshold = 128     # Pixels with lower alpha are ignored
//! quantize_step = 8         # Channel bucket width
//! candidate_factor = 5      # Buckets kept for clustering, per color
//! iterations = 10           # k-means rounds
//! format = "css"            # css | scss | tailwind | json
//!
//! [favicon]
//! sizes = [16, 32, 48]      # Entries in favicon.ico (each 1-256)
//! background = "transparent" # or "#rrggbb"
//!
//! [metadata]
//! include_thumbnail = true  # Ask for embedded thumbnail and orientation
//! map_url = "https://www.google.com/maps?q={lat},{lng}"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::favicon::{self, Background};
use crate::metadata::MetadataOptions;
use crate::metadata::gps::DEFAULT_MAP_URL;
use crate::palette::{ExportFormat, PaletteOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    pub palette: PaletteConfig,
    pub favicon: FaviconConfig,
    pub metadata: MetadataConfig,
}

impl ToolConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.palette;
        if !(1..=20).contains(&p.colors) {
            return Err(ConfigError::Validation(
                "palette.colors must be 1-20".into(),
            ));
        }
        if p.max_sample_edge == 0 {
            return Err(ConfigError::Validation(
                "palette.max_sample_edge must be non-zero".into(),
            ));
        }
        if p.quantize_step == 0 || p.candidate_factor == 0 {
            return Err(ConfigError::Validation(
                "palette.quantize_step and palette.candidate_factor must be non-zero".into(),
            ));
        }
        favicon::validate_sizes(&self.favicon.sizes)
            .map_err(|e| ConfigError::Validation(format!("favicon.sizes: {e}")))?;
        self.favicon.background()?;
        let url = &self.metadata.map_url;
        if !url.contains("{lat}") || !url.contains("{lng}") {
            return Err(ConfigError::Validation(
                "metadata.map_url must contain {lat} and {lng}".into(),
            ));
        }
        Ok(())
    }
}

/// Palette extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteConfig {
    pub colors: usize,
    pub max_sample_edge: u32,
    pub alpha_threshold: u8,
    pub quantize_step: u16,
    pub candidate_factor: usize,
    pub iterations: usize,
    /// Export format printed and written by default.
    pub format: ExportFormat,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        let options = PaletteOptions::default();
        Self {
            colors: options.colors,
            max_sample_edge: options.max_sample_edge,
            alpha_threshold: options.alpha_threshold,
            quantize_step: options.quantize_step,
            candidate_factor: options.candidate_factor,
            iterations: options.iterations,
            format: ExportFormat::default(),
        }
    }
}

impl PaletteConfig {
    pub fn options(&self) -> PaletteOptions {
        PaletteOptions {
            colors: self.colors,
            max_sample_edge: self.max_sample_edge,
            alpha_threshold: self.alpha_threshold,
            quantize_step: self.quantize_step,
            candidate_factor: self.candidate_factor,
            iterations: self.iterations,
        }
    }
}

/// Favicon generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FaviconConfig {
    /// Edge lengths packed into the ICO.
    pub sizes: Vec<u32>,
    /// `"transparent"` or `#rrggbb`.
    pub background: String,
}

impl Default for FaviconConfig {
    fn default() -> Self {
        Self {
            sizes: favicon::STANDARD_SIZES.to_vec(),
            background: Background::Transparent.to_string(),
        }
    }
}

impl FaviconConfig {
    pub fn background(&self) -> Result<Background, ConfigError> {
        self.background
            .parse()
            .map_err(|e| ConfigError::Validation(format!("favicon.background: {e}")))
    }
}

/// Metadata extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataConfig {
    pub include_thumbnail: bool,
    /// Map link template with `{lat}` and `{lng}` placeholders.
    pub map_url: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            include_thumbnail: true,
            map_url: DEFAULT_MAP_URL.to_string(),
        }
    }
}

impl MetadataConfig {
    pub fn options(&self) -> MetadataOptions {
        MetadataOptions {
            include_thumbnail: self.include_thumbnail,
            map_url: self.map_url.clone(),
        }
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ToolConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ToolConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ToolConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, `config.toml` in the working
/// directory is used when present and stock defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<ToolConfig, ConfigError> {
    let overlay = match path {
        Some(p) => {
            let content = fs::read_to_string(p)?;
            Some(toml::from_str(&content)?)
        }
        None => load_raw_config(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    if overlay.is_some() {
        log::debug!("merging user config over stock defaults");
    }
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imgrunner configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Palette extraction
# ---------------------------------------------------------------------------
[palette]
# Number of colors to extract (1-20).
colors = 8

# Images are downsampled so neither edge exceeds this many pixels.
max_sample_edge = 150

# Pixels with alpha below this value are ignored.
alpha_threshold = 128

# Width of the per-channel buckets colors are rounded into.
quantize_step = 8

# Number of buckets kept for clustering, as a multiple of `colors`.
candidate_factor = 5

# k-means refinement rounds.
iterations = 10

# Export format: "css", "scss", "tailwind" or "json".
format = "css"

# ---------------------------------------------------------------------------
# Favicon
# ---------------------------------------------------------------------------
[favicon]
# Edge lengths packed into favicon.ico, each 1-256.
sizes = [16, 32, 48]

# Canvas behind the image: "transparent" or a "#rrggbb" color.
background = "transparent"

# ---------------------------------------------------------------------------
# Metadata
# ---------------------------------------------------------------------------
[metadata]
# Read the embedded EXIF thumbnail and orientation.
include_thumbnail = true

# Map link for GPS positions. {lat} and {lng} are replaced by decimal degrees.
map_url = "https://www.google.com/maps?q={lat},{lng}"
"##
}
