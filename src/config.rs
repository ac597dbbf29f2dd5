//! Application configuration.
//!
//! Settings live in an optional `config.toml` inside the data directory. The
//! stock defaults are the base layer; a user file only needs the keys it wants
//! to change, and unknown keys are rejected to catch typos early.
//!
//! ```toml
//! [storage]
//! key = "cvpress_cvs"        # Store key holding the CV collection
//!
//! [export]
//! scale = 2.0                # Rasterization upscaling factor
//! page_width_mm = 210.0      # A4
//! page_height_mm = 297.0
//! css_width_px = 794         # Offscreen container width (210mm at 96 dpi)
//! trailing_page = "keep"     # "keep" | "trim"
//!
//! [photo]
//! output_size = 200          # Cropped photo edge in pixels
//! quality = 80               # JPEG quality (1-100)
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::export::PageBreakRule;

/// Name of the config file inside the data directory.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub export: ExportConfig,
    pub photo: PhotoConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = &self.storage.key;
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::Validation(
                "storage.key must be non-empty and use only letters, digits, '_' or '-'".into(),
            ));
        }
        if !(self.export.scale > 0.0 && self.export.scale <= 8.0) {
            return Err(ConfigError::Validation(
                "export.scale must be in (0, 8]".into(),
            ));
        }
        if self.export.page_width_mm <= 0.0 || self.export.page_height_mm <= 0.0 {
            return Err(ConfigError::Validation(
                "export page dimensions must be positive".into(),
            ));
        }
        if self.export.css_width_px == 0 {
            return Err(ConfigError::Validation(
                "export.css_width_px must be non-zero".into(),
            ));
        }
        if self.photo.output_size == 0 {
            return Err(ConfigError::Validation(
                "photo.output_size must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.photo.quality) {
            return Err(ConfigError::Validation(
                "photo.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Key of the single blob holding every CV record.
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: "cvpress_cvs".to_string(),
        }
    }
}

/// What to do when the rendered height is an exact multiple of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingPage {
    /// Emit the extra trailing page, as earlier exports always did.
    #[default]
    Keep,
    /// Stop once the content is fully placed.
    Trim,
}

impl From<TrailingPage> for PageBreakRule {
    fn from(value: TrailingPage) -> Self {
        match value {
            TrailingPage::Keep => PageBreakRule::Inclusive,
            TrailingPage::Trim => PageBreakRule::Exclusive,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Upscaling factor applied when rasterizing the document.
    pub scale: f64,
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    /// CSS pixel width of the offscreen render container.
    pub css_width_px: u32,
    pub trailing_page: TrailingPage,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            css_width_px: 794,
            trailing_page: TrailingPage::Keep,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhotoConfig {
    /// Edge length of the square cropped photo, in pixels.
    pub output_size: u32,
    /// JPEG encoding quality.
    pub quality: u32,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            output_size: 200,
            quality: 80,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(AppConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
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

/// Read a config file as a raw TOML value. `Ok(None)` if it does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `config.toml` from the data directory, falling back to stock defaults.
pub fn load_config(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    load_config_file(&data_dir.join(CONFIG_FILENAME))
}

/// Load an explicit config file path, falling back to stock defaults if absent.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    let config = resolve_config(overlay)?;
    tracing::debug!(path = %path.display(), "configuration resolved");
    Ok(config)
}

/// Fully-commented stock `config.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# cvpress configuration
# =====================
# All settings are optional. Values shown below are the defaults.
# Place this file at <data-dir>/config.toml. Unknown keys are an error.

# ---------------------------------------------------------------------------
# Storage
# ---------------------------------------------------------------------------
[storage]
# Key of the single JSON blob that holds every CV. The file store keeps it
# at <data-dir>/<key>.json.
key = "cvpress_cvs"

# ---------------------------------------------------------------------------
# PDF export
# ---------------------------------------------------------------------------
[export]
# Upscaling factor for rasterization. 2 keeps text sharp when printed.
scale = 2.0

# Physical page size in millimetres (A4 portrait).
page_width_mm = 210.0
page_height_mm = 297.0

# Width of the offscreen render container in CSS pixels (210mm at 96 dpi).
css_width_px = 794

# When the document height is an exact multiple of the page height, "keep"
# emits one extra trailing page (the historical behaviour); "trim" does not.
trailing_page = "keep"

# ---------------------------------------------------------------------------
# Profile photo
# ---------------------------------------------------------------------------
[photo]
# Edge length of the square cropped photo in pixels.
output_size = 200

# JPEG quality of the cropped photo (1-100).
quality = 80
"##
}
