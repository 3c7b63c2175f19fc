//! Configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by the user's file, key by key.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [storage]
//! root = "storage/app"                          # Images live under {root}/images
//! public_url = "http://localhost/storage/app"   # URL prefix for images/{filename}
//!
//! [images]
//! quality = 80                                  # JPEG quality (1-100)
//!
//! [presets]                                     # name = [width, height]
//! big = [800, 600]
//! icon = [48, 48]
//! small = [96, 96]
//! medium = [400, 400]
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Entries under `[presets]` are added to the
//! built-in ones (or replace one with the same name):
//!
//! ```toml
//! [presets]
//! banner = [1200, 300]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Dimensions, Quality};
use crate::presets::{ORIGINAL, PresetTable};
use crate::store::VariantConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the config directory.
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

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where files are stored and how they are served.
    pub storage: StorageConfig,
    /// Encoding settings.
    pub images: ImagesConfig,
    /// Size presets: name → `[width, height]`.
    pub presets: BTreeMap<String, [u32; 2]>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            images: ImagesConfig::default(),
            presets: PresetTable::default()
                .iter()
                .map(|(name, dims)| (name.to_string(), [dims.width, dims.height]))
                .collect(),
        }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.quality == 0 || self.images.quality > 100 {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.storage.public_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "storage.public_url must not be empty".into(),
            ));
        }
        if self.presets.contains_key(ORIGINAL) {
            return Err(ConfigError::Validation(format!(
                "presets.{ORIGINAL} is reserved for the unresized image"
            )));
        }
        for (name, [w, h]) in &self.presets {
            if *w == 0 || *h == 0 {
                return Err(ConfigError::Validation(format!(
                    "presets.{name} dimensions must be non-zero"
                )));
            }
        }
        Ok(())
    }

    /// The preset table described by `[presets]`.
    pub fn preset_table(&self) -> PresetTable {
        PresetTable::from_entries(
            self.presets
                .iter()
                .map(|(name, [w, h])| (name.clone(), Dimensions::new(*w, *h))),
        )
    }

    /// Settings for variant operations.
    pub fn variant_config(&self) -> VariantConfig {
        VariantConfig {
            presets: self.preset_table(),
            quality: Quality::new(self.images.quality),
        }
    }
}

/// Storage location settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding the `images/` tree.
    pub root: PathBuf,
    /// Public URL the root directory is served under.
    pub public_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("storage/app"),
            public_url: "http://localhost/storage/app".to_string(),
        }
    }
}

/// Encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default().value(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
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

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A relative `storage.root` is resolved against
/// the config directory.
pub fn load_config(dir: &Path) -> Result<Config, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    let mut config = resolve_config(base, overlay)?;
    if config.storage.root.is_relative() {
        config.storage.root = dir.join(&config.storage.root);
    }
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# image-presets configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Storage
# ---------------------------------------------------------------------------
[storage]
# Directory holding the images/ tree. Relative paths are resolved against
# the directory this file lives in.
root = "storage/app"

# Public URL under which the root directory is served. Variant URLs are
# this prefix followed by images/{filename}.
public_url = "http://localhost/storage/app"

# ---------------------------------------------------------------------------
# Encoding
# ---------------------------------------------------------------------------
[images]
# JPEG quality (1 = worst, 100 = best). PNG, TIFF and WebP are lossless.
quality = 80

# ---------------------------------------------------------------------------
# Size presets
# ---------------------------------------------------------------------------
# name = [width, height]. Variants are fitted to exactly these dimensions
# (scaled to cover, then center-cropped). Entries here are added to the
# built-in presets; "original" is reserved.
[presets]
big = [800, 600]
icon = [48, 48]
medium = [400, 400]
small = [96, 96]
"##
}
