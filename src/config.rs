//! Engine and output configuration.
//!
//! Configuration is optional. Without a file, every value falls back to the
//! defaults the image methods already use. A `raster.toml` tunes the engine's
//! allocation limit ([`RasterConfig::engine`]) and the output qualities read by
//! [`RasterImage::write_with_config`](crate::RasterImage::write_with_config)
//! and [`RasterImage::to_base64_with_config`](crate::RasterImage::to_base64_with_config).
//! `smoothing` is the flag callers hand to the `resized_to*` methods.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [engine]
//! max_pixels = 268435456    # Largest canvas area (width * height)
//!
//! [output]
//! jpeg_quality = 100        # Quality for file writes (passed to the encoder as is)
//! transport_quality = 67    # Quality for base64 transport strings (0-100)
//! smoothing = true          # Bilinear (true) or nearest-neighbor (false) resizing
//! ```
//!
//! Files are sparse: override just the values you want. Unknown keys are
//! rejected to catch typos early.

use crate::engine::{PixelEngine, pixel_engine::DEFAULT_MAX_PIXELS};
use crate::params::Quality;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `raster.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RasterConfig {
    /// Raster engine limits.
    pub engine: EngineConfig,
    /// Defaults for persistence and resizing.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Largest canvas area the engine will allocate, in pixels.
    pub max_pixels: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub jpeg_quality: i32,
    pub transport_quality: i32,
    pub smoothing: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: Quality::FILE_DEFAULT.value(),
            transport_quality: Quality::TRANSPORT_DEFAULT.value(),
            smoothing: true,
        }
    }
}

impl OutputConfig {
    pub fn jpeg_quality(&self) -> Quality {
        Quality::new(self.jpeg_quality)
    }

    pub fn transport_quality(&self) -> Quality {
        Quality::new(self.transport_quality)
    }
}

impl RasterConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RasterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.max_pixels == 0 {
            return Err(ConfigError::Validation(
                "engine.max_pixels must be positive".into(),
            ));
        }
        if !(0..=100).contains(&self.output.transport_quality) {
            return Err(ConfigError::Validation(
                "output.transport_quality must be 0-100".into(),
            ));
        }
        Ok(())
    }

    /// Build the production engine with these limits.
    pub fn engine(&self) -> PixelEngine {
        PixelEngine::with_max_pixels(self.engine.max_pixels)
    }
}

/// Load config from a TOML file.
///
/// A missing file yields the defaults. Invalid TOML, unknown keys and
/// out-of-range values are errors.
pub fn load_config(path: &Path) -> Result<RasterConfig, ConfigError> {
    if !path.exists() {
        return Ok(RasterConfig::default());
    }
    let content = fs::read_to_string(path)?;
    RasterConfig::from_toml_str(&content)
}

/// Returns a fully-commented stock `raster.toml` with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# Raster Image Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Raster engine
# ---------------------------------------------------------------------------
[engine]
# Largest canvas area (width * height) the engine will allocate.
# Blank canvases, resizes and raw loads above this fail as out of memory.
max_pixels = 268435456

# ---------------------------------------------------------------------------
# Output defaults
# ---------------------------------------------------------------------------
[output]
# JPEG quality for file writes. Passed to the encoder as is:
# negative selects the encoder default (75), values are clamped to 1-100.
jpeg_quality = 100

# JPEG quality for base64 transport strings (0-100).
transport_quality = 67

# Resize interpolation: true = bilinear, false = nearest-neighbor.
smoothing = true
"##
}
