//! Game configuration
//!
//! Every field has a default, so an empty TOML document is a valid config.
//!
//! ```toml
//! tick_interval_ms = 300
//!
//! [camera]
//! facing = "environment"
//!
//! [sampler]
//! region_fraction = 0.5
//!
//! [detection]
//! motion_threshold = 8
//! motion_divisor = 10
//! color_sample_stride = 4
//!
//! [detection.color_margin]
//! min_difference = 10
//! apply = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::vision::FacingMode;
use crate::Result;

/// Top-level game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Period of the detection tick in milliseconds
    pub tick_interval_ms: u64,
    pub camera: CameraConfig,
    pub sampler: SamplerConfig,
    pub detection: DetectionConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            camera: CameraConfig::default(),
            sampler: SamplerConfig::default(),
            detection: DetectionConfig::default(),
        }
    }
}

fn default_tick_interval() -> u64 {
    300
}

/// Camera request settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Which way the requested camera should face
    pub facing: FacingMode,
}

/// Detection region settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Fraction of the frame width and height covered by the centred region
    pub region_fraction: f32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            region_fraction: 0.5,
        }
    }
}

/// Motion and colour detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Motion is detected when the level is strictly above this
    pub motion_threshold: u8,
    /// Per-pixel difference is divided by this before flooring
    pub motion_divisor: u32,
    /// Colour averaging reads every n-th pixel
    pub color_sample_stride: usize,
    pub color_margin: ColorMarginConfig,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            motion_threshold: 8,
            motion_divisor: 10,
            color_sample_stride: 4,
            color_margin: ColorMarginConfig::default(),
        }
    }
}

/// Minimum channel lead required for a colour to win.
///
/// Off by default: the classifier compares channels with a plain strict
/// greater-than, and `min_difference` is only consulted when `apply` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorMarginConfig {
    pub min_difference: u8,
    pub apply: bool,
}

impl Default for ColorMarginConfig {
    fn default() -> Self {
        Self {
            min_difference: 10,
            apply: false,
        }
    }
}

impl GameConfig {
    /// Create a configuration with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded game config from {}", path.display());
        Ok(config)
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Set the tick interval
    pub fn with_interval(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    /// Set the detection region fraction
    pub fn with_region_fraction(mut self, fraction: f32) -> Self {
        self.sampler.region_fraction = fraction;
        self
    }

    /// Set the motion threshold
    pub fn with_motion_threshold(mut self, threshold: u8) -> Self {
        self.detection.motion_threshold = threshold;
        self
    }

    /// Enable or disable the colour margin
    pub fn with_color_margin(mut self, min_difference: u8, apply: bool) -> Self {
        self.detection.color_margin = ColorMarginConfig {
            min_difference,
            apply,
        };
        self
    }
}
