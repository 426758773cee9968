//! Motion and colour detection over frame samples

use serde::{Deserialize, Serialize};

use super::sampler::FrameSample;
use crate::config::{ColorMarginConfig, DetectionConfig};

/// Upper bound of the motion level
pub const MAX_MOTION_LEVEL: u8 = 100;

/// Dominant colour of a sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectedColor {
    #[default]
    None,
    Red,
    Blue,
}

impl DetectedColor {
    /// Label shown to the player
    pub fn label(&self) -> &'static str {
        match self {
            DetectedColor::None => "NONE",
            DetectedColor::Red => "Red",
            DetectedColor::Blue => "Blue",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, DetectedColor::None)
    }
}

impl std::fmt::Display for DetectedColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of comparing a sample against the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionReading {
    /// Normalized change, 0..=100
    pub level: u8,
    /// Whether a previous sample was available to compare against
    pub compared: bool,
    /// Whether the level is above the threshold
    pub detected: bool,
}

impl MotionReading {
    /// Reading for a tick with nothing to compare against
    pub fn uncompared() -> Self {
        Self {
            level: 0,
            compared: false,
            detected: false,
        }
    }
}

/// Computes motion level between consecutive samples
#[derive(Debug, Clone)]
pub struct MotionDetector {
    threshold: u8,
    divisor: u32,
}

impl MotionDetector {
    pub fn new(threshold: u8, divisor: u32) -> Self {
        Self {
            threshold,
            divisor: divisor.max(1),
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(config.motion_threshold, config.motion_divisor)
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Compare `current` against `previous`.
    ///
    /// A missing previous sample, or one of a different size, yields an
    /// uncompared reading.
    pub fn measure(&self, current: &FrameSample, previous: Option<&FrameSample>) -> MotionReading {
        let Some(previous) = previous else {
            return MotionReading::uncompared();
        };
        if !current.same_size(previous) {
            log::debug!(
                "Sample size changed ({}x{} -> {}x{}), skipping motion comparison",
                previous.width(),
                previous.height(),
                current.width(),
                current.height()
            );
            return MotionReading::uncompared();
        }

        let pixels = current.pixel_count() as u64;
        if pixels == 0 {
            return MotionReading::uncompared();
        }

        let diff: u64 = current
            .pixels()
            .zip(previous.pixels())
            .map(|(cur, prev)| {
                (0..3)
                    .map(|c| cur[c].abs_diff(prev[c]) as u64)
                    .sum::<u64>()
            })
            .sum();

        let level = (diff / (pixels * self.divisor as u64)).min(MAX_MOTION_LEVEL as u64) as u8;

        MotionReading {
            level,
            compared: true,
            detected: level > self.threshold,
        }
    }
}

impl Default for MotionDetector {
    fn default() -> Self {
        Self::from_config(&DetectionConfig::default())
    }
}

/// Rounded per-channel averages of a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelAverages {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Classifies the dominant colour of a sample
#[derive(Debug, Clone)]
pub struct ColorClassifier {
    stride: usize,
    margin: ColorMarginConfig,
}

impl ColorClassifier {
    pub fn new(stride: usize, margin: ColorMarginConfig) -> Self {
        Self {
            stride: stride.max(1),
            margin,
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(config.color_sample_stride, config.color_margin.clone())
    }

    /// Average R, G, B over every `stride`-th pixel, rounded half up
    pub fn averages(&self, sample: &FrameSample) -> ChannelAverages {
        let (mut r, mut g, mut b, mut total) = (0u64, 0u64, 0u64, 0u64);
        for [pr, pg, pb, _] in sample.pixels().step_by(self.stride) {
            r += pr as u64;
            g += pg as u64;
            b += pb as u64;
            total += 1;
        }

        if total == 0 {
            return ChannelAverages { r: 0, g: 0, b: 0 };
        }

        let round = |sum: u64| ((2 * sum + total) / (2 * total)) as u8;
        ChannelAverages {
            r: round(r),
            g: round(g),
            b: round(b),
        }
    }

    /// Classify a set of averages
    pub fn classify_averages(&self, avg: ChannelAverages) -> DetectedColor {
        let strict = dominant(avg, 0);

        if !self.margin.apply {
            let margined = dominant(avg, self.margin.min_difference);
            if margined != strict {
                log::debug!(
                    "Colour {} would be {} with a margin of {} (r={}, g={}, b={})",
                    strict,
                    margined,
                    self.margin.min_difference,
                    avg.r,
                    avg.g,
                    avg.b
                );
            }
            return strict;
        }

        dominant(avg, self.margin.min_difference)
    }

    /// Classify the dominant colour of a sample
    pub fn classify(&self, sample: &FrameSample) -> DetectedColor {
        self.classify_averages(self.averages(sample))
    }
}

impl Default for ColorClassifier {
    fn default() -> Self {
        Self::from_config(&DetectionConfig::default())
    }
}

fn dominant(avg: ChannelAverages, margin: u8) -> DetectedColor {
    let (r, g, b, m) = (avg.r as u16, avg.g as u16, avg.b as u16, margin as u16);
    if r > g + m && r > b + m {
        DetectedColor::Red
    } else if b > r + m && b > g + m {
        DetectedColor::Blue
    } else {
        DetectedColor::None
    }
}
