//! Centre-region frame sampling

use image::imageops;
use image::RgbaImage;

use super::capture::FrameData;
use crate::config::SamplerConfig;

/// Pixel rectangle inside a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SampleRegion {
    /// Number of pixels in the region
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Pixels from the detection region of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSample {
    image: RgbaImage,
}

impl FrameSample {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// RGBA bytes, row-major, 4 per pixel
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Iterate pixels as `[r, g, b, a]`
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.image.pixels().map(|p| p.0)
    }

    /// Whether both samples cover the same number of rows and columns
    pub fn same_size(&self, other: &FrameSample) -> bool {
        self.width() == other.width() && self.height() == other.height()
    }
}

/// Extracts the centred detection region from frames
#[derive(Debug, Clone)]
pub struct FrameSampler {
    fraction: f32,
}

impl FrameSampler {
    pub fn new(fraction: f32) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: &SamplerConfig) -> Self {
        Self::new(config.region_fraction)
    }

    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    /// Region for a frame of the given size, or `None` if it would be empty
    pub fn region_for(&self, frame_width: u32, frame_height: u32) -> Option<SampleRegion> {
        let fraction = self.fraction as f64;
        let (w, h) = (frame_width as f64, frame_height as f64);
        let zone_w = w * fraction;
        let zone_h = h * fraction;

        let region = SampleRegion {
            x: ((w - zone_w) / 2.0).floor() as u32,
            y: ((h - zone_h) / 2.0).floor() as u32,
            width: zone_w.floor() as u32,
            height: zone_h.floor() as u32,
        };

        (region.pixel_count() > 0).then_some(region)
    }

    /// Crop the detection region out of a frame
    pub fn sample(&self, frame: &FrameData) -> Option<FrameSample> {
        let Some(region) = self.region_for(frame.width(), frame.height()) else {
            log::warn!(
                "Frame {}x{} too small for a detection region",
                frame.width(),
                frame.height()
            );
            return None;
        };

        let cropped =
            imageops::crop_imm(&frame.image, region.x, region.y, region.width, region.height)
                .to_image();
        Some(FrameSample::new(cropped))
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::from_config(&SamplerConfig::default())
    }
}
