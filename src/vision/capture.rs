//! Camera capture abstractions
//!
//! The host supplies a [`CameraProvider`] that hands out [`CaptureSource`]s.
//! A source is a scoped resource: wrap it in a [`CameraGuard`] and it is
//! released on every exit path.

use image::{DynamicImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

use crate::{GameError, Result};

/// Which way a requested camera faces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Rear camera, pointing away from the user
    #[default]
    Environment,
    /// Front camera
    User,
}

impl std::fmt::Display for FacingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacingMode::Environment => write!(f, "environment"),
            FacingMode::User => write!(f, "user"),
        }
    }
}

/// A full video frame at the source's native resolution
#[derive(Debug, Clone)]
pub struct FrameData {
    /// RGBA pixels, row-major
    pub image: RgbaImage,
    /// When the frame was captured
    pub timestamp: Instant,
}

impl FrameData {
    /// Wrap an RGBA image
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            timestamp: Instant::now(),
        }
    }

    /// Build a frame from raw RGBA bytes
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        let actual = data.len();
        RgbaImage::from_raw(width, height, data)
            .map(Self::new)
            .ok_or(GameError::InvalidFrame {
                width,
                height,
                expected,
                actual,
            })
    }

    /// Convert any decoded image into a frame
    pub fn from_image(image: DynamicImage) -> Self {
        Self::new(image.to_rgba8())
    }

    /// A frame where every pixel has the same colour
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, Rgba(rgba)))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Get a pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }
}

/// A live video source
pub trait CaptureSource: Send {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Whether enough data is buffered to read a frame
    fn is_ready(&self) -> bool;

    /// Read the current frame
    fn capture(&mut self) -> Result<FrameData>;

    /// Stop every underlying track. Must be safe to call more than once.
    fn release(&mut self);
}

/// Hands out camera sources
pub trait CameraProvider: Send + Sync {
    /// Request a camera facing the given way
    fn acquire(&self, facing: FacingMode) -> Result<Box<dyn CaptureSource>>;
}

impl<F> CameraProvider for F
where
    F: Fn(FacingMode) -> Result<Box<dyn CaptureSource>> + Send + Sync,
{
    fn acquire(&self, facing: FacingMode) -> Result<Box<dyn CaptureSource>> {
        self(facing)
    }
}

/// Owns an acquired source and releases it when dropped
pub struct CameraGuard {
    source: Box<dyn CaptureSource>,
}

impl CameraGuard {
    pub fn new(source: Box<dyn CaptureSource>) -> Self {
        log::info!("Camera '{}' acquired", source.name());
        Self { source }
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn is_ready(&self) -> bool {
        self.source.is_ready()
    }

    pub fn capture(&mut self) -> Result<FrameData> {
        self.source.capture()
    }
}

impl Drop for CameraGuard {
    fn drop(&mut self) {
        self.source.release();
        log::info!("Camera '{}' released", self.source.name());
    }
}

/// Replays a fixed list of frames, optionally looping
pub struct FrameSequenceCapture {
    name: String,
    frames: Vec<FrameData>,
    index: usize,
    loop_playback: bool,
    released: bool,
}

impl FrameSequenceCapture {
    pub fn new(frames: Vec<FrameData>, loop_playback: bool) -> Self {
        Self {
            name: "frame-sequence".to_string(),
            frames,
            index: 0,
            loop_playback,
            released: false,
        }
    }

    /// Load every image file in a directory, in file-name order
    pub fn from_directory(dir: impl AsRef<Path>, loop_playback: bool) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if is_image_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut frames = Vec::with_capacity(paths.len());
        for path in &paths {
            frames.push(FrameData::from_image(image::open(path)?));
        }

        log::info!("Loaded {} frames from {}", frames.len(), dir.display());

        let mut capture = Self::new(frames, loop_playback);
        capture.name = dir.display().to_string();
        Ok(capture)
    }

    /// Number of frames in the sequence
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            matches!(
                ext.to_ascii_lowercase().as_str(),
                "png" | "jpg" | "jpeg" | "bmp"
            )
        })
        .unwrap_or(false)
}

impl CaptureSource for FrameSequenceCapture {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self) -> bool {
        !self.released
            && !self.frames.is_empty()
            && (self.loop_playback || self.index < self.frames.len())
    }

    fn capture(&mut self) -> Result<FrameData> {
        if !self.is_ready() {
            return Err(GameError::Capture(format!(
                "sequence '{}' has no frame available",
                self.name
            )));
        }

        if self.index >= self.frames.len() {
            self.index = 0;
        }
        let frame = self.frames[self.index].clone();
        self.index += 1;
        Ok(frame)
    }

    fn release(&mut self) {
        self.released = true;
    }
}
