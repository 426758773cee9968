//! Camera capture and per-frame image analysis
//!
//! Each tick a frame is read from a [`CaptureSource`], the [`FrameSampler`]
//! crops the centred detection region, the [`MotionDetector`] compares it
//! against the previous sample and the [`ColorClassifier`] picks the dominant
//! colour when there is motion.

pub mod capture;
pub mod detector;
pub mod sampler;

// Re-export main types for convenient access
pub use capture::{
    CameraGuard, CameraProvider, CaptureSource, FacingMode, FrameData, FrameSequenceCapture,
};
pub use detector::{
    ChannelAverages, ColorClassifier, DetectedColor, MotionDetector, MotionReading,
    MAX_MOTION_LEVEL,
};
pub use sampler::{FrameSample, FrameSampler, SampleRegion};
