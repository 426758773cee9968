//! Error types for the camera game

use thiserror::Error;

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, GameError>;

/// Errors surfaced by the game
#[derive(Debug, Error)]
pub enum GameError {
    /// The camera could not be acquired; terminal for the session
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    /// `start` was called while a game is in progress
    #[error("game already running")]
    AlreadyRunning,

    /// A frame could not be read from an acquired source
    #[error("capture failed: {0}")]
    Capture(String),

    /// Pixel buffer does not match the stated dimensions
    #[error("invalid frame: {width}x{height} needs {expected} bytes, got {actual}")]
    InvalidFrame {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = GameError::CameraUnavailable("permission denied".to_string());
        assert_eq!(err.to_string(), "camera unavailable: permission denied");
    }

    #[test]
    fn test_invalid_frame_display() {
        let err = GameError::InvalidFrame {
            width: 2,
            height: 2,
            expected: 16,
            actual: 3,
        };
        let s = err.to_string();
        assert!(s.contains("2x2"));
        assert!(s.contains("16"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: GameError = io.into();
        assert!(matches!(err, GameError::Io(_)));
    }
}
