//! Camera Color Game
//!
//! A camera-driven team scoring game. Every tick the centre of a live video
//! frame is sampled; when it has moved since the previous tick, the dominant
//! colour decides which team (Red or Blue) scores. A point is only awarded
//! when the colour changes, and in defective mode every point goes to Blue.
//!
//! # Example
//!
//! ```ignore
//! use camera_color_game::{GameMode, GameRunner};
//!
//! let mut runner = GameRunner::new(my_camera_provider);
//! runner.on_score(Box::new(|event| {
//!     println!("{} scores", event.team);
//! }));
//! runner.start(GameMode::FullAccess)?;
//! // ...
//! runner.back_to_home();
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod vision;

// Re-export commonly used types
pub use game::{
    DisplayState, GameMode, GameRunner, GameSession, GameStatus, ScoreEvent, ScoreState, Team,
    TickOutcome,
};
pub use config::GameConfig;
pub use error::{GameError, Result};
pub use vision::{
    CameraProvider, CaptureSource, DetectedColor, FacingMode, FrameData, FrameSample,
    FrameSampler,
};
