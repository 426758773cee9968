//! Game session, scoring and runner
//!
//! This module contains the main types for the game:
//! - `GameSession` - Scores and detection state of one game
//! - `GameRunner` - Owns the camera and drives the detection timer
//! - `ScoreEvent` - Events emitted when a team scores

mod events;
mod runner;
mod session;
mod state;

pub use events::{ListenerId, ScoreCallback, ScoreEvent, ScoreListeners};
pub use runner::GameRunner;
pub use session::{GameSession, TickOutcome};
pub use state::{DisplayState, GameMode, GameStatus, ScoreState, Team};
