//! Game state types

use serde::{Deserialize, Serialize};

use crate::vision::DetectedColor;

/// A scoring team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    /// Team matching a detected colour
    pub fn from_color(color: DetectedColor) -> Option<Self> {
        match color {
            DetectedColor::Red => Some(Team::Red),
            DetectedColor::Blue => Some(Team::Blue),
            DetectedColor::None => None,
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Team::Red => write!(f, "Red"),
            Team::Blue => write!(f, "Blue"),
        }
    }
}

/// How scoring is attributed, fixed when a game starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Every point goes to Blue whatever colour was seen
    #[default]
    Defective,
    /// Points go to the team whose colour was seen
    FullAccess,
}

impl GameMode {
    /// Whether all scoring is redirected to Blue
    pub fn redirects_to_blue(&self) -> bool {
        matches!(self, GameMode::Defective)
    }

    /// System status label for this mode
    pub fn label(&self) -> &'static str {
        match self {
            GameMode::Defective => "DEFECTIVE",
            GameMode::FullAccess => "FULL ACCESS",
        }
    }
}

/// Camera/timer status shown to the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// No game in progress
    #[default]
    Idle,
    /// Camera acquired and the detection timer is running
    Operational,
    /// Camera could not be acquired; the timer never started
    CameraError,
}

impl GameStatus {
    pub fn label(&self) -> &'static str {
        match self {
            GameStatus::Idle => "Idle",
            GameStatus::Operational => "Operational",
            GameStatus::CameraError => "Camera Error",
        }
    }
}

/// Points per team
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub red: u32,
    pub blue: u32,
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score for a team
    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.red,
            Team::Blue => self.blue,
        }
    }

    /// Add one point to a team
    pub fn increment(&mut self, team: Team) {
        match team {
            Team::Red => self.red = self.red.saturating_add(1),
            Team::Blue => self.blue = self.blue.saturating_add(1),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Everything the host displays
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    pub detected_color: DetectedColor,
    /// Last compared motion level, 0..=100
    pub motion_level: u8,
    pub scores: ScoreState,
    pub status: GameStatus,
    /// Mode of the current game, if one was started
    pub mode: Option<GameMode>,
}

impl DisplayState {
    pub fn color_label(&self) -> &'static str {
        self.detected_color.label()
    }

    /// Motion as shown to the player, e.g. `"25%"`
    pub fn motion_text(&self) -> String {
        format!("{}%", self.motion_level)
    }

    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }

    pub fn mode_label(&self) -> Option<&'static str> {
        self.mode.map(|m| m.label())
    }
}
