//! Per-game detection and scoring state

use super::state::{DisplayState, GameMode, GameStatus, ScoreState, Team};
use crate::config::GameConfig;
use crate::vision::{ColorClassifier, DetectedColor, FrameSample, MotionDetector, MotionReading};

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub motion: MotionReading,
    /// Colour emitted for display; `None` whenever there was no motion
    pub color: DetectedColor,
    /// Whether the colour differs from the last committed one
    pub transition: bool,
    /// Team that received a point this tick
    pub scored: Option<Team>,
}

/// Scores, last sample and edge-trigger state of one game
#[derive(Debug, Clone)]
pub struct GameSession {
    mode: GameMode,
    motion: MotionDetector,
    classifier: ColorClassifier,
    scores: ScoreState,
    previous: Option<FrameSample>,
    /// Last committed colour; `None` means a new colour counts as a transition
    last_color: DetectedColor,
    current_color: DetectedColor,
    motion_level: u8,
}

impl GameSession {
    /// Create a session with default detection settings
    pub fn new(mode: GameMode) -> Self {
        Self::with_config(mode, &GameConfig::default())
    }

    pub fn with_config(mode: GameMode, config: &GameConfig) -> Self {
        Self {
            mode,
            motion: MotionDetector::from_config(&config.detection),
            classifier: ColorClassifier::from_config(&config.detection),
            scores: ScoreState::default(),
            previous: None,
            last_color: DetectedColor::None,
            current_color: DetectedColor::None,
            motion_level: 0,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn scores(&self) -> ScoreState {
        self.scores
    }

    /// Colour shown after the last tick
    pub fn current_color(&self) -> DetectedColor {
        self.current_color
    }

    /// Last compared motion level
    pub fn motion_level(&self) -> u8 {
        self.motion_level
    }

    pub fn has_previous_sample(&self) -> bool {
        self.previous.is_some()
    }

    /// Run one detection cycle.
    ///
    /// `None` means the source had no frame ready; nothing changes.
    pub fn tick(&mut self, sample: Option<FrameSample>) -> Option<TickOutcome> {
        let sample = sample?;

        let motion = self.motion.measure(&sample, self.previous.as_ref());
        if motion.compared {
            self.motion_level = motion.level;
        }

        let color = if motion.detected {
            self.classifier.classify(&sample)
        } else {
            DetectedColor::None
        };
        self.previous = Some(sample);

        if !motion.detected {
            self.current_color = DetectedColor::None;
            self.last_color = DetectedColor::None;
            log::debug!("Tick: motion {}%, no motion", motion.level);
            return Some(TickOutcome {
                motion,
                color,
                transition: false,
                scored: None,
            });
        }

        let transition = color != self.last_color;
        if transition {
            self.last_color = color;
        }
        self.current_color = color;

        let scored = if transition {
            Team::from_color(color).map(|team| self.award(team))
        } else {
            None
        };

        log::debug!(
            "Tick: motion {}%, colour {}, transition {}",
            motion.level,
            color,
            transition
        );

        Some(TickOutcome {
            motion,
            color,
            transition,
            scored,
        })
    }

    fn award(&mut self, detected: Team) -> Team {
        let team = if self.mode.redirects_to_blue() {
            Team::Blue
        } else {
            detected
        };
        self.scores.increment(team);
        log::info!(
            "{} scores (saw {}): red {} - blue {}",
            team,
            detected,
            self.scores.red,
            self.scores.blue
        );
        team
    }

    /// Zero the scores and forget all detection history
    pub fn reset(&mut self) {
        self.scores.reset();
        self.previous = None;
        self.last_color = DetectedColor::None;
        self.current_color = DetectedColor::None;
        self.motion_level = 0;
    }

    /// Snapshot for display
    pub fn display(&self, status: GameStatus) -> DisplayState {
        DisplayState {
            detected_color: self.current_color,
            motion_level: self.motion_level,
            scores: self.scores,
            status,
            mode: Some(self.mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(rgb: [u8; 3]) -> Option<FrameSample> {
        Some(FrameSample::new(RgbaImage::from_pixel(
            4,
            4,
            Rgba([rgb[0], rgb[1], rgb[2], 255]),
        )))
    }

    const BLACK: [u8; 3] = [0, 0, 0];
    const RED: [u8; 3] = [255, 0, 0];
    const BLUE: [u8; 3] = [0, 0, 255];

    #[test]
    fn test_missing_sample_is_noop() {
        let mut session = GameSession::new(GameMode::FullAccess);
        session.tick(solid(BLACK));
        session.tick(solid(RED));
        let before = session.display(GameStatus::Operational);

        assert!(session.tick(None).is_none());
        assert_eq!(session.display(GameStatus::Operational), before);
        assert!(session.has_previous_sample());
    }

    #[test]
    fn test_first_tick_has_no_motion() {
        let mut session = GameSession::new(GameMode::FullAccess);
        let outcome = session.tick(solid(RED)).unwrap();
        assert!(!outcome.motion.compared);
        assert_eq!(outcome.color, DetectedColor::None);
        assert_eq!(outcome.scored, None);
        assert!(session.has_previous_sample());
    }

    #[test]
    fn test_black_to_red_scores_red() {
        let mut session = GameSession::new(GameMode::FullAccess);
        session.tick(solid(BLACK));
        let outcome = session.tick(solid(RED)).unwrap();
        assert_eq!(outcome.motion.level, 25);
        assert_eq!(outcome.color, DetectedColor::Red);
        assert!(outcome.transition);
        assert_eq!(outcome.scored, Some(Team::Red));
        assert_eq!(session.scores(), ScoreState { red: 1, blue: 0 });
    }

    #[test]
    fn test_defective_mode_redirects() {
        let mut session = GameSession::new(GameMode::Defective);
        session.tick(solid(BLACK));
        let outcome = session.tick(solid(RED)).unwrap();
        assert_eq!(outcome.color, DetectedColor::Red);
        assert_eq!(outcome.scored, Some(Team::Blue));
        assert_eq!(session.scores(), ScoreState { red: 0, blue: 1 });
    }

    #[test]
    fn test_no_motion_clears_edge_trigger() {
        let mut session = GameSession::new(GameMode::FullAccess);
        session.tick(solid(BLACK));
        session.tick(solid(RED));
        // Still frame: no motion, colour forced to None
        let still = session.tick(solid(RED)).unwrap();
        assert_eq!(still.motion.level, 0);
        assert_eq!(still.color, DetectedColor::None);
        assert_eq!(session.current_color(), DetectedColor::None);

        session.tick(solid(BLACK));
        let again = session.tick(solid(RED)).unwrap();
        assert!(again.transition);
        assert_eq!(session.scores().red, 2);
    }

    #[test]
    fn test_motion_without_colour_does_not_score() {
        let mut session = GameSession::new(GameMode::FullAccess);
        session.tick(solid(BLACK));
        let outcome = session.tick(solid([0, 255, 0])).unwrap();
        assert!(outcome.motion.detected);
        assert_eq!(outcome.color, DetectedColor::None);
        assert_eq!(outcome.scored, None);
        assert_eq!(session.scores(), ScoreState::default());
    }

    #[test]
    fn test_motion_display_kept_on_uncompared_tick() {
        let mut session = GameSession::new(GameMode::FullAccess);
        session.tick(solid(BLACK));
        session.tick(solid(RED));
        assert_eq!(session.motion_level(), 25);

        // A differently sized sample cannot be compared
        let small = FrameSample::new(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255])));
        let outcome = session.tick(Some(small)).unwrap();
        assert!(!outcome.motion.compared);
        assert_eq!(session.motion_level(), 25);
    }

    #[test]
    fn test_reset() {
        let mut session = GameSession::new(GameMode::FullAccess);
        session.tick(solid(BLACK));
        session.tick(solid(BLUE));
        session.reset();

        let display = session.display(GameStatus::Operational);
        assert_eq!(display.scores, ScoreState::default());
        assert_eq!(display.motion_text(), "0%");
        assert_eq!(display.color_label(), "NONE");
        assert!(!session.has_previous_sample());
        assert_eq!(session.mode(), GameMode::FullAccess);
    }
}
