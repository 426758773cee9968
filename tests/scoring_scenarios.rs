//! Scoring scenarios driven through full frames, the sampler and a session

use camera_color_game::{
    DetectedColor, FrameData, FrameSampler, GameMode, GameSession, GameStatus, ScoreState, Team,
};

const BLACK: [u8; 4] = [0, 0, 0, 255];
const RED: [u8; 4] = [255, 0, 0, 255];
const DARK_RED: [u8; 4] = [150, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Sample a solid 64x48 frame the way the runner does
fn tick(session: &mut GameSession, rgba: [u8; 4]) -> camera_color_game::TickOutcome {
    let frame = FrameData::filled(64, 48, rgba);
    let sample = FrameSampler::default().sample(&frame);
    session.tick(sample).expect("sample should be produced")
}

#[test]
fn test_identical_frames_never_move() {
    init_logger();
    let mut session = GameSession::new(GameMode::FullAccess);
    for rgba in [RED, BLUE, [10, 200, 30, 255]] {
        tick(&mut session, rgba);
        let outcome = tick(&mut session, rgba);
        assert_eq!(outcome.motion.level, 0);
        assert_eq!(outcome.color, DetectedColor::None);
    }
}

#[test]
fn test_low_motion_never_scores() {
    init_logger();
    let mut session = GameSession::new(GameMode::FullAccess);
    // Alternating red shades 80 apart: level 8, not above the threshold
    let mut shade = 100u8;
    for _ in 0..6 {
        let outcome = tick(&mut session, [shade, 0, 0, 255]);
        assert!(outcome.motion.level <= 8);
        assert_eq!(outcome.color, DetectedColor::None);
        shade = if shade == 100 { 180 } else { 100 };
    }
    assert_eq!(session.scores(), ScoreState::default());
}

#[test]
fn test_scenario_a_black_to_red() {
    init_logger();
    for (mode, expected) in [
        (GameMode::FullAccess, ScoreState { red: 1, blue: 0 }),
        (GameMode::Defective, ScoreState { red: 0, blue: 1 }),
    ] {
        let mut session = GameSession::new(mode);
        tick(&mut session, BLACK);
        let outcome = tick(&mut session, RED);

        assert_eq!(outcome.motion.level, 25);
        assert!(outcome.motion.detected);
        assert_eq!(outcome.color, DetectedColor::Red);
        assert_eq!(session.scores(), expected);
    }
}

#[test]
fn test_scenario_b_sustained_red_scores_once() {
    init_logger();
    let mut session = GameSession::new(GameMode::FullAccess);
    tick(&mut session, BLACK);

    // Red that keeps moving: the colour stays Red on every tick
    let mut scored = 0;
    for i in 0..5 {
        let rgba = if i % 2 == 0 { RED } else { DARK_RED };
        let outcome = tick(&mut session, rgba);
        assert!(outcome.motion.detected);
        assert_eq!(outcome.color, DetectedColor::Red);
        if outcome.scored.is_some() {
            scored += 1;
        }
    }

    assert_eq!(scored, 1);
    assert_eq!(session.scores(), ScoreState { red: 1, blue: 0 });
}

#[test]
fn test_scenario_c_alternating_colours_all_score() {
    init_logger();
    let mut session = GameSession::new(GameMode::FullAccess);
    tick(&mut session, BLACK);

    assert_eq!(tick(&mut session, RED).scored, Some(Team::Red));
    assert_eq!(session.scores(), ScoreState { red: 1, blue: 0 });

    assert_eq!(tick(&mut session, BLUE).scored, Some(Team::Blue));
    assert_eq!(session.scores(), ScoreState { red: 1, blue: 1 });

    assert_eq!(tick(&mut session, RED).scored, Some(Team::Red));
    assert_eq!(session.scores(), ScoreState { red: 2, blue: 1 });
}

#[test]
fn test_scenario_d_defective_mode_scores_blue_only() {
    init_logger();
    let mut session = GameSession::new(GameMode::Defective);
    tick(&mut session, BLACK);

    let red = tick(&mut session, RED);
    assert_eq!(red.color, DetectedColor::Red);
    assert_eq!(red.scored, Some(Team::Blue));

    let blue = tick(&mut session, BLUE);
    assert_eq!(blue.color, DetectedColor::Blue);
    assert_eq!(blue.scored, Some(Team::Blue));

    assert_eq!(session.scores(), ScoreState { red: 0, blue: 2 });
}

#[test]
fn test_reset_clears_everything() {
    init_logger();
    let mut session = GameSession::new(GameMode::FullAccess);
    tick(&mut session, BLACK);
    tick(&mut session, RED);
    tick(&mut session, BLUE);

    session.reset();
    let display = session.display(GameStatus::Operational);
    assert_eq!(display.scores, ScoreState::default());
    assert_eq!(display.motion_text(), "0%");
    assert_eq!(display.color_label(), "NONE");

    // First tick after reset has nothing to compare against
    let first = tick(&mut session, BLUE);
    assert!(!first.motion.compared);

    // Red then counts as a fresh transition
    let outcome = tick(&mut session, RED);
    assert!(outcome.transition);
    assert_eq!(session.scores(), ScoreState { red: 1, blue: 0 });
}
