//! Game runner
//!
//! Owns the camera and the detection timer. A single worker thread runs one
//! tick per interval; ticks never overlap.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::events::{ListenerId, ScoreCallback, ScoreEvent, ScoreListeners};
use super::session::GameSession;
use super::state::{DisplayState, GameMode, GameStatus, ScoreState};
use crate::config::GameConfig;
use crate::vision::{CameraGuard, CameraProvider, FrameSample, FrameSampler};
use crate::{GameError, Result};

/// Runs games against a camera provider
pub struct GameRunner {
    config: GameConfig,
    provider: Arc<dyn CameraProvider>,
    /// Session of the current or last game
    session: Arc<Mutex<Option<GameSession>>>,
    status: Arc<Mutex<GameStatus>>,
    /// Cleared to cancel the timer
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    events: Arc<Mutex<ScoreListeners>>,
}

impl GameRunner {
    /// Create a runner with the default configuration
    pub fn new(provider: impl CameraProvider + 'static) -> Self {
        Self::with_config(provider, GameConfig::default())
    }

    pub fn with_config(provider: impl CameraProvider + 'static, config: GameConfig) -> Self {
        Self {
            config,
            provider: Arc::new(provider),
            session: Arc::new(Mutex::new(None)),
            status: Arc::new(Mutex::new(GameStatus::Idle)),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            events: Arc::new(Mutex::new(ScoreListeners::new())),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Register a callback for score events
    pub fn on_score(&self, callback: ScoreCallback) -> ListenerId {
        self.events.lock().subscribe(callback)
    }

    pub fn remove_score_listener(&self, id: ListenerId) -> bool {
        self.events.lock().unsubscribe(id)
    }

    /// Start a game.
    ///
    /// Acquires the camera and starts the detection timer. If the camera
    /// cannot be acquired the status becomes [`GameStatus::CameraError`] and
    /// the timer is never started; call [`GameRunner::back_to_home`] before
    /// trying again.
    pub fn start(&mut self, mode: GameMode) -> Result<()> {
        if self.running.load(Ordering::SeqCst) {
            return Err(GameError::AlreadyRunning);
        }
        self.join_worker();
        if *self.status.lock() == GameStatus::CameraError {
            return Err(GameError::CameraUnavailable(
                "previous camera error; return home before starting again".to_string(),
            ));
        }

        *self.session.lock() = Some(GameSession::with_config(mode, &self.config));
        log::info!("Starting game in {} mode", mode.label());

        let facing = self.config.camera.facing;
        let source = match self.provider.acquire(facing) {
            Ok(source) => source,
            Err(e) => {
                log::error!("Camera error ({} camera): {}", facing, e);
                *self.status.lock() = GameStatus::CameraError;
                return Err(match e {
                    GameError::CameraUnavailable(_) => e,
                    other => GameError::CameraUnavailable(other.to_string()),
                });
            }
        };
        let camera = CameraGuard::new(source);

        self.running.store(true, Ordering::SeqCst);
        *self.status.lock() = GameStatus::Operational;

        let exit = WorkerExit {
            camera: Some(camera),
            running: self.running.clone(),
            status: self.status.clone(),
        };
        let session = self.session.clone();
        let events = self.events.clone();
        let sampler = FrameSampler::from_config(&self.config.sampler);
        let interval = Duration::from_millis(self.config.tick_interval_ms.max(1));

        let spawned = thread::Builder::new()
            .name("camera-color-game".to_string())
            .spawn(move || {
                run_detection_loop(exit, session, events, sampler, interval);
            });

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                log::info!("Detection timer started ({}ms)", interval.as_millis());
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                *self.status.lock() = GameStatus::Idle;
                Err(e.into())
            }
        }
    }

    /// Stop the timer and release the camera
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.join_worker();
        *self.status.lock() = GameStatus::Idle;
        log::info!("Game stopped");
    }

    fn join_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                log::error!("Detection thread panicked");
            }
        }
    }

    /// Zero the scores and clear detection state
    pub fn reset(&self) {
        if let Some(session) = self.session.lock().as_mut() {
            session.reset();
        }
        log::info!("Game reset");
    }

    /// Leave the game: stop, release the camera and reset
    pub fn back_to_home(&mut self) {
        self.stop();
        self.reset();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> GameStatus {
        *self.status.lock()
    }

    pub fn scores(&self) -> ScoreState {
        self.session
            .lock()
            .as_ref()
            .map(|s| s.scores())
            .unwrap_or_default()
    }

    /// Current display outputs
    pub fn display(&self) -> DisplayState {
        let status = self.status();
        match self.session.lock().as_ref() {
            Some(session) => session.display(status),
            None => DisplayState {
                status,
                ..DisplayState::default()
            },
        }
    }

    /// Current display outputs as JSON
    pub fn state_json(&self) -> String {
        serde_json::to_string(&self.display()).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Drop for GameRunner {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.stop();
        }
    }
}

/// Worker-owned camera and flags, torn down however the loop exits
struct WorkerExit {
    camera: Option<CameraGuard>,
    running: Arc<AtomicBool>,
    status: Arc<Mutex<GameStatus>>,
}

impl Drop for WorkerExit {
    fn drop(&mut self) {
        // Camera goes first so a new game never overlaps the old stream
        drop(self.camera.take());
        if thread::panicking() {
            log::error!("Detection loop aborted, game stopped");
        }
        *self.status.lock() = GameStatus::Idle;
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Main detection loop, one tick per interval
fn run_detection_loop(
    mut exit: WorkerExit,
    session: Arc<Mutex<Option<GameSession>>>,
    events: Arc<Mutex<ScoreListeners>>,
    sampler: FrameSampler,
    interval: Duration,
) {
    let mut tick_count: u64 = 0;
    let mut skipped: u64 = 0;
    let mut last_log = Instant::now();

    while exit.running.load(Ordering::SeqCst) {
        let Some(camera) = exit.camera.as_mut() else {
            break;
        };
        let tick_start = Instant::now();

        let sample = next_sample(camera, &sampler);
        if sample.is_none() {
            skipped += 1;
        }

        let outcome = session
            .lock()
            .as_mut()
            .and_then(|s| s.tick(sample).map(|outcome| (outcome, s.scores())));

        if let Some((outcome, scores)) = outcome {
            if let Some(team) = outcome.scored {
                let event = ScoreEvent::new(team, outcome.color, outcome.motion.level, scores);
                events.lock().notify(&event);
            }
        }

        tick_count += 1;

        if last_log.elapsed() >= Duration::from_secs(5) {
            log::info!(
                "Detection: {} ticks, {} without a frame, camera '{}'",
                tick_count,
                skipped,
                camera.name()
            );
            last_log = Instant::now();
        }

        let elapsed = tick_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}

/// Read and crop a frame, or `None` if the camera has nothing ready
fn next_sample(camera: &mut CameraGuard, sampler: &FrameSampler) -> Option<FrameSample> {
    if !camera.is_ready() {
        return None;
    }

    match camera.capture() {
        Ok(frame) => sampler.sample(&frame),
        Err(e) => {
            log::warn!("Capture failed on '{}': {}", camera.name(), e);
            None
        }
    }
}
