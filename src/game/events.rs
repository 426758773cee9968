//! Events emitted when a team scores

use std::time::Instant;

use super::state::{ScoreState, Team};
use crate::vision::DetectedColor;

/// Event emitted when a colour transition awards a point
#[derive(Debug, Clone)]
pub struct ScoreEvent {
    /// Team that received the point
    pub team: Team,
    /// Colour that triggered it; differs from `team` in defective mode
    pub detected: DetectedColor,
    /// Motion level of the scoring tick
    pub motion_level: u8,
    /// Scores after the increment
    pub scores: ScoreState,
    /// When the event occurred
    pub timestamp: Instant,
}

impl ScoreEvent {
    pub fn new(team: Team, detected: DetectedColor, motion_level: u8, scores: ScoreState) -> Self {
        Self {
            team,
            detected,
            motion_level,
            scores,
            timestamp: Instant::now(),
        }
    }

    /// Whether the point went to a team other than the colour seen
    pub fn is_misattributed(&self) -> bool {
        Team::from_color(self.detected) != Some(self.team)
    }
}

/// Listener invoked for every score event
pub type ScoreCallback = Box<dyn Fn(&ScoreEvent) + Send + Sync>;

/// Handle returned by [`ScoreListeners::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registered score listeners, notified in subscription order
#[derive(Default)]
pub struct ScoreListeners {
    next_id: u64,
    listeners: Vec<(ListenerId, ScoreCallback)>,
}

impl ScoreListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: ScoreCallback) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, callback));
        id
    }

    /// Returns false if the listener was already gone
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    /// Hand the event to every listener
    pub fn notify(&self, event: &ScoreEvent) {
        for (_, callback) in &self.listeners {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
