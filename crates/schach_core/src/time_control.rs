//! Search limits and cooperative stopping.
//!
//! A search runs until it completes its depth, exhausts its node budget, or
//! its [`TimeControl`] flag is raised, either by the clock or by `stop()`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::types::Difficulty;

/// Deepest iteration a search may request.
pub const MAX_DEPTH: u8 = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitsError {
    #[error("search depth {0} is outside 0..={max}", max = MAX_DEPTH)]
    Depth(i32),
}

/// Search limits that control when an engine should stop searching.
///
/// Engines stop at whichever comes first: the depth, the node budget, or the
/// time limit. When time runs out the engine returns the best move of the
/// last completed iteration.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// Maximum search depth in plies (half-moves)
    pub depth: u8,
    /// Maximum time allowed for this move (None = infinite)
    pub move_time: Option<Duration>,
    /// Node budget (None = unlimited)
    pub max_nodes: Option<u64>,
    /// Strength setting; may lower the depth ceiling and add randomness
    pub difficulty: Difficulty,
    /// Playing strength as a rating; engines that support it prefer it to `difficulty`
    pub elo: Option<u32>,
    /// Time controller for checking if search should stop
    pub time_control: TimeControl,
}

impl SearchLimits {
    /// Create limits with only depth constraint (no time limit).
    pub fn depth(depth: u8) -> Self {
        Self {
            depth,
            move_time: None,
            max_nodes: None,
            difficulty: Difficulty::default(),
            elo: None,
            time_control: TimeControl::new(None),
        }
    }

    /// Validate a caller-supplied depth and build depth-only limits from it.
    pub fn checked_depth(depth: i32) -> Result<Self, LimitsError> {
        u8::try_from(depth)
            .ok()
            .filter(|&d| d <= MAX_DEPTH)
            .map(Self::depth)
            .ok_or(LimitsError::Depth(depth))
    }

    /// Create limits with both depth and time constraints.
    pub fn depth_and_time(depth: u8, move_time: Duration) -> Self {
        Self {
            move_time: Some(move_time),
            time_control: TimeControl::new(Some(move_time)),
            ..Self::depth(depth)
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_elo(mut self, elo: u32) -> Self {
        self.elo = Some(elo);
        self
    }

    pub fn with_max_nodes(mut self, nodes: u64) -> Self {
        self.max_nodes = Some(nodes);
        self
    }

    /// Apply `move_time` unless a time limit is already set. The stop flag stays shared.
    pub fn or_move_time(mut self, move_time: Duration) -> Self {
        if self.move_time.is_none() {
            self.move_time = Some(move_time);
            self.time_control = self.time_control.with_time_limit(Some(move_time));
        }
        self
    }

    /// Check if search should stop due to time limit or an external stop.
    #[inline]
    pub fn should_stop(&self) -> bool {
        self.time_control.is_stopped()
    }

    /// Start the time control clock. Call this when search begins.
    pub fn start(&self) {
        self.time_control.start();
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(4)
    }
}

/// Thread-safe time controller that tracks whether search should stop.
///
/// Cheap to clone; clones share the stop flag, so a holder on another thread
/// can stop a running search.
#[derive(Debug, Clone)]
pub struct TimeControl {
    /// Shared stop flag
    stopped: Arc<AtomicBool>,
    /// Start time of the search
    start_time: Arc<Mutex<Option<Instant>>>,
    /// Time limit for this search (None = infinite)
    time_limit: Option<Duration>,
    /// How often to check the clock (in nodes)
    check_interval: u64,
}

impl TimeControl {
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            start_time: Arc::new(Mutex::new(None)),
            time_limit,
            check_interval: 1024,
        }
    }

    fn started(&self) -> Option<Instant> {
        *self
            .start_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Start the clock. Should be called when search begins.
    pub fn start(&self) {
        *self
            .start_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
        self.stopped.store(false, Ordering::SeqCst);
    }

    /// A controller sharing this one's stop flag and clock with another limit.
    pub fn with_time_limit(&self, time_limit: Option<Duration>) -> Self {
        Self {
            time_limit,
            ..self.clone()
        }
    }

    /// Force stop the search.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Fast atomic load, suitable for calling at every node.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Check the clock and raise the stop flag if time expired.
    ///
    /// Call this every `check_interval` nodes rather than at every node.
    pub fn check_time(&self) -> bool {
        if self.is_stopped() {
            return true;
        }

        if let Some(limit) = self.time_limit
            && let Some(start) = self.started()
            && start.elapsed() >= limit
        {
            self.stop();
            return true;
        }

        false
    }

    /// Returns true every `check_interval` nodes.
    #[inline]
    pub fn should_check_time(&self, nodes: u64) -> bool {
        nodes.is_multiple_of(self.check_interval)
    }

    /// Get elapsed time since search started.
    pub fn elapsed(&self) -> Duration {
        self.started()
            .map(|s| s.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Get remaining time (None if no limit).
    pub fn remaining(&self) -> Option<Duration> {
        let limit = self.time_limit?;
        Some(limit.saturating_sub(self.elapsed()))
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
