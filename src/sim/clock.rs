//! Frame clock
//!
//! Turns the timestamps handed to each animation-frame callback into
//! per-tick deltas.

use crate::consts::{FRAME_MS, MAX_FRAME_DELTA_MS};

/// Tracks the previous frame timestamp and produces clamped deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Timestamp of the last frame (ms), None right after arming
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous timestamp so the next delta is the baseline frame.
    /// Called on start and on resume so paused time is not counted.
    pub fn rearm(&mut self) {
        self.last_ms = None;
    }

    /// Delta since the previous frame in ms. The first frame after arming
    /// reports `FRAME_MS`.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) as f32).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => FRAME_MS,
        };
        self.last_ms = Some(now_ms);
        dt
    }
}
