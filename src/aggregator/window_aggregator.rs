//! Fixed-length window counter.

use std::time::{Duration, Instant};

use crate::domain::WindowSummary;

/// Counts broadcast frames over consecutive windows.
///
/// The caller supplies `now` on every check, so the aggregator never
/// touches a clock or a timer itself. Windows are measured from the last
/// close rather than aligned to wall-clock boundaries; the latency between
/// the boundary and the check that notices it is carried into the next
/// window.
#[derive(Debug, Clone)]
pub struct WindowAggregator {
    count: u64,
    window_start: Instant,
    window_length: Duration,
}

impl WindowAggregator {
    /// Open the first window at `start`.
    pub fn new(window_length: Duration, start: Instant) -> Self {
        Self {
            count: 0,
            window_start: start,
            window_length,
        }
    }

    /// Count one broadcast frame in the current window.
    pub fn record_broadcast(&mut self) {
        self.count += 1;
    }

    /// Close the current window if it has run its full length.
    ///
    /// Returns a summary and opens a new window at `now` once
    /// `now - window_start >= window_length`. Otherwise leaves the state
    /// untouched. Only one summary is produced per call, however many
    /// window lengths have passed.
    pub fn maybe_close_window(&mut self, now: Instant) -> Option<WindowSummary> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window_length {
            return None;
        }

        let summary = WindowSummary {
            count: self.count,
            window_length: self.window_length,
            elapsed,
        };

        self.count = 0;
        self.window_start = now;

        Some(summary)
    }

    /// Broadcasts counted in the open window.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// When the open window started.
    pub fn window_start(&self) -> Instant {
        self.window_start
    }

    pub fn window_length(&self) -> Duration {
        self.window_length
    }
}
