//! Window summaries produced by the aggregator.

use std::time::Duration;

/// Broadcast count for one closed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSummary {
    /// Broadcast frames counted while the window was open.
    pub count: u64,
    /// Configured window length.
    pub window_length: Duration,
    /// Time actually elapsed between the window opening and closing.
    ///
    /// Never shorter than `window_length`; the difference is the drift
    /// picked up from waiting on the next check.
    pub elapsed: Duration,
}

impl WindowSummary {
    /// Broadcast frames per second over the elapsed time.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.count as f64 / secs
    }
}
