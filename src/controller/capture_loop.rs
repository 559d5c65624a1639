//! The capture loop state machine.
//!
//! Each iteration races three events: the shutdown signal, the next
//! frame from the capture pump, and the window tick. Shutdown always wins
//! when it is ready, so no frame is examined once it has fired.
//!
//! The ticker and the aggregator share one clock: a tick closes the window
//! at the instant the tick was scheduled for, and every close re-arms the
//! ticker one window length after the close.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::aggregator::WindowAggregator;
use crate::capture::{spawn_pump, FrameEvent, FrameSource, PUMP_CAPACITY};
use crate::classifier::FrameClassifier;
use crate::domain::CapturedFrame;
use crate::error::CaptureError;
use crate::reporter::EventReporter;
use crate::shutdown::ShutdownListener;

/// Where the loop is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Created, no capture handle yet.
    Idle,
    Running,
    Stopped,
}

/// Why the loop stopped.
#[derive(Debug)]
pub enum StopReason {
    /// The shutdown signal fired.
    Shutdown,
    /// The capture handle failed while running.
    CaptureFailed(CaptureError),
    /// The capture pump went away without reporting an error.
    SourceClosed,
}

/// Counters kept over the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Frames handed to the classifier.
    pub frames_examined: u64,
    /// Frames counted as broadcast.
    pub broadcasts: u64,
    /// Frames the classifier rejected.
    pub skipped: u64,
    /// Window summaries emitted.
    pub windows_closed: u64,
}

/// Drives frames through the classifier and aggregator.
pub struct CaptureLoop<R: EventReporter> {
    classifier: FrameClassifier,
    aggregator: WindowAggregator,
    reporter: R,
    window: Duration,
    state: LoopState,
    stats: LoopStats,
}

impl<R: EventReporter> CaptureLoop<R> {
    /// Create an idle loop. The first window opens when the loop starts.
    pub fn new(window: Duration, reporter: R) -> Self {
        Self {
            classifier: FrameClassifier::new(),
            aggregator: WindowAggregator::new(window, Instant::now().into_std()),
            reporter,
            window,
            state: LoopState::Idle,
            stats: LoopStats::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Run on an open capture handle until shutdown or capture failure.
    ///
    /// The handle is moved onto the capture pump and is released before
    /// this returns.
    pub async fn run(
        &mut self,
        source: Box<dyn FrameSource>,
        shutdown: &mut ShutdownListener,
    ) -> StopReason {
        let interface = source.interface_name().to_string();
        self.reporter.on_start(&interface, self.window);
        info!(
            "Capture loop running on {} with a {}s window",
            interface,
            self.window.as_secs()
        );

        let (mut frames, pump) = spawn_pump(source, PUMP_CAPACITY);
        let reason = self.drive(&mut frames, shutdown).await;

        // Frames still queued in the pump are discarded.
        drop(frames);
        if let Err(e) = pump.await {
            error!("Capture pump panicked: {}", e);
        }

        self.reporter.on_stop();
        reason
    }

    /// Process frame events until shutdown or until the stream ends.
    ///
    /// The loop is `Running` from here on and the first window opens now.
    pub async fn drive(
        &mut self,
        frames: &mut mpsc::Receiver<FrameEvent>,
        shutdown: &mut ShutdownListener,
    ) -> StopReason {
        let start = Instant::now();
        self.aggregator = WindowAggregator::new(self.window, start.into_std());
        self.state = LoopState::Running;

        let mut ticker = interval_at(start + self.window, self.window);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let reason = loop {
            tokio::select! {
                biased;

                _ = shutdown.wait() => {
                    info!("Shutdown requested");
                    break StopReason::Shutdown;
                }

                event = frames.recv() => match event {
                    Some(Ok(frame)) => self.handle_frame(&frame, &mut ticker),
                    Some(Err(e)) => {
                        error!("Capture failed, stopping: {}", e);
                        break StopReason::CaptureFailed(e);
                    }
                    None => {
                        info!("Capture source closed");
                        break StopReason::SourceClosed;
                    }
                },

                scheduled = ticker.tick() => self.check_window(scheduled, &mut ticker),
            }
        };

        self.state = LoopState::Stopped;
        info!(
            "Capture loop stopped: {} frames examined, {} broadcasts, {} skipped, {} windows",
            self.stats.frames_examined,
            self.stats.broadcasts,
            self.stats.skipped,
            self.stats.windows_closed
        );
        reason
    }

    fn handle_frame(&mut self, frame: &CapturedFrame, ticker: &mut Interval) {
        self.stats.frames_examined += 1;

        let packet = self.classifier.classify(frame);
        if !packet.is_broadcast {
            self.stats.skipped += 1;
            debug!("Skipping non-broadcast frame ({} bytes)", frame.len());
            return;
        }

        self.stats.broadcasts += 1;
        self.aggregator.record_broadcast();
        self.reporter.report_packet(&packet);
        self.check_window(Instant::now(), ticker);
    }

    fn check_window(&mut self, now: Instant, ticker: &mut Interval) {
        if let Some(summary) = self.aggregator.maybe_close_window(now.into_std()) {
            ticker.reset_at(now + self.window);
            self.stats.windows_closed += 1;
            debug!(
                "Window closed after {:.3}s with {} broadcasts",
                summary.elapsed.as_secs_f64(),
                summary.count
            );
            self.reporter.report_window(&summary);
        }
    }
}
