//! Reporting module for broadcast monitoring.
//!
//! The capture loop talks to an `EventReporter`; what the operator
//! actually sees is up to the implementation.

mod console_reporter;

pub use console_reporter::ConsoleReporter;

use std::time::Duration;

use crate::domain::{Classification, WindowSummary};

/// Receives everything the capture loop wants to tell the operator.
///
/// Calls arrive in the order the loop produces them, from a single task.
pub trait EventReporter: Send {
    /// Called once the capture handle is open and the loop is about to run.
    fn on_start(&mut self, interface: &str, window: Duration);

    /// Report one broadcast frame.
    fn report_packet(&mut self, packet: &Classification);

    /// Report a closed window.
    fn report_window(&mut self, summary: &WindowSummary);

    /// Called once the loop has stopped.
    fn on_stop(&mut self);
}
