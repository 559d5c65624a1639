//! bcastwatch - broadcast traffic monitor.
//!
//! Watches one interface, counts broadcast frames over fixed windows and
//! prints the source of every broadcast as it arrives.
//!
//! The pipeline is capture handle → [`capture::spawn_pump`] →
//! [`CaptureLoop`] → [`FrameClassifier`] → [`WindowAggregator`] →
//! [`EventReporter`]. The loop stops when the [`ShutdownSignal`] fires.

pub mod aggregator;
pub mod capture;
pub mod classifier;
pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod reporter;
pub mod selector;
pub mod shutdown;

pub use aggregator::WindowAggregator;
pub use capture::{
    CaptureFilter, FrameSource, InterfaceDescriptor, InterfaceDirectory, PnetDirectory,
};
pub use classifier::FrameClassifier;
pub use config::{Config, ConfigArgs};
pub use controller::{CaptureLoop, LoopState, LoopStats, StopReason};
pub use domain::{CapturedFrame, Classification, WindowSummary};
pub use error::{CaptureError, ConfigError, SelectError};
pub use reporter::{ConsoleReporter, EventReporter};
pub use shutdown::{ShutdownListener, ShutdownSignal};
