//! Capture loop orchestration.

mod capture_loop;

pub use capture_loop::{CaptureLoop, LoopState, LoopStats, StopReason};
