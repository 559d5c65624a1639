//! Domain models for broadcast monitoring.
//!
//! These types carry no capture or scheduling concerns, so the classifier
//! and aggregator can be exercised with plain values.

mod classification;
mod frame;
mod summary;

pub use classification::Classification;
pub use frame::{CapturedFrame, BROADCAST_MAC};
pub use summary::WindowSummary;
