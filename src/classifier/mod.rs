//! Frame classification module.
//!
//! Decides whether a captured frame is a broadcast and pulls out the
//! source identifiers worth reporting.

mod frame_classifier;

pub use frame_classifier::FrameClassifier;
