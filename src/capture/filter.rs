//! Capture-side frame filters.

use std::fmt;
use std::str::FromStr;

use crate::domain::BROADCAST_MAC;
use crate::error::CaptureError;

/// Filter applied by the capture handle before frames reach the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureFilter {
    /// Only frames addressed to `ff:ff:ff:ff:ff:ff`.
    #[default]
    Broadcast,
    /// Every frame.
    All,
}

impl CaptureFilter {
    /// Whether a raw frame passes the filter.
    pub fn matches(&self, frame: &[u8]) -> bool {
        match self {
            Self::Broadcast => frame.len() >= 6 && frame[..6] == BROADCAST_MAC,
            Self::All => true,
        }
    }
}

impl FromStr for CaptureFilter {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "broadcast" | "ether broadcast" => Ok(Self::Broadcast),
            "all" => Ok(Self::All),
            _ => Err(CaptureError::InvalidFilter(s.to_string())),
        }
    }
}

impl fmt::Display for CaptureFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Broadcast => write!(f, "broadcast"),
            Self::All => write!(f, "all"),
        }
    }
}
