//! Packet capture abstraction.
//!
//! The capture loop only sees the `FrameSource` and `InterfaceDirectory`
//! traits; the pnet-backed implementations live in `pnet_capture`. Tests
//! drive the loop with scripted sources instead of a live interface.

mod filter;
mod pnet_capture;
mod pump;

pub use filter::CaptureFilter;
pub use pnet_capture::{PnetCapture, PnetDirectory};
pub use pump::{spawn_pump, FrameEvent, PUMP_CAPACITY};

use std::fmt;
use std::net::Ipv4Addr;

use macaddr::MacAddr6;

use crate::domain::CapturedFrame;
use crate::error::CaptureError;

/// A live, blocking stream of frames from one interface.
///
/// Dropping the source releases the underlying capture handle.
pub trait FrameSource: Send {
    /// Wait for the next frame that passes the source's filter.
    ///
    /// Returns `Ok(None)` when no frame arrived within the source's read
    /// timeout, so the caller can check whether it should keep reading.
    /// An `Err` is terminal: the source will not produce more frames.
    fn next_frame(&mut self) -> Result<Option<CapturedFrame>, CaptureError>;

    /// Name of the interface being captured.
    fn interface_name(&self) -> &str;
}

/// One entry in the interface listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    pub name: String,
    pub description: String,
    pub ipv4: Option<Ipv4Addr>,
    pub mac: Option<MacAddr6>,
    pub is_up: bool,
    pub is_loopback: bool,
}

impl InterfaceDescriptor {
    /// Whether this interface is a sensible default to monitor.
    pub fn is_candidate(&self) -> bool {
        self.is_up && !self.is_loopback && self.ipv4.is_some()
    }
}

impl fmt::Display for InterfaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.description.is_empty() {
            write!(f, " ({})", self.description)?;
        }
        match self.ipv4 {
            Some(ip) => write!(f, " [{}]", ip),
            None => write!(f, " [no IPv4]"),
        }
    }
}

/// Lists interfaces and opens capture handles on them.
pub trait InterfaceDirectory {
    /// All interfaces visible to the process.
    fn list(&self) -> Result<Vec<InterfaceDescriptor>, CaptureError>;

    /// Open a capture handle on `interface` with `filter` applied.
    fn open(
        &self,
        interface: &InterfaceDescriptor,
        filter: CaptureFilter,
    ) -> Result<Box<dyn FrameSource>, CaptureError>;
}
