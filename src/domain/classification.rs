//! Result of classifying one frame.

use std::net::IpAddr;

use macaddr::MacAddr6;

/// What the classifier learned about a single frame.
///
/// `source_ip` is best-effort: it is `None` whenever the frame carries no
/// network-layer header we can decode. Rendering that as "unknown" is left
/// to the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Whether the link-layer destination is the all-ones address.
    pub is_broadcast: bool,
    /// Link-layer source address; `None` when the link layer was undecodable.
    pub source_mac: Option<MacAddr6>,
    /// Network-layer source address, when one was present and decodable.
    pub source_ip: Option<IpAddr>,
}

impl Classification {
    /// Result for a frame whose link-layer header could not be decoded.
    pub fn undecodable() -> Self {
        Self {
            is_broadcast: false,
            source_mac: None,
            source_ip: None,
        }
    }
}
