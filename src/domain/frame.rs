//! Raw captured frames.

use pnet::packet::ethernet::EthernetPacket;

/// The all-ones link-layer broadcast address.
pub const BROADCAST_MAC: [u8; 6] = [0xff; 6];

/// Length of an Ethernet II header (destination, source, ethertype).
const ETHERNET_HEADER_LEN: usize = 14;

/// A frame as delivered by the capture handle.
///
/// Owned by the capture loop for exactly one iteration and dropped
/// afterwards; nothing keeps historical frames around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    data: Vec<u8>,
}

impl CapturedFrame {
    /// Wrap the bytes of one frame.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    /// Raw bytes of the frame, starting at the link-layer header.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Decode the Ethernet header, if the frame is long enough to hold one.
    pub fn ethernet(&self) -> Option<EthernetPacket<'_>> {
        if self.data.len() < ETHERNET_HEADER_LEN {
            return None;
        }
        EthernetPacket::new(&self.data)
    }

    /// Destination hardware address, read straight from the header bytes.
    pub fn destination(&self) -> Option<[u8; 6]> {
        if self.data.len() < ETHERNET_HEADER_LEN {
            return None;
        }
        let mut dst = [0u8; 6];
        dst.copy_from_slice(&self.data[..6]);
        Some(dst)
    }
}

impl From<Vec<u8>> for CapturedFrame {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}
