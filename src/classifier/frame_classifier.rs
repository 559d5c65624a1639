//! Broadcast classification logic.

use std::net::IpAddr;

use macaddr::MacAddr6;
use pnet::packet::arp::ArpPacket;
use pnet::packet::ethernet::{EtherType, EtherTypes};
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::ipv6::Ipv6Packet;
use pnet::packet::vlan::VlanPacket;
use pnet::packet::Packet;

use crate::domain::{CapturedFrame, Classification, BROADCAST_MAC};

/// Classifies captured frames.
///
/// Stateless: the result depends only on the frame bytes. Frames that
/// cannot be decoded at the link layer are reported as non-broadcast
/// instead of as errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClassifier;

impl FrameClassifier {
    /// Create a new classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classify one frame.
    pub fn classify(&self, frame: &CapturedFrame) -> Classification {
        let Some(ethernet) = frame.ethernet() else {
            return Classification::undecodable();
        };

        let is_broadcast = ethernet.get_destination().octets() == BROADCAST_MAC;
        let source_mac = MacAddr6::from(ethernet.get_source().octets());
        let source_ip = network_source(ethernet.get_ethertype(), ethernet.payload());

        Classification {
            is_broadcast,
            source_mac: Some(source_mac),
            source_ip,
        }
    }
}

/// Best-effort lookup of the network-layer source address.
fn network_source(ethertype: EtherType, payload: &[u8]) -> Option<IpAddr> {
    match ethertype {
        EtherTypes::Ipv4 => {
            let ipv4 = Ipv4Packet::new(payload)?;
            if ipv4.get_version() != 4 {
                return None;
            }
            Some(IpAddr::V4(ipv4.get_source()))
        }
        EtherTypes::Ipv6 => {
            let ipv6 = Ipv6Packet::new(payload)?;
            if ipv6.get_version() != 6 {
                return None;
            }
            Some(IpAddr::V6(ipv6.get_source()))
        }
        // ARP carries the sender's protocol address, which is what
        // operators usually want to see for broadcast ARP requests.
        EtherTypes::Arp => {
            let arp = ArpPacket::new(payload)?;
            Some(IpAddr::V4(arp.get_sender_proto_addr()))
        }
        EtherTypes::Vlan => {
            let vlan = VlanPacket::new(payload)?;
            network_source(vlan.get_ethertype(), vlan.payload())
        }
        _ => None,
    }
}
