//! pnet-based packet capture implementation.

use std::io::ErrorKind;
use std::net::IpAddr;
use std::time::Duration;

use macaddr::MacAddr6;
use pnet::datalink::{self, Channel, Config, DataLinkReceiver, NetworkInterface};
use tracing::{debug, info};

use super::{CaptureFilter, FrameSource, InterfaceDescriptor, InterfaceDirectory};
use crate::domain::CapturedFrame;
use crate::error::CaptureError;

/// How long a read may block before the handle reports "no frame yet".
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Interface directory backed by `pnet::datalink`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PnetDirectory;

impl PnetDirectory {
    pub fn new() -> Self {
        Self
    }

    fn find(&self, name: &str) -> Result<NetworkInterface, CaptureError> {
        datalink::interfaces()
            .into_iter()
            .find(|iface| iface.name == name)
            .ok_or_else(|| CaptureError::InterfaceNotFound(name.to_string()))
    }
}

impl InterfaceDirectory for PnetDirectory {
    fn list(&self) -> Result<Vec<InterfaceDescriptor>, CaptureError> {
        Ok(datalink::interfaces().iter().map(describe).collect())
    }

    fn open(
        &self,
        interface: &InterfaceDescriptor,
        filter: CaptureFilter,
    ) -> Result<Box<dyn FrameSource>, CaptureError> {
        let interface = self.find(&interface.name)?;
        Ok(Box::new(PnetCapture::open(&interface, filter)?))
    }
}

fn describe(iface: &NetworkInterface) -> InterfaceDescriptor {
    let ipv4 = iface.ips.iter().find_map(|net| match net.ip() {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(_) => None,
    });

    InterfaceDescriptor {
        name: iface.name.clone(),
        description: iface.description.clone(),
        ipv4,
        mac: iface.mac.map(|mac| MacAddr6::from(mac.octets())),
        is_up: iface.is_up(),
        is_loopback: iface.is_loopback(),
    }
}

/// Live capture handle on one interface.
///
/// The datalink channel is closed when the handle is dropped.
pub struct PnetCapture {
    name: String,
    rx: Box<dyn DataLinkReceiver>,
    filter: CaptureFilter,
}

impl PnetCapture {
    /// Open an Ethernet channel on `interface` and apply `filter`.
    pub fn open(interface: &NetworkInterface, filter: CaptureFilter) -> Result<Self, CaptureError> {
        let config = Config {
            read_timeout: Some(READ_TIMEOUT),
            ..Config::default()
        };

        let rx = match datalink::channel(interface, config) {
            Ok(Channel::Ethernet(_tx, rx)) => rx,
            Ok(_) => return Err(CaptureError::UnsupportedChannel(interface.name.clone())),
            Err(e) => {
                let msg = e.to_string();
                if e.kind() == ErrorKind::PermissionDenied
                    || msg.contains("permission")
                    || msg.contains("Operation not permitted")
                {
                    return Err(CaptureError::InsufficientPermissions);
                }
                return Err(CaptureError::ChannelCreation(msg));
            }
        };

        info!("Opened capture on {} with filter '{}'", interface.name, filter);

        Ok(Self {
            name: interface.name.clone(),
            rx,
            filter,
        })
    }
}

impl FrameSource for PnetCapture {
    fn next_frame(&mut self) -> Result<Option<CapturedFrame>, CaptureError> {
        match self.rx.next() {
            Ok(packet) if self.filter.matches(packet) => Ok(Some(CapturedFrame::new(packet))),
            Ok(_) => Ok(None),
            Err(e) if is_transient(e.kind()) => Ok(None),
            Err(e) => Err(CaptureError::Io(e)),
        }
    }

    fn interface_name(&self) -> &str {
        &self.name
    }
}

impl Drop for PnetCapture {
    fn drop(&mut self) {
        debug!("Released capture on {}", self.name);
    }
}

fn is_transient(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_are_transient() {
        assert!(is_transient(ErrorKind::TimedOut));
        assert!(is_transient(ErrorKind::WouldBlock));
        assert!(is_transient(ErrorKind::Interrupted));
    }

    #[test]
    fn test_device_errors_are_terminal() {
        assert!(!is_transient(ErrorKind::NotFound));
        assert!(!is_transient(ErrorKind::BrokenPipe));
        assert!(!is_transient(ErrorKind::Other));
    }

    #[test]
    fn test_open_unknown_interface_fails() {
        let directory = PnetDirectory::new();
        let missing = InterfaceDescriptor {
            name: "does-not-exist0".to_string(),
            description: String::new(),
            ipv4: None,
            mac: None,
            is_up: false,
            is_loopback: false,
        };

        let result = directory.open(&missing, CaptureFilter::Broadcast);
        assert!(matches!(
            result,
            Err(CaptureError::InterfaceNotFound(name)) if name == "does-not-exist0"
        ));
    }
}
