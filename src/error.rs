//! Error types for the broadcast monitor.

use thiserror::Error;

/// Errors raised while discovering interfaces or reading from a capture handle.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Interface not found: {0}")]
    InterfaceNotFound(String),

    #[error("Failed to create datalink channel: {0}")]
    ChannelCreation(String),

    #[error("Insufficient permissions to capture (run as root or with CAP_NET_RAW)")]
    InsufficientPermissions,

    #[error("Unsupported channel type on interface {0}")]
    UnsupportedChannel(String),

    #[error("Invalid capture filter '{0}': expected 'broadcast' or 'all'")]
    InvalidFilter(String),

    #[error("Capture failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building the runtime configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Window length must be at least one second, got {0}")]
    InvalidWindow(u64),

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Errors raised while choosing the interface to monitor.
#[derive(Error, Debug)]
pub enum SelectError {
    #[error("No network interfaces available")]
    NoInterfaces,

    #[error("No interface matches '{0}'")]
    NoMatch(String),

    #[error("Invalid choice '{0}': enter an index from the list")]
    InvalidChoice(String),

    #[error("No suitable interface found: pass --interface")]
    NoDefault,

    #[error("Failed to read selection: {0}")]
    Io(#[from] std::io::Error),
}
