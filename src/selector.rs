//! Choosing the interface to monitor.
//!
//! A selector given on the command line may be an index into the listing,
//! an interface name, or an interface description. Without one, the
//! operator is prompted when stdin is interactive; otherwise the first
//! up, non-loopback interface with an IPv4 address is used.

use std::io::{BufRead, Write};

use crate::capture::InterfaceDescriptor;
use crate::error::SelectError;

/// Write the numbered interface listing.
pub fn write_listing<W: Write>(
    out: &mut W,
    interfaces: &[InterfaceDescriptor],
) -> std::io::Result<()> {
    writeln!(out, "Available network interfaces:")?;
    for (index, iface) in interfaces.iter().enumerate() {
        writeln!(out, "[{}] {}", index, iface)?;
    }
    Ok(())
}

/// Resolve a selector against the listing.
///
/// Exact names win over descriptions, and both win over indices, so an
/// interface literally named "0" is still reachable.
pub fn resolve<'a>(
    interfaces: &'a [InterfaceDescriptor],
    selector: &str,
) -> Result<&'a InterfaceDescriptor, SelectError> {
    if interfaces.is_empty() {
        return Err(SelectError::NoInterfaces);
    }

    let selector = selector.trim();

    if let Some(iface) = interfaces.iter().find(|iface| iface.name == selector) {
        return Ok(iface);
    }

    if let Some(iface) = interfaces
        .iter()
        .find(|iface| !iface.description.is_empty() && iface.description == selector)
    {
        return Ok(iface);
    }

    selector
        .parse::<usize>()
        .ok()
        .and_then(|index| interfaces.get(index))
        .ok_or_else(|| SelectError::NoMatch(selector.to_string()))
}

/// List the interfaces on `output` and read an index from `input`.
pub fn prompt<'a, R: BufRead, W: Write>(
    interfaces: &'a [InterfaceDescriptor],
    input: &mut R,
    output: &mut W,
) -> Result<&'a InterfaceDescriptor, SelectError> {
    if interfaces.is_empty() {
        return Err(SelectError::NoInterfaces);
    }

    write_listing(output, interfaces)?;
    write!(output, "Select the interface to monitor: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let choice = line.trim();

    choice
        .parse::<usize>()
        .ok()
        .and_then(|index| interfaces.get(index))
        .ok_or_else(|| SelectError::InvalidChoice(choice.to_string()))
}

/// First interface that is up, not loopback, and has an IPv4 address.
pub fn default_interface(
    interfaces: &[InterfaceDescriptor],
) -> Result<&InterfaceDescriptor, SelectError> {
    if interfaces.is_empty() {
        return Err(SelectError::NoInterfaces);
    }

    interfaces
        .iter()
        .find(|iface| iface.is_candidate())
        .ok_or(SelectError::NoDefault)
}
