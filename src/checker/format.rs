//! Candidate format validation
//!
//! Cheap structural filter applied before any network cost is paid.

use std::net::Ipv4Addr;

use crate::error::{CheckError, Result};
use crate::models::ParsedEndpoint;

/// Parse a raw `ipv4:port` candidate
///
/// No hostname resolution happens here; anything other than a dotted-quad
/// IPv4 address is rejected.
pub fn validate(raw: &str) -> Result<ParsedEndpoint> {
    let mut parts = raw.split(':');
    let (host, port) = match (parts.next(), parts.next(), parts.next()) {
        (Some(host), Some(port), None) if !host.is_empty() && !port.is_empty() => (host, port),
        _ => {
            return Err(CheckError::InvalidFormat(
                "expected exactly one ':' between host and port".to_string(),
            ))
        }
    };

    let port: u16 = port
        .parse()
        .map_err(|_| CheckError::InvalidFormat(format!("invalid port '{}'", port)))?;

    let host: Ipv4Addr = host
        .parse()
        .map_err(|_| CheckError::InvalidFormat(format!("invalid IPv4 address '{}'", host)))?;

    Ok(ParsedEndpoint::new(host, port))
}
