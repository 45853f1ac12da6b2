//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortSpec` handles user-supplied port lists such as `"22,80,8000-8010"`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Ports probed when the caller does not supply a list.
///
/// SSH, HTTP, HTTPS and Modbus/TCP.
pub const DEFAULT_PORTS: [Port; 4] = [Port(22), Port(80), Port(443), Port(502)];

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(value))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u16),
    #[error("invalid port number: {0}")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
    #[error("empty port specification")]
    Empty,
}

/// An ordered list of ports to probe.
///
/// Unlike a set, the order the user wrote is kept: the prober reports open
/// ports in this order. Duplicates are dropped on first sight.
///
/// Supports formats like:
/// - Single port: "80"
/// - Comma-separated: "22,80,443"
/// - Range: "8000-8010"
/// - Mixed: "22,80,443,8000-9000"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    ports: Vec<Port>,
}

impl PortSpec {
    /// Build a spec from already validated ports.
    pub fn from_ports(ports: impl IntoIterator<Item = Port>) -> Self {
        let mut seen = HashSet::new();
        Self {
            ports: ports.into_iter().filter(|p| seen.insert(*p)).collect(),
        }
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn into_ports(self) -> Vec<Port> {
        self.ports
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

impl Default for PortSpec {
    fn default() -> Self {
        Self::from_ports(DEFAULT_PORTS)
    }
}

impl FromStr for PortSpec {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortError::Empty);
        }

        let mut listed = Vec::new();

        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some((start, end)) = part.split_once('-') {
                let start = parse_port(start)?;
                let end = parse_port(end)?;
                if start > end {
                    return Err(PortError::InvalidRange(start.0, end.0));
                }
                listed.extend((start.0..=end.0).map(Port));
            } else {
                listed.push(parse_port(part)?);
            }
        }

        let spec = Self::from_ports(listed);
        if spec.is_empty() {
            return Err(PortError::Empty);
        }

        Ok(spec)
    }
}

fn parse_port(raw: &str) -> Result<Port, PortError> {
    let raw = raw.trim();
    let value: u16 = raw
        .parse()
        .map_err(|_| PortError::InvalidFormat(raw.to_string()))?;
    Port::try_from(value)
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ports.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}
