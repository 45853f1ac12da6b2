//! IPv4 subnet parsing, validation and host iteration.
//!
//! A [`Subnet`] can only be built from input that passes [`validate_cidr`],
//! so every other module can iterate hosts without re-checking anything.

use ipnetwork::Ipv4Network;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::LazyLock;

/// Shape check applied before any numeric validation.
static CIDR_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3}\.){3}\d{1,3}/\d{1,2}$").expect("CIDR pattern is valid")
});

/// Error type for subnet validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubnetError {
    #[error("invalid CIDR format '{0}', use a format like 192.168.0.0/24")]
    Format(String),
    #[error("octet {0} is out of range (0-255)")]
    OctetOutOfRange(u32),
    #[error("prefix length /{0} is out of range (0-32)")]
    PrefixOutOfRange(u32),
}

/// Validate a CIDR string and parse it into a [`Subnet`].
///
/// Accepts dotted-quad notation with a prefix length, e.g. `192.168.1.0/24`.
/// Host bits in the base address are masked off.
pub fn validate_cidr(input: &str) -> Result<Subnet, SubnetError> {
    let input = input.trim();
    if !CIDR_SHAPE.is_match(input) {
        return Err(SubnetError::Format(input.to_string()));
    }

    let (addr, prefix) = input
        .split_once('/')
        .ok_or_else(|| SubnetError::Format(input.to_string()))?;

    let mut octets = [0u8; 4];
    for (slot, part) in octets.iter_mut().zip(addr.split('.')) {
        let value: u32 = part
            .parse()
            .map_err(|_| SubnetError::Format(input.to_string()))?;
        *slot = u8::try_from(value).map_err(|_| SubnetError::OctetOutOfRange(value))?;
    }

    let prefix: u32 = prefix
        .parse()
        .map_err(|_| SubnetError::Format(input.to_string()))?;
    if prefix > 32 {
        return Err(SubnetError::PrefixOutOfRange(prefix));
    }

    // Both bounds are checked above, so construction cannot fail.
    let network = Ipv4Network::new(Ipv4Addr::from(octets), prefix as u8)
        .map_err(|_| SubnetError::PrefixOutOfRange(prefix))?;
    let network = Ipv4Network::new(network.network(), network.prefix())
        .map_err(|_| SubnetError::PrefixOutOfRange(prefix))?;

    Ok(Subnet(network))
}

/// Returns `true` if the input is a well-formed IPv4 CIDR block.
pub fn is_valid_cidr(input: &str) -> bool {
    validate_cidr(input).is_ok()
}

/// A validated IPv4 CIDR block.
///
/// Network and broadcast addresses are not treated as hosts for prefixes
/// shorter than /31. A /31 yields both addresses and a /32 yields the single
/// address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subnet(Ipv4Network);

impl Subnet {
    pub fn network(&self) -> Ipv4Addr {
        self.0.network()
    }

    pub fn prefix(&self) -> u8 {
        self.0.prefix()
    }

    /// Number of addresses [`Subnet::hosts`] yields.
    pub fn host_count(&self) -> u64 {
        let size = 1u64 << (32 - u32::from(self.prefix()));
        if self.prefix() < 31 {
            size - 2
        } else {
            size
        }
    }

    /// Iterate usable host addresses in ascending order.
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> {
        let base = u32::from(self.network());
        let size = 1u64 << (32 - u32::from(self.prefix()));
        let (first, last) = if self.prefix() < 31 {
            (1, size - 2)
        } else {
            (0, size - 1)
        };
        (first..=last).map(move |offset| Ipv4Addr::from(base + offset as u32))
    }

    /// Whether `addr` is one of this subnet's hosts.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        if !self.0.contains(addr) {
            return false;
        }
        self.prefix() >= 31 || (addr != self.0.network() && addr != self.0.broadcast())
    }
}

impl FromStr for Subnet {
    type Err = SubnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_cidr(s)
    }
}

impl TryFrom<String> for Subnet {
    type Error = SubnetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_cidr(&value)
    }
}

impl From<Subnet> for String {
    fn from(subnet: Subnet) -> Self {
        subnet.to_string()
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_cidr() {
        assert!(is_valid_cidr("192.168.1.0/24"));
        assert!(is_valid_cidr("10.0.0.0/8"));
        assert!(is_valid_cidr("0.0.0.0/0"));
        assert!(is_valid_cidr("255.255.255.255/32"));
    }

    #[test]
    fn test_rejects_invalid_cidr() {
        assert_eq!(
            validate_cidr("999.1.1.1/24"),
            Err(SubnetError::OctetOutOfRange(999))
        );
        assert_eq!(
            validate_cidr("10.0.0.0/33"),
            Err(SubnetError::PrefixOutOfRange(33))
        );
        assert!(matches!(
            validate_cidr("not-a-subnet"),
            Err(SubnetError::Format(_))
        ));
        assert!(!is_valid_cidr("10.0.0.0"));
        assert!(!is_valid_cidr("10.0.0/24"));
        assert!(!is_valid_cidr("10.0.0.0/123"));
        assert!(!is_valid_cidr("1234.0.0.0/8"));
    }

    #[test]
    fn test_masks_host_bits() {
        let subnet = validate_cidr("10.0.0.5/24").unwrap();
        assert_eq!(subnet.to_string(), "10.0.0.0/24");
    }

    #[test]
    fn test_hosts_exclude_network_and_broadcast() {
        let subnet: Subnet = "10.0.0.0/29".parse().unwrap();
        let hosts: Vec<Ipv4Addr> = subnet.hosts().collect();
        assert_eq!(hosts.len(), 6);
        assert_eq!(hosts.first(), Some(&Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(hosts.last(), Some(&Ipv4Addr::new(10, 0, 0, 6)));
        assert_eq!(subnet.host_count(), 6);
        assert!(!subnet.contains(Ipv4Addr::new(10, 0, 0, 0)));
        assert!(!subnet.contains(Ipv4Addr::new(10, 0, 0, 7)));
        assert!(subnet.contains(Ipv4Addr::new(10, 0, 0, 5)));
    }

    #[test]
    fn test_point_to_point_and_single_host() {
        let p2p: Subnet = "10.0.0.0/31".parse().unwrap();
        assert_eq!(p2p.hosts().count(), 2);
        assert_eq!(p2p.host_count(), 2);

        let single: Subnet = "10.0.0.9/32".parse().unwrap();
        assert_eq!(single.hosts().collect::<Vec<_>>(), vec![Ipv4Addr::new(10, 0, 0, 9)]);
        assert_eq!(single.host_count(), 1);
    }

    #[test]
    fn test_host_count_for_large_blocks() {
        let slash16: Subnet = "172.16.0.0/16".parse().unwrap();
        assert_eq!(slash16.host_count(), 65_534);
        let everything: Subnet = "0.0.0.0/0".parse().unwrap();
        assert_eq!(everything.host_count(), (1u64 << 32) - 2);
    }

    #[test]
    fn test_serde_as_string() {
        let subnet: Subnet = "192.168.0.0/24".parse().unwrap();
        assert_eq!(serde_json::to_string(&subnet).unwrap(), "\"192.168.0.0/24\"");
        assert!(serde_json::from_str::<Subnet>("\"10.0.0.0/40\"").is_err());
    }
}
