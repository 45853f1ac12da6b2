//! Liveness prober abstraction.
//!
//! Defines a common interface for every way of asking "is this host up?",
//! so discovery can swap probing mechanisms and tests can inject fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

/// Available liveness probe mechanisms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    /// System `ping` utility (default, no special privileges required).
    #[default]
    Ping,
    /// Native ICMP echo over a raw socket (requires root/admin privileges).
    Icmp,
    /// TCP connect to a few common ports; a refusal also counts as alive.
    Tcp,
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ping => write!(f, "ping"),
            Self::Icmp => write!(f, "icmp"),
            Self::Tcp => write!(f, "tcp"),
        }
    }
}

impl std::str::FromStr for ProbeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ping" => Ok(Self::Ping),
            "icmp" | "raw" => Ok(Self::Icmp),
            "tcp" | "connect" => Ok(Self::Tcp),
            _ => Err(format!("unknown probe kind: {}", s)),
        }
    }
}

/// Trait for host liveness probes.
///
/// Implementations must never fail: any error (no route, permission problem,
/// timeout) is reported as `false`. Each call owns whatever socket or child
/// process it creates and releases it before returning.
#[async_trait]
pub trait LivenessProber: Send + Sync {
    /// Get the probe mechanism this prober implements.
    fn kind(&self) -> ProbeKind;

    /// Check if this prober requires elevated privileges.
    fn requires_privileges(&self) -> bool;

    /// Upper bound on a single probe.
    fn timeout(&self) -> Duration;

    /// Probe a single address.
    async fn is_alive(&self, addr: Ipv4Addr) -> bool;
}

/// A shared prober for dynamic dispatch across tasks.
pub type SharedProber = Arc<dyn LivenessProber>;
