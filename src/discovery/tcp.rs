//! TCP connect liveness prober.
//!
//! A host is up if any probe port either accepts the connection or actively
//! refuses it: a RST still proves something answered at that address.

use crate::discovery::traits::{LivenessProber, ProbeKind};
use crate::types::Port;
use async_trait::async_trait;
use futures::future::join_all;
use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Ports tried when no list is configured.
pub const DEFAULT_TCP_PROBE_PORTS: [u16; 4] = [80, 443, 22, 445];

/// Unprivileged liveness check built on plain TCP connects.
#[derive(Debug, Clone)]
pub struct TcpProber {
    ports: Vec<Port>,
    timeout: Duration,
}

impl TcpProber {
    pub fn new(ports: Vec<Port>, timeout: Duration) -> Self {
        Self { ports, timeout }
    }

    pub fn with_default_ports(timeout: Duration) -> Self {
        let ports = DEFAULT_TCP_PROBE_PORTS
            .iter()
            .filter_map(|&p| Port::new(p))
            .collect();
        Self::new(ports, timeout)
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }
}

#[async_trait]
impl LivenessProber for TcpProber {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Tcp
    }

    fn requires_privileges(&self) -> bool {
        false
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn is_alive(&self, addr: Ipv4Addr) -> bool {
        let attempts = self.ports.iter().map(|port| {
            let target = SocketAddr::from((addr, port.as_u16()));
            async move { timeout(self.timeout, TcpStream::connect(target)).await }
        });

        join_all(attempts).await.into_iter().any(|attempt| match attempt {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => true,
            Ok(Err(e)) => {
                trace!(%addr, error = %e, "tcp liveness attempt failed");
                false
            }
            Err(_) => false,
        })
    }
}
