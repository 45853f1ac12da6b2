//! TCP Connect port prober.
//!
//! Performs standard TCP connects using the operating system's socket API.
//! One attempt per port, no retries: this is a reachability sketch, not an
//! exhaustive scanner.

use crate::scanner::PortProber;
use crate::types::Port;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::fmt;
use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Default timeout for a single connect attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// Default number of ports probed at once on a single host.
pub const DEFAULT_PORT_CONCURRENCY: usize = 16;

/// Status of a probed port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortStatus {
    /// Connection accepted.
    Open,
    /// Connection actively refused (RST received).
    Closed,
    /// No answer within the timeout, or the network said unreachable.
    Filtered,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Filtered => write!(f, "filtered"),
        }
    }
}

/// Result of probing a single port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortResult {
    pub port: Port,
    pub status: PortStatus,
    pub response_time_ms: Option<u64>,
}

impl PortResult {
    pub fn is_open(&self) -> bool {
        self.status == PortStatus::Open
    }
}

/// TCP Connect Scanner.
///
/// Does not require elevated privileges. Every per-port failure is folded
/// into a [`PortStatus`]; nothing is ever propagated to the caller.
#[derive(Debug, Clone)]
pub struct TcpConnectScanner {
    timeout: Duration,
    concurrency: usize,
}

impl TcpConnectScanner {
    /// Create a new TCP connect scanner.
    ///
    /// # Arguments
    /// * `timeout` - Connection timeout per port
    /// * `concurrency` - Ports probed at once on one host (minimum 1)
    pub fn new(timeout: Duration, concurrency: usize) -> Self {
        Self {
            timeout,
            concurrency: concurrency.max(1),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe a single port.
    pub async fn scan_port(&self, host: Ipv4Addr, port: Port) -> PortResult {
        let addr = SocketAddr::new(IpAddr::V4(host), port.as_u16());
        let start = Instant::now();

        let status = match timeout(self.timeout, TcpStream::connect(addr)).await {
            // The stream is dropped here, closing the connection.
            Ok(Ok(_stream)) => PortStatus::Open,
            Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => PortStatus::Closed,
            Ok(Err(e)) => {
                trace!(%addr, error = %e, "connect failed");
                PortStatus::Filtered
            }
            Err(_) => PortStatus::Filtered,
        };

        PortResult {
            port,
            status,
            response_time_ms: (status == PortStatus::Open)
                .then(|| start.elapsed().as_millis() as u64),
        }
    }

    /// Probe every port and return all results in input order.
    pub async fn scan_all(&self, host: Ipv4Addr, ports: &[Port]) -> Vec<PortResult> {
        stream::iter(ports.iter().copied())
            .map(|port| self.scan_port(host, port))
            // `buffered` keeps input order while running attempts concurrently.
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

impl Default for TcpConnectScanner {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT_CONCURRENCY)
    }
}

#[async_trait]
impl PortProber for TcpConnectScanner {
    async fn open_ports(&self, host: Ipv4Addr, ports: &[Port]) -> Vec<Port> {
        let results = self.scan_all(host, ports).await;
        for result in &results {
            trace!(
                %host,
                port = %result.port,
                status = %result.status,
                rtt_ms = ?result.response_time_ms,
                "port probed"
            );
        }
        results
            .into_iter()
            .filter(PortResult::is_open)
            .map(|r| r.port)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn listener() -> (TcpListener, Port) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();
        (listener, port)
    }

    async fn closed_port() -> Port {
        let (listener, port) = listener().await;
        drop(listener);
        port
    }

    #[tokio::test]
    async fn test_open_port() {
        let (_listener, port) = listener().await;
        let scanner = TcpConnectScanner::default();

        let result = scanner.scan_port(Ipv4Addr::LOCALHOST, port).await;
        assert_eq!(result.status, PortStatus::Open);
        assert!(result.response_time_ms.is_some());
    }

    #[tokio::test]
    async fn test_scan_closed_port() {
        let port = closed_port().await;
        let scanner = TcpConnectScanner::new(Duration::from_millis(100), 4);

        let result = scanner.scan_port(Ipv4Addr::LOCALHOST, port).await;
        // Should be closed or filtered (depending on firewall)
        assert!(matches!(result.status, PortStatus::Closed | PortStatus::Filtered));
        assert!(!result.is_open());
    }

    #[tokio::test]
    async fn test_output_is_ordered_subsequence_of_input() {
        let (_a, open_a) = listener().await;
        let (_b, open_b) = listener().await;
        let closed = closed_port().await;
        let input = vec![open_b, closed, open_a];

        let scanner = TcpConnectScanner::new(Duration::from_millis(300), 3);
        let open = scanner.open_ports(Ipv4Addr::LOCALHOST, &input).await;

        assert_eq!(open, vec![open_b, open_a]);
    }

    #[tokio::test]
    async fn test_repeated_scans_agree() {
        let (_listener, open) = listener().await;
        let closed = closed_port().await;
        let ports = [open, closed];
        let scanner = TcpConnectScanner::default();

        let first = scanner.open_ports(Ipv4Addr::LOCALHOST, &ports).await;
        let second = scanner.open_ports(Ipv4Addr::LOCALHOST, &ports).await;
        assert_eq!(first, second);
        assert_eq!(first, vec![open]);
    }

    #[tokio::test]
    async fn test_empty_port_list() {
        let scanner = TcpConnectScanner::default();
        assert!(scanner.open_ports(Ipv4Addr::LOCALHOST, &[]).await.is_empty());
    }

    #[test]
    fn test_port_status_display() {
        assert_eq!(PortStatus::Open.to_string(), "open");
        assert_eq!(PortStatus::Closed.to_string(), "closed");
        assert_eq!(PortStatus::Filtered.to_string(), "filtered");
    }
}
