//! Scanner module - port probing and the two-phase scan.
//!
//! A scan first runs host discovery over the subnet, then probes ports on
//! each live host in turn. Hosts are deliberately handled one after another;
//! only discovery fans out across the subnet.

pub mod tcp;

use crate::discovery::HostDiscovery;
use crate::error::{ScanError, ScanResult};
use crate::types::{Port, Subnet, DEFAULT_PORTS};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub use tcp::{
    PortResult, PortStatus, TcpConnectScanner, DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT_CONCURRENCY,
};

/// Default cap on subnet size for a full scan (a /16).
pub const DEFAULT_MAX_HOSTS: u64 = 65_536;

/// Trait for port prober implementations.
///
/// Implementations never fail: the returned list holds the ports that
/// accepted a connection, in the order they appear in `ports`.
#[async_trait]
pub trait PortProber: Send + Sync {
    async fn open_ports(&self, host: Ipv4Addr, ports: &[Port]) -> Vec<Port>;
}

/// Probe `ports` on `host` and return the open ones in input order.
pub async fn scan_ports(host: Ipv4Addr, ports: &[Port], timeout: Duration) -> Vec<Port> {
    TcpConnectScanner::new(timeout, DEFAULT_PORT_CONCURRENCY)
        .open_ports(host, ports)
        .await
}

/// Probe the default port set (22, 80, 443, 502) with the default timeout.
pub async fn scan_default_ports(host: Ipv4Addr) -> Vec<Port> {
    scan_ports(host, &DEFAULT_PORTS, DEFAULT_CONNECT_TIMEOUT).await
}

/// Open ports found on one live host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostResult {
    pub ip: Ipv4Addr,
    pub open_ports: Vec<Port>,
}

impl HostResult {
    pub fn new(ip: Ipv4Addr, open_ports: Vec<Port>) -> Self {
        Self { ip, open_ports }
    }

    pub fn port_count(&self) -> usize {
        self.open_ports.len()
    }
}

/// Everything a single scan produced.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub subnet: Subnet,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Addresses probed during discovery.
    pub hosts_probed: u64,
    /// One entry per live host, sorted by address.
    pub results: Vec<HostResult>,
}

impl ScanReport {
    pub fn total_open_ports(&self) -> usize {
        self.results.iter().map(HostResult::port_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Per-scan options.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub ports: Vec<Port>,
    /// Refuse subnets with more hosts than this (0 = unlimited).
    pub max_hosts: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            ports: DEFAULT_PORTS.to_vec(),
            max_hosts: DEFAULT_MAX_HOSTS,
        }
    }
}

/// Progress callback: `(hosts done, hosts total, host just finished)`.
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize, Ipv4Addr) + Send + Sync);

/// Run discovery over `subnet`, then probe ports on each live host.
///
/// An empty report is a normal outcome. The only error is a scan-level
/// refusal (currently: subnet larger than `max_hosts`).
pub async fn run_scan(
    discovery: &HostDiscovery,
    prober: &dyn PortProber,
    subnet: &Subnet,
    options: &ScanOptions,
    on_progress: Option<ProgressFn<'_>>,
) -> ScanResult<ScanReport> {
    let hosts_probed = subnet.host_count();
    if options.max_hosts > 0 && hosts_probed > options.max_hosts {
        return Err(ScanError::SubnetTooLarge {
            subnet: subnet.to_string(),
            hosts: hosts_probed,
            limit: options.max_hosts,
        });
    }

    let started_at = Utc::now();
    let start = Instant::now();

    let live = discovery.discover(subnet).await;
    info!(%subnet, live = live.len(), "discovery finished, probing ports");

    let total = live.len();
    let mut results = Vec::with_capacity(total);
    for (idx, ip) in live.into_iter().enumerate() {
        let open_ports = prober.open_ports(ip, &options.ports).await;
        debug!(%ip, open = open_ports.len(), "host probed");
        results.push(HostResult::new(ip, open_ports));
        if let Some(progress) = on_progress {
            progress(idx + 1, total, ip);
        }
    }
    results.sort_by_key(|r| r.ip);

    let report = ScanReport {
        subnet: *subnet,
        started_at,
        duration_ms: start.elapsed().as_millis() as u64,
        hosts_probed,
        results,
    };
    info!(
        %subnet,
        hosts = report.results.len(),
        open_ports = report.total_open_ports(),
        duration_ms = report.duration_ms,
        "scan complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::tests::FixedProber;
    use crate::output::{export, ExportFormat, ExportOptions};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Port prober answering from a fixed host -> ports table.
    struct TablePorts {
        open: HashMap<Ipv4Addr, Vec<u16>>,
        calls: Mutex<Vec<Ipv4Addr>>,
    }

    impl TablePorts {
        fn new(open: impl IntoIterator<Item = (Ipv4Addr, Vec<u16>)>) -> Self {
            Self {
                open: open.into_iter().collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PortProber for TablePorts {
        async fn open_ports(&self, host: Ipv4Addr, ports: &[Port]) -> Vec<Port> {
            self.calls.lock().unwrap().push(host);
            let open = self.open.get(&host).cloned().unwrap_or_default();
            ports
                .iter()
                .copied()
                .filter(|p| open.contains(&p.as_u16()))
                .collect()
        }
    }

    fn ports(raw: &[u16]) -> Vec<Port> {
        raw.iter().map(|&p| Port::new(p).unwrap()).collect()
    }

    #[tokio::test]
    async fn test_single_responsive_host_end_to_end() {
        let target = Ipv4Addr::new(10, 0, 0, 5);
        let discovery = HostDiscovery::new(Arc::new(FixedProber::new([target])), 50);
        let prober = TablePorts::new([(target, vec![22, 80])]);
        let subnet: Subnet = "10.0.0.0/29".parse().unwrap();

        let report = run_scan(&discovery, &prober, &subnet, &ScanOptions::default(), None)
            .await
            .unwrap();

        assert_eq!(report.results, vec![HostResult::new(target, ports(&[22, 80]))]);
        assert_eq!(report.hosts_probed, 6);
        assert_eq!(*prober.calls.lock().unwrap(), vec![target]);

        let csv = export(&report.results, ExportFormat::Csv, &ExportOptions::default()).unwrap();
        let csv = String::from_utf8(csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "IP,Open Ports,Port Count");
        assert!(lines[1].ends_with(",2"));
    }

    #[tokio::test]
    async fn test_no_responsive_hosts_yields_empty_report() {
        let discovery = HostDiscovery::new(Arc::new(FixedProber::new([])), 50);
        let prober = TablePorts::new([]);
        let subnet: Subnet = "10.9.0.0/28".parse().unwrap();

        let report = run_scan(&discovery, &prober, &subnet, &ScanOptions::default(), None)
            .await
            .unwrap();
        assert!(report.is_empty());
        assert_eq!(report.total_open_ports(), 0);
        assert!(prober.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ports_only_probed_on_live_hosts() {
        let live = [Ipv4Addr::new(10, 0, 1, 9), Ipv4Addr::new(10, 0, 1, 2)];
        let discovery = HostDiscovery::new(Arc::new(FixedProber::new(live)), 50);
        let prober = TablePorts::new([
            (live[0], vec![443]),
            (Ipv4Addr::new(10, 0, 1, 3), vec![22]),
        ]);
        let subnet: Subnet = "10.0.1.0/28".parse().unwrap();
        let options = ScanOptions {
            ports: ports(&[443, 22]),
            ..ScanOptions::default()
        };

        let done = AtomicUsize::new(0);
        let progress = |n: usize, total: usize, _ip: Ipv4Addr| {
            assert_eq!(total, 2);
            done.store(n, Ordering::SeqCst);
        };
        let report = run_scan(&discovery, &prober, &subnet, &options, Some(&progress))
            .await
            .unwrap();

        let mut called = prober.calls.lock().unwrap().clone();
        called.sort();
        assert_eq!(called, vec![live[1], live[0]]);
        assert_eq!(done.load(Ordering::SeqCst), 2);
        // Sorted by address for presentation.
        assert_eq!(report.results[0], HostResult::new(live[1], vec![]));
        assert_eq!(report.results[1], HostResult::new(live[0], ports(&[443])));
        assert_eq!(report.total_open_ports(), 1);
    }

    #[tokio::test]
    async fn test_oversized_subnet_is_refused() {
        let discovery = HostDiscovery::new(Arc::new(FixedProber::new([])), 50);
        let prober = TablePorts::new([]);
        let subnet: Subnet = "10.0.0.0/8".parse().unwrap();

        let err = run_scan(&discovery, &prober, &subnet, &ScanOptions::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::SubnetTooLarge { limit: 65_536, .. }));
    }

    #[tokio::test]
    async fn test_scan_ports_against_loopback() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let open = Port::new(listener.local_addr().unwrap().port()).unwrap();

        let found = scan_ports(Ipv4Addr::LOCALHOST, &[open], DEFAULT_CONNECT_TIMEOUT).await;
        assert_eq!(found, vec![open]);
    }

    #[test]
    fn test_host_result_port_count() {
        let result = HostResult::new(Ipv4Addr::new(10, 0, 0, 5), ports(&[22, 80]));
        assert_eq!(result.port_count(), 2);
    }
}
