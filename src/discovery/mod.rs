//! Host discovery - find which addresses in a subnet are alive.
//!
//! Every host address is probed independently through a [`LivenessProber`].
//! Concurrency is bounded by a semaphore owned by [`HostDiscovery`], so the
//! bound holds across repeated calls and across clones sharing one instance
//! (the HTTP server keeps a single discovery engine for all requests).

pub mod icmp;
pub mod ping;
pub mod tcp;
pub mod traits;

use crate::types::{validate_cidr, Port, Subnet, SubnetError};
use futures::stream::{self, StreamExt};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info, trace};

pub use icmp::IcmpProber;
pub use ping::PingProber;
pub use tcp::{TcpProber, DEFAULT_TCP_PROBE_PORTS};
pub use traits::{LivenessProber, ProbeKind, SharedProber};

/// Default number of probes in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Default timeout for a single liveness probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(200);

/// Build the prober for a probe kind.
///
/// `tcp_ports` is only used by [`ProbeKind::Tcp`].
pub fn create_prober(kind: ProbeKind, timeout: Duration, tcp_ports: Vec<Port>) -> SharedProber {
    match kind {
        ProbeKind::Ping => Arc::new(PingProber::new(timeout)),
        ProbeKind::Icmp => Arc::new(IcmpProber::new(timeout)),
        ProbeKind::Tcp => Arc::new(TcpProber::new(tcp_ports, timeout)),
    }
}

/// Reusable discovery engine with a bounded worker pool.
#[derive(Clone)]
pub struct HostDiscovery {
    prober: SharedProber,
    permits: Arc<Semaphore>,
    concurrency: usize,
}

impl HostDiscovery {
    /// Create a discovery engine allowing `concurrency` probes at once.
    ///
    /// A concurrency of zero is raised to one.
    pub fn new(prober: SharedProber, concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        Self {
            prober,
            permits: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Parse `subnet` and return its live hosts.
    ///
    /// Malformed input is reported as an error, never a panic.
    pub async fn scan_network(&self, subnet: &str) -> Result<Vec<Ipv4Addr>, SubnetError> {
        let subnet = validate_cidr(subnet)?;
        Ok(self.discover(&subnet).await)
    }

    /// Probe every host of `subnet` and collect those that answered.
    ///
    /// Results arrive in completion order, not address order.
    pub async fn discover(&self, subnet: &Subnet) -> Vec<Ipv4Addr> {
        let start = Instant::now();
        info!(
            %subnet,
            hosts = subnet.host_count(),
            probe = %self.prober.kind(),
            concurrency = self.concurrency,
            "starting host discovery"
        );

        let live: Vec<Ipv4Addr> = stream::iter(subnet.hosts())
            .map(|addr| {
                let permits = Arc::clone(&self.permits);
                let prober = Arc::clone(&self.prober);
                async move {
                    // The semaphore is never closed, so acquire only fails if
                    // that invariant breaks; treat it as "not live".
                    let _permit = permits.acquire_owned().await.ok()?;
                    let alive = prober.is_alive(addr).await;
                    trace!(%addr, alive, "liveness probe finished");
                    alive.then_some(addr)
                }
            })
            .buffer_unordered(self.concurrency)
            .filter_map(|found| async move { found })
            .collect()
            .await;

        debug!(
            %subnet,
            live = live.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "host discovery complete"
        );
        live
    }
}

impl std::fmt::Debug for HostDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostDiscovery")
            .field("probe", &self.prober.kind())
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl Default for HostDiscovery {
    fn default() -> Self {
        Self::new(
            Arc::new(PingProber::new(DEFAULT_PROBE_TIMEOUT)),
            DEFAULT_CONCURRENCY,
        )
    }
}

/// Discover live hosts with the default ping prober, 50 probes at a time.
pub async fn scan_network(subnet: &str) -> Result<Vec<Ipv4Addr>, SubnetError> {
    HostDiscovery::default().scan_network(subnet).await
}
