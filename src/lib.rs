//! # netsweep - Subnet Host Discovery and TCP Port Prober
//!
//! netsweep finds live hosts in an IPv4 subnet and checks which of a short
//! list of TCP ports accept connections on each of them.
//!
//! ## Features
//!
//! - **Bounded Discovery**: liveness probes run concurrently behind a shared semaphore
//! - **Pluggable Liveness Probes**: system `ping`, raw ICMP echo, or TCP connect
//! - **Order-Preserving Port Probing**: open ports come back in the order requested
//! - **Exports**: CSV, JSON, plain text and Excel
//! - **Web Dashboard**: a small axum server with `/scan` and `/export` endpoints
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use netsweep::discovery::HostDiscovery;
//! use netsweep::scanner::scan_default_ports;
//!
//! #[tokio::main]
//! async fn main() {
//!     let discovery = HostDiscovery::default();
//!     let live = discovery.scan_network("192.168.0.0/24").await.unwrap();
//!
//!     for ip in live {
//!         let open = scan_default_ports(ip).await;
//!         println!("{} -> {:?}", ip, open);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Ports, port lists and validated subnets
//! - [`discovery`] - Liveness probers and concurrent host discovery
//! - [`scanner`] - TCP port probing and scan orchestration
//! - [`output`] - Terminal rendering and file exporters
//! - [`api`] - HTTP API and dashboard
//! - [`config`] - Settings file handling
//! - [`error`] - Error types

pub mod api;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use discovery::{scan_network, HostDiscovery, LivenessProber, ProbeKind};
pub use error::{CliError, ExportError, ScanError};
pub use scanner::{run_scan, scan_default_ports, scan_ports, HostResult, PortProber, ScanReport};
pub use types::{Port, PortSpec, Subnet, SubnetError};
