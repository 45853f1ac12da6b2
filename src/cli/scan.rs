//! Scan subcommand implementation.
//!
//! Handles `netsweep scan [SUBNET]`: discovery, port probing, then output.

use crate::cli::OutputFormat;
use crate::config::AppSettings;
use crate::discovery::{create_prober, HostDiscovery, ProbeKind};
use crate::error::{CliResult, ExportError};
use crate::output::{self, ExportFormat, ExportOptions};
use crate::scanner::{run_scan, ScanOptions, ScanReport, TcpConnectScanner};
use crate::types::{validate_cidr, PortSpec};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Scan a subnet for live hosts and open ports.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Subnet in CIDR notation (defaults to the configured subnet)
    ///
    /// Examples:
    ///   192.168.0.0/24     Home network
    ///   10.0.0.0/29        Six hosts
    #[arg(value_name = "SUBNET")]
    pub subnet: Option<String>,

    /// Ports to probe on live hosts (e.g., "22,80", "8000-8010")
    #[arg(short, long)]
    pub ports: Option<String>,

    /// Liveness probe used during discovery
    #[arg(long, value_enum)]
    pub probe: Option<ProbeKind>,

    /// Maximum liveness probes in flight
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Liveness probe timeout in milliseconds
    #[arg(long = "ping-timeout", value_name = "MS")]
    pub ping_timeout: Option<u64>,

    /// Port connect timeout in milliseconds
    #[arg(short = 't', long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,

    /// Write results to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Annotate ports with well-known service names
    #[arg(long)]
    pub services: bool,
}

impl ScanCommand {
    /// Fold the command-line flags into `settings`.
    pub fn apply(&self, settings: &mut AppSettings) {
        if let Some(ports) = &self.ports {
            settings.default_ports = ports.clone();
        }
        if let Some(probe) = self.probe {
            settings.probe = probe;
        }
        if let Some(concurrency) = self.concurrency {
            settings.discovery_concurrency = concurrency;
        }
        if let Some(ms) = self.ping_timeout {
            settings.ping_timeout_ms = ms;
        }
        if let Some(ms) = self.timeout {
            settings.connect_timeout_ms = ms;
        }
    }

    /// Execute the scan command.
    pub async fn execute(&self, settings: AppSettings, quiet: bool) -> CliResult<()> {
        let mut settings = settings;
        self.apply(&mut settings);

        let raw = self.subnet.as_deref().unwrap_or(&settings.default_subnet);
        let subnet = validate_cidr(raw)?;
        let ports = settings.default_ports.parse::<PortSpec>()?.into_ports();

        // A timeout of 0 would make every probe fail silently.
        let ping_timeout = settings.ping_timeout().max(Duration::from_millis(1));
        let connect_timeout = settings.connect_timeout().max(Duration::from_millis(1));

        let liveness = create_prober(settings.probe, ping_timeout, settings.tcp_ports()?);
        if liveness.requires_privileges() && !quiet {
            output::print_warning(&format!(
                "{} probing needs root privileges; without them no host will answer.",
                settings.probe
            ));
        }
        let discovery = HostDiscovery::new(liveness, settings.discovery_concurrency);
        let prober = TcpConnectScanner::new(connect_timeout, settings.port_concurrency);
        let options = ScanOptions {
            ports,
            max_hosts: settings.max_hosts,
        };

        let interactive = !quiet && self.format == OutputFormat::Plain;
        if interactive {
            output::print_scan_header(
                &subnet.to_string(),
                &settings.probe.to_string(),
                subnet.host_count(),
                options.ports.len(),
            );
        }

        let progress = interactive.then(discovery_spinner);
        let on_progress = |done: usize, total: usize, ip: Ipv4Addr| {
            if let Some(pb) = &progress {
                if done == 1 {
                    pb.set_style(bar_style());
                    pb.set_length(total as u64);
                }
                pb.set_position(done as u64);
                pb.set_message(ip.to_string());
            }
        };

        let report = run_scan(&discovery, &prober, &subnet, &options, Some(&on_progress)).await;
        if let Some(pb) = &progress {
            pb.finish_and_clear();
        }
        let report = report?;

        self.render(&report, quiet)
    }

    fn render(&self, report: &ScanReport, quiet: bool) -> CliResult<()> {
        if report.is_empty() && !quiet {
            output::print_warning("No active hosts found in this subnet.");
        }

        let Some(format) = self.format.export_format() else {
            if !report.is_empty() {
                output::print_report(report, self.services)?;
            }
            return Ok(());
        };

        let options = ExportOptions {
            show_services: self.services,
        };
        let bytes = output::export(&report.results, format, &options)?;
        write_output(self.output_file.as_deref(), format, &bytes, quiet)
    }
}

/// Write encoded results to `path`, or to stdout for text formats.
pub(crate) fn write_output(
    path: Option<&Path>,
    format: ExportFormat,
    bytes: &[u8],
    quiet: bool,
) -> CliResult<()> {
    match path {
        Some(path) => {
            std::fs::write(path, bytes).map_err(ExportError::from)?;
            if !quiet {
                output::print_success(&format!("Saved {} results to {}", format, path.display()));
            }
        }
        None if format.is_text() => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            out.write_all(bytes)?;
            if !bytes.ends_with(b"\n") {
                writeln!(out)?;
            }
        }
        None => return Err(ExportError::UnsupportedTarget(format.to_string()).into()),
    }
    Ok(())
}

fn discovery_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message("discovering live hosts");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} hosts {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-")
}
