//! Plain text terminal output.
//!
//! Produces human-readable output with colors and formatting.

use crate::scanner::{HostResult, ScanReport};
use crate::services::annotate_ports;
use console::style;
use std::io::{self, Write};

/// One result line: `10.0.0.5 -> Open ports: [22, 80]` or `... None`.
pub fn host_line(result: &HostResult, show_services: bool) -> String {
    let ports = if result.open_ports.is_empty() {
        "None".to_string()
    } else if show_services {
        format!("[{}]", annotate_ports(&result.open_ports))
    } else {
        let list: Vec<String> = result.open_ports.iter().map(|p| p.to_string()).collect();
        format!("[{}]", list.join(", "))
    };
    format!("{} -> Open ports: {}", result.ip, ports)
}

/// `2 of 6 hosts up, 3 open ports, started 2024-05-01 10:00:00 UTC, took 1.25s`
pub fn summary_line(report: &ScanReport) -> String {
    format!(
        "{} of {} hosts up, {} open ports, started {}, took {:.2}s",
        report.results.len(),
        report.hosts_probed,
        report.total_open_ports(),
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.duration_ms as f64 / 1000.0
    )
}

/// Print the full report in plain text.
pub fn print_report(report: &ScanReport, show_services: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    writeln!(out, "{}", style("Active hosts and open ports:").bold())?;
    for result in &report.results {
        let line = host_line(result, show_services);
        if result.open_ports.is_empty() {
            writeln!(out, "{}", style(line).dim())?;
        } else {
            writeln!(out, "{}", style(line).green())?;
        }
    }

    writeln!(out)?;
    writeln!(out, "  {} {}", style("Summary:").bold(), summary_line(report))?;
    writeln!(out)?;

    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(subnet: &str, probe: &str, hosts: u64, ports: usize) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("netsweep").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Subnet: {} ({} hosts)",
        style("•").dim(),
        style(subnet).white().bold(),
        hosts
    );
    println!("{} Liveness probe: {}", style("•").dim(), style(probe).yellow());
    println!(
        "{} Probing {} ports per live host...",
        style("•").dim(),
        style(ports).white().bold()
    );
    println!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}
