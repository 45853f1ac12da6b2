//! CLI subcommand definitions and handlers.
//!
//! - `netsweep scan [SUBNET]` - Discover live hosts and probe their ports
//! - `netsweep serve` - Run the HTTP API and dashboard
//! - `netsweep export <FILE>` - Re-encode a JSON export

mod export;
mod scan;
mod serve;

pub use export::ExportCommand;
pub use scan::ScanCommand;
pub use serve::ServeCommand;

use crate::output::ExportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// netsweep - subnet host discovery and TCP port probing.
///
/// Finds live hosts in an IPv4 CIDR block, then checks a short list of TCP
/// ports on each one. Results can be printed, exported or served through a
/// small web dashboard.
#[derive(Parser, Debug)]
#[command(name = "netsweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Subnet host discovery and TCP port prober", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a settings file
    #[arg(long, global = true, value_name = "PATH", env = "NETSWEEP_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a subnet for live hosts and open ports
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// Serve the HTTP API and dashboard
    Serve(ServeCommand),

    /// Convert a JSON export to another format
    #[command(alias = "e")]
    Export(ExportCommand),
}

/// How `scan` presents its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Plain,
    Csv,
    Json,
    Txt,
    /// Excel workbook (requires --output)
    Xlsx,
}

impl OutputFormat {
    /// The export encoding behind this format, `None` for terminal output.
    pub fn export_format(self) -> Option<ExportFormat> {
        match self {
            Self::Plain => None,
            Self::Csv => Some(ExportFormat::Csv),
            Self::Json => Some(ExportFormat::Json),
            Self::Txt => Some(ExportFormat::Txt),
            Self::Xlsx => Some(ExportFormat::Xlsx),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.export_format() {
            Some(format) => write!(f, "{}", format),
            None => write!(f, "plain"),
        }
    }
}
