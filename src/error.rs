//! Error types for netsweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Per-probe failures never
//! show up here: probers translate them into "not live" / "not open".

use crate::types::{PortError, SubnetError};
use std::path::PathBuf;
use thiserror::Error;

/// Scan-level faults. These are the only failures a scan reports to the user.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("subnet {subnet} has {hosts} hosts, more than the configured limit of {limit}")]
    SubnetTooLarge { subnet: String, hosts: u64, limit: u64 },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors raised while encoding scan results.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("spreadsheet encoding failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("malformed export row for {ip}: {reason}")]
    MalformedRow { ip: String, reason: String },

    #[error("{0} output is binary and needs an output file")]
    UnsupportedTarget(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Errors raised while loading or saving settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("invalid settings: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidFormat(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level error for CLI command handlers.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Subnet(#[from] SubnetError),

    #[error("invalid ports: {0}")]
    Port(#[from] PortError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Message shown to the user; scan faults carry a hint about what to check.
    pub fn user_message(&self) -> String {
        match self {
            Self::Scan(e) => format!("{}; {}", e, SCAN_FAULT_HINT),
            e => e.to_string(),
        }
    }
}

/// Appended to scan-level faults at every user-facing boundary.
pub const SCAN_FAULT_HINT: &str = "check network connectivity and the subnet";

pub type CliResult<T> = Result<T, CliError>;
