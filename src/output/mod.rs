//! Output formatting module.
//!
//! Terminal rendering lives in [`plain`]. The other submodules encode scan
//! results into downloadable files (CSV, JSON, TXT and XLSX). Every encoder
//! works from the same tabular [`ExportRow`] view.

mod csv_format;
mod json_format;
pub mod plain;
mod txt_format;
mod xlsx_format;

pub use json_format::parse_json;
pub use plain::{
    print_error, print_info, print_report, print_scan_header, print_success,
    print_warning,
};

use crate::error::ExportResult;
use crate::scanner::HostResult;
use crate::services::annotate_ports;
use serde::{Deserialize, Serialize};
use std::fmt;

/// File encodings offered for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Txt,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Txt => "txt",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
            Self::Txt => "text/plain",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    /// Suggested download name, e.g. `scan_results.csv`.
    pub fn file_name(self) -> String {
        format!("scan_results.{}", self.extension())
    }

    /// Whether the encoding is safe to print to a terminal.
    pub fn is_text(self) -> bool {
        !matches!(self, Self::Xlsx)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "txt" | "text" => Ok(Self::Txt),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            _ => Err(format!("unknown export format: {}", s)),
        }
    }
}

/// Encoder options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Render ports as `22 (SSH)` in tabular encodings (CSV, XLSX).
    ///
    /// JSON and TXT always carry bare port numbers.
    pub show_services: bool,
}

/// One table row as shown on the dashboard and in every export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "IP")]
    pub ip: String,
    /// Comma-joined ports, or `None` when no port is open.
    #[serde(rename = "Open Ports")]
    pub open_ports: String,
    #[serde(rename = "Port Count")]
    pub port_count: usize,
}

impl ExportRow {
    pub fn from_result(result: &HostResult, show_services: bool) -> Self {
        Self {
            ip: result.ip.to_string(),
            open_ports: format_open_ports(result, show_services),
            port_count: result.port_count(),
        }
    }
}

/// `22, 80`, `22 (SSH), 80 (HTTP)` or `None`.
pub fn format_open_ports(result: &HostResult, show_services: bool) -> String {
    if result.open_ports.is_empty() {
        "None".to_string()
    } else if show_services {
        annotate_ports(&result.open_ports)
    } else {
        result
            .open_ports
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub(crate) fn rows(results: &[HostResult], show_services: bool) -> Vec<ExportRow> {
    results
        .iter()
        .map(|r| ExportRow::from_result(r, show_services))
        .collect()
}

/// Encode `results` in the requested format.
pub fn export(
    results: &[HostResult],
    format: ExportFormat,
    options: &ExportOptions,
) -> ExportResult<Vec<u8>> {
    match format {
        ExportFormat::Csv => csv_format::encode(&rows(results, options.show_services)),
        ExportFormat::Json => json_format::encode(&rows(results, false)),
        ExportFormat::Txt => Ok(txt_format::encode(&rows(results, false)).into_bytes()),
        ExportFormat::Xlsx => xlsx_format::encode(&rows(results, options.show_services)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;
    use std::net::Ipv4Addr;

    fn result(ip: [u8; 4], ports: &[u16]) -> HostResult {
        HostResult::new(
            Ipv4Addr::from(ip),
            ports.iter().map(|&p| Port::new(p).unwrap()).collect(),
        )
    }

    #[test]
    fn test_format_open_ports() {
        assert_eq!(format_open_ports(&result([10, 0, 0, 5], &[22, 80]), false), "22, 80");
        assert_eq!(
            format_open_ports(&result([10, 0, 0, 5], &[22, 80]), true),
            "22 (SSH), 80 (HTTP)"
        );
        assert_eq!(format_open_ports(&result([10, 0, 0, 5], &[]), true), "None");
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Csv.file_name(), "scan_results.csv");
        assert_eq!(ExportFormat::Json.mime_type(), "application/json");
        assert!(!ExportFormat::Xlsx.is_text());
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_csv_annotation_applies_only_to_tables() {
        let results = vec![result([10, 0, 0, 5], &[22])];
        let options = ExportOptions { show_services: true };

        let csv = String::from_utf8(export(&results, ExportFormat::Csv, &options).unwrap()).unwrap();
        assert!(csv.contains("22 (SSH)"));

        let json = String::from_utf8(export(&results, ExportFormat::Json, &options).unwrap()).unwrap();
        assert!(!json.contains("SSH"));
    }

    #[test]
    fn test_json_round_trip_preserves_mapping() {
        let results = vec![
            result([192, 168, 0, 10], &[22, 443]),
            result([192, 168, 0, 2], &[]),
            result([192, 168, 0, 7], &[502]),
        ];

        let bytes = export(&results, ExportFormat::Json, &ExportOptions::default()).unwrap();
        let parsed = parse_json(&bytes).unwrap();

        let mut expected = results.clone();
        let mut parsed = parsed;
        expected.sort_by_key(|r| r.ip);
        parsed.sort_by_key(|r| r.ip);
        assert_eq!(parsed, expected);
    }
}
