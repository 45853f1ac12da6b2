//! Export subcommand implementation.
//!
//! Handles `netsweep export <FILE>`: re-encodes a JSON export produced by the
//! CLI or the dashboard.

use super::scan::write_output;
use crate::error::{CliResult, ExportError};
use crate::output::{self, ExportFormat, ExportOptions};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

/// Convert a JSON export to another format.
#[derive(Parser, Debug)]
pub struct ExportCommand {
    /// JSON export to read
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Target format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    /// Output file path (prints to stdout if not specified)
    #[arg(short = 'o', long = "output")]
    pub output_file: Option<PathBuf>,

    /// Annotate ports with well-known service names
    #[arg(long)]
    pub services: bool,
}

impl ExportCommand {
    /// Execute the export command.
    pub fn execute(&self, quiet: bool) -> CliResult<()> {
        let bytes = fs::read(&self.input).map_err(ExportError::from)?;
        let results = output::parse_json(&bytes)?;

        if results.is_empty() && !quiet {
            output::print_warning(&format!("{} contains no hosts.", self.input.display()));
        }

        let options = ExportOptions {
            show_services: self.services,
        };
        let encoded = output::export(&results, self.format, &options)?;
        write_output(self.output_file.as_deref(), self.format, &encoded, quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
    {
        "IP": "10.0.0.2",
        "Open Ports": "None",
        "Port Count": 0
    },
    {
        "IP": "10.0.0.5",
        "Open Ports": "22, 80",
        "Port Count": 2
    }
]"#;

    #[test]
    fn test_json_to_txt() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan_results.json");
        let output = dir.path().join("scan_results.txt");
        fs::write(&input, SAMPLE).unwrap();

        let cmd = ExportCommand {
            input,
            format: ExportFormat::Txt,
            output_file: Some(output.clone()),
            services: false,
        };
        cmd.execute(true).unwrap();

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("Network Scan Results\n"));
        assert!(text.contains("IP: 10.0.0.5\nOpen Ports: 22, 80\n"));
        assert!(text.contains("IP: 10.0.0.2\nOpen Ports: None\n"));
    }

    #[test]
    fn test_json_to_annotated_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.json");
        let output = dir.path().join("out.csv");
        fs::write(&input, SAMPLE).unwrap();

        ExportCommand {
            input,
            format: ExportFormat::Csv,
            output_file: Some(output.clone()),
            services: true,
        }
        .execute(true)
        .unwrap();

        let csv = fs::read_to_string(&output).unwrap();
        assert!(csv.contains("10.0.0.5,\"22 (SSH), 80 (HTTP)\",2"));
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_missing_input_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = ExportCommand {
            input: dir.path().join("absent.json"),
            format: ExportFormat::Csv,
            output_file: None,
            services: false,
        };
        assert!(cmd.execute(true).is_err());
    }
}
