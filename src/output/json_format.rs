//! JSON export and import.

use super::ExportRow;
use crate::error::{ExportError, ExportResult};
use crate::scanner::HostResult;
use crate::types::Port;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::net::Ipv4Addr;

/// Encode rows as a pretty-printed JSON array with 4-space indentation.
pub fn encode(rows: &[ExportRow]) -> ExportResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    rows.serialize(&mut ser)?;
    Ok(buf)
}

/// Read a JSON export back into host results.
///
/// Expects bare port numbers; service-annotated tables are not accepted.
pub fn parse_json(bytes: &[u8]) -> ExportResult<Vec<HostResult>> {
    let rows: Vec<ExportRow> = serde_json::from_slice(bytes)?;
    rows.iter().map(row_to_result).collect()
}

fn row_to_result(row: &ExportRow) -> ExportResult<HostResult> {
    let malformed = |reason: String| ExportError::MalformedRow {
        ip: row.ip.clone(),
        reason,
    };

    let ip: Ipv4Addr = row
        .ip
        .parse()
        .map_err(|_| malformed("not an IPv4 address".to_string()))?;

    let open_ports = if row.open_ports.trim() == "None" {
        Vec::new()
    } else {
        row.open_ports
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<u16>()
                    .ok()
                    .and_then(Port::new)
                    .ok_or_else(|| malformed(format!("invalid port '{}'", part.trim())))
            })
            .collect::<ExportResult<Vec<Port>>>()?
    };

    if open_ports.len() != row.port_count {
        return Err(malformed(format!(
            "port count {} does not match {} listed ports",
            row.port_count,
            open_ports.len()
        )));
    }

    Ok(HostResult::new(ip, open_ports))
}
