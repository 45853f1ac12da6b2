//! Plain text report export.

use super::ExportRow;

/// Render rows as a titled text report.
pub fn encode(rows: &[ExportRow]) -> String {
    let mut output = String::new();

    output.push_str("Network Scan Results\n");
    output.push_str(&format!("{}\n\n", "=".repeat(50)));

    for row in rows {
        output.push_str(&format!("IP: {}\n", row.ip));
        output.push_str(&format!("Open Ports: {}\n", row.open_ports));
        output.push_str(&format!("{}\n", "-".repeat(30)));
    }

    output
}
