//! CSV export.

use super::ExportRow;
use crate::error::ExportResult;

/// Encode rows as CSV with an `IP,Open Ports,Port Count` header.
pub fn encode(rows: &[ExportRow]) -> ExportResult<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Header comes from the serde renames on `ExportRow`, but an empty table
    // still needs one.
    if rows.is_empty() {
        wtr.write_record(["IP", "Open Ports", "Port Count"])?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.into_inner()
        .map_err(|e| crate::error::ExportError::Io(e.into_error()))
}
