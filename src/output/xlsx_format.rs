//! Spreadsheet export.

use super::ExportRow;
use crate::error::ExportResult;
use rust_xlsxwriter::{Format, Workbook};

/// Worksheet holding the result table.
pub const SHEET_NAME: &str = "Results";

const HEADERS: [&str; 3] = ["IP", "Open Ports", "Port Count"];

/// Encode rows as an `.xlsx` workbook with a single `Results` sheet.
pub fn encode(rows: &[ExportRow]) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let line = idx as u32 + 1;
        sheet.write_string(line, 0, &row.ip)?;
        sheet.write_string(line, 1, &row.open_ports)?;
        sheet.write_number(line, 2, row.port_count as f64)?;
    }

    sheet.set_column_width(0, 16)?;
    sheet.set_column_width(1, 32)?;
    sheet.set_column_width(2, 12)?;

    Ok(workbook.save_to_buffer()?)
}
