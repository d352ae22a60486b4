// Spreadsheet upload reading (xlsx, xls, xlsb, ods)

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use chrono::{Duration, NaiveDate};

use crate::error::UploadError;
use crate::upload::TabularInput;

/// Read the first sheet as header-keyed records.
///
/// The first row of the used range is the header. Rows with no values are
/// skipped. Cells under an empty header are dropped; on duplicate headers
/// the leftmost column wins.
pub fn read_first_sheet(bytes: &[u8]) -> Result<TabularInput, UploadError> {
    let mut workbook: Sheets<_> = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| UploadError::Spreadsheet(format!("failed to open spreadsheet: {e}")))?;

    let sheet_name = workbook.sheet_names().first().cloned();
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| UploadError::Spreadsheet("spreadsheet contains no sheets".into()))?
        .map_err(|e| UploadError::Spreadsheet(format!("failed to read first sheet: {e}")))?;
    log::debug!(
        "reading sheet {:?} ({} x {})",
        sheet_name.unwrap_or_default(),
        range.height(),
        range.width()
    );

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(|c| render_cell(c).trim().to_string()).collect(),
        None => return Err(UploadError::EmptyInput),
    };

    let mut records = Vec::new();
    for row in rows {
        let cells: Vec<String> = row.iter().map(render_cell).collect();
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let mut record = HashMap::new();
        for (header, cell) in headers.iter().zip(cells) {
            if header.is_empty() || record.contains_key(header) {
                continue;
            }
            record.insert(header.clone(), cell);
        }
        records.push(record);
    }

    Ok(TabularInput::Records { headers, records })
}

/// Render a cell the way it reads on screen.
fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => e.to_string(),
        Data::DateTime(dt) => serial_to_string(dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Excel serial (1900 date system) to `YYYY-MM-DD`, plus ` HH:MM:SS` when
/// the serial carries a time of day.
fn serial_to_string(serial: f64) -> String {
    let Some(epoch) = NaiveDate::from_ymd_opt(1899, 12, 30) else {
        return serial.to_string();
    };
    let days = serial.floor();
    let Some(date) = epoch.checked_add_signed(Duration::days(days as i64)) else {
        return serial.to_string();
    };

    let seconds = ((serial - days) * 86_400.0).round() as i64;
    if seconds == 0 {
        return date.format("%Y-%m-%d").to_string();
    }
    let datetime = date.and_hms_opt(0, 0, 0).map(|dt| dt + Duration::seconds(seconds));
    match datetime {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => date.format("%Y-%m-%d").to_string(),
    }
}
