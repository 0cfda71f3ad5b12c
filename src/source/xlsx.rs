use super::{LoadError, LoadResult, RawTable};
use crate::calendar::date_from_excel_serial;
use calamine::{Data, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

pub fn read_spreadsheet_path<P: AsRef<Path>>(path: P) -> LoadResult<RawTable> {
    let mut workbook = open_workbook_auto(path)?;
    read_first_sheet(&mut workbook)
}

pub fn read_spreadsheet_bytes(bytes: Vec<u8>) -> LoadResult<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    read_first_sheet(&mut workbook)
}

/// First worksheet only; its first row is the header.
fn read_first_sheet<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> LoadResult<RawTable> {
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::InvalidData("workbook contains no sheets".into()))?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header.iter().map(|cell| cell_text(cell).trim().to_string()).collect(),
        None => return Err(LoadError::EmptyTable),
    };

    let mut body = Vec::new();
    for row in rows {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        body.push(cells);
    }
    tracing::debug!(sheet = %sheet_name, rows = body.len(), "read worksheet");
    Ok(RawTable::new(headers, body))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Data::Float(n) => n.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => date_from_excel_serial(dt.as_f64())
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{e:?}"),
    }
}
