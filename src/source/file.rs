use super::{LoadResult, RawTable};
use std::fs;
use std::path::Path;

pub fn read_csv_path<P: AsRef<Path>>(path: P) -> LoadResult<RawTable> {
    let bytes = fs::read(path)?;
    read_csv_bytes(&bytes)
}

/// Parse CSV text. Semicolon-separated exports (common from French
/// spreadsheets) are detected from the header line.
pub fn read_csv_bytes(bytes: &[u8]) -> LoadResult<RawTable> {
    let delimiter = sniff_delimiter(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(ToOwned::to_owned).collect());
    }
    Ok(RawTable::new(headers, rows))
}

fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let header = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    let count = |needle: u8| header.iter().filter(|b| **b == needle).count();
    if count(b';') > count(b',') { b';' } else { b',' }
}
