use super::{LoadResult, RawTable, SourceFormat, file};
use std::time::Duration;

/// Blocking fetch. Must not be called from inside an async task; the HTTP
/// server wraps loads in `spawn_blocking`.
pub fn read_url(url: &str, format: SourceFormat) -> LoadResult<RawTable> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()?;
    let response = client.get(url).send()?.error_for_status()?;
    let bytes = response.bytes()?.to_vec();
    tracing::debug!(url, bytes = bytes.len(), "fetched remote calendar");

    match format {
        SourceFormat::Csv => file::read_csv_bytes(&bytes),
        #[cfg(feature = "xlsx")]
        SourceFormat::Spreadsheet => super::xlsx::read_spreadsheet_bytes(bytes),
        #[cfg(not(feature = "xlsx"))]
        SourceFormat::Spreadsheet => Err(super::LoadError::UnsupportedSource(format!(
            "{url} (spreadsheet support not compiled in)"
        ))),
    }
}
