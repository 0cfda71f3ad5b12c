use crate::config::CalendarConfig;
use crate::normalize::normalize;
use crate::table::CustodyTable;
use chrono::NaiveDate;
use polars::prelude::PolarsError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

pub mod file;
#[cfg(feature = "remote")]
pub mod remote;
#[cfg(feature = "xlsx")]
pub mod xlsx;

#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Csv(csv::Error),
    DataFrame(PolarsError),
    #[cfg(feature = "xlsx")]
    Spreadsheet(calamine::Error),
    #[cfg(feature = "remote")]
    Remote(reqwest::Error),
    UnsupportedSource(String),
    MissingColumn(&'static str),
    InvalidDate { row: usize, value: String },
    DuplicateDate(NaiveDate),
    EmptyTable,
    InvalidData(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "io error: {err}"),
            LoadError::Csv(err) => write!(f, "csv error: {err}"),
            LoadError::DataFrame(err) => write!(f, "dataframe error: {err}"),
            #[cfg(feature = "xlsx")]
            LoadError::Spreadsheet(err) => write!(f, "spreadsheet error: {err}"),
            #[cfg(feature = "remote")]
            LoadError::Remote(err) => write!(f, "remote fetch error: {err}"),
            LoadError::UnsupportedSource(msg) => write!(f, "unsupported source: {msg}"),
            LoadError::MissingColumn(role) => write!(f, "missing required column '{role}'"),
            LoadError::InvalidDate { row, value } => {
                write!(f, "invalid date '{value}' on data row {row}")
            }
            LoadError::DuplicateDate(date) => write!(f, "duplicate date {date}"),
            LoadError::EmptyTable => write!(f, "source contains no rows"),
            LoadError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<io::Error> for LoadError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for LoadError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<PolarsError> for LoadError {
    fn from(value: PolarsError) -> Self {
        Self::DataFrame(value)
    }
}

#[cfg(feature = "xlsx")]
impl From<calamine::Error> for LoadError {
    fn from(value: calamine::Error) -> Self {
        Self::Spreadsheet(value)
    }
}

#[cfg(feature = "remote")]
impl From<reqwest::Error> for LoadError {
    fn from(value: reqwest::Error) -> Self {
        Self::Remote(value)
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Where a calendar table comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableSource {
    Path(PathBuf),
    Url(String),
}

impl TableSource {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            TableSource::Url(trimmed.to_string())
        } else {
            TableSource::Path(PathBuf::from(trimmed))
        }
    }

    pub fn format(&self) -> SourceFormat {
        let name = match self {
            TableSource::Path(path) => path.to_string_lossy().into_owned(),
            TableSource::Url(url) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
        };
        SourceFormat::from_name(&name)
    }
}

impl fmt::Display for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableSource::Path(path) => write!(f, "{}", path.display()),
            TableSource::Url(url) => f.write_str(url),
        }
    }
}

impl From<&Path> for TableSource {
    fn from(value: &Path) -> Self {
        TableSource::Path(value.to_path_buf())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Spreadsheet,
}

impl SourceFormat {
    /// Chosen from the file extension; anything unrecognised is read as CSV.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        let spreadsheet = [".xlsx", ".xlsm", ".xlsb", ".xls", ".ods"]
            .iter()
            .any(|ext| lower.ends_with(ext));
        if spreadsheet {
            SourceFormat::Spreadsheet
        } else {
            SourceFormat::Csv
        }
    }
}

/// Header row plus string cells, before any normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn remove_column(&mut self, column: usize) {
        if column >= self.headers.len() {
            return;
        }
        self.headers.remove(column);
        for row in &mut self.rows {
            if column < row.len() {
                row.remove(column);
            }
        }
    }
}

pub fn read_raw_table(source: &TableSource) -> LoadResult<RawTable> {
    match (source, source.format()) {
        (TableSource::Path(path), SourceFormat::Csv) => file::read_csv_path(path),
        #[cfg(feature = "xlsx")]
        (TableSource::Path(path), SourceFormat::Spreadsheet) => xlsx::read_spreadsheet_path(path),
        #[cfg(feature = "remote")]
        (TableSource::Url(url), format) => remote::read_url(url, format),
        #[allow(unreachable_patterns)]
        (other, format) => Err(LoadError::UnsupportedSource(format!(
            "{other} ({format:?} support not compiled in)"
        ))),
    }
}

/// Read and normalize a source in one step. Any failure aborts the whole load.
pub fn load_table(source: &TableSource, config: &CalendarConfig) -> LoadResult<CustodyTable> {
    let raw = read_raw_table(source)?;
    let table = normalize(raw, config)?;
    tracing::info!(%source, rows = table.height(), "calendar table loaded");
    Ok(table)
}
