pub mod cache;
pub mod calendar;
pub mod colorize;
pub mod config;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod month;
pub mod normalize;
pub mod render;
pub mod row;
pub mod source;
pub mod style;
pub mod table;

pub use cache::TableCache;
pub use calendar::Language;
pub use colorize::{CellOverride, LegendEntry, RowColorizer, StyledCell, StyledRow, StyledTable};
pub use config::{CalendarConfig, ConfigError, ParentIdentity};
pub use month::{MonthKey, MonthKeyError};
pub use normalize::{canonical_label, normalize};
pub use row::ScheduleRow;
pub use source::{LoadError, LoadResult, RawTable, TableSource, load_table, read_raw_table};
pub use style::{Color, Palette, Style, StyleCategory};
pub use table::{ColumnRole, CustodyTable};
