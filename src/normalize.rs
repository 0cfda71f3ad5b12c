use crate::calendar::{fold_text, parse_date_cell};
use crate::config::{CalendarConfig, ColumnAliases};
use crate::row::ScheduleRow;
use crate::source::{LoadError, LoadResult, RawTable};
use crate::table::{ColumnRole, CustodyTable};

/// Spellings of "no value" that spreadsheet exports leave in text cells.
const NULL_SENTINELS: [&str; 5] = ["", "none", "nan", "nat", "null"];

/// The one normalization pass for optional text cells: sentinels (any case,
/// any surrounding whitespace) become `None`, everything else is trimmed.
pub fn canonical_label(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if NULL_SENTINELS
        .iter()
        .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Leading "observations" column or an index column left behind by an export
/// (`Unnamed: 0`, empty header, `index`).
pub fn is_identifier_header(header: &str) -> bool {
    let folded = header_key(header);
    folded.is_empty()
        || folded == "observation"
        || folded == "observations"
        || folded == "index"
        || folded.starts_with("unnamed:")
        || folded.starts_with("unnamed_")
}

fn header_key(header: &str) -> String {
    fold_text(header)
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

#[derive(Debug, Default)]
struct ResolvedColumns {
    date: Option<usize>,
    weekday: Option<usize>,
    day: Option<usize>,
    month: Option<usize>,
    parent: Option<usize>,
    holiday: Option<usize>,
    vacation: Option<usize>,
}

impl ResolvedColumns {
    fn resolve(headers: &[String], aliases: &ColumnAliases) -> Self {
        Self {
            date: find_column(headers, &aliases.date),
            weekday: find_column(headers, &aliases.weekday),
            day: find_column(headers, &aliases.day),
            month: find_column(headers, &aliases.month),
            parent: find_column(headers, &aliases.parent),
            holiday: find_column(headers, &aliases.holiday),
            vacation: find_column(headers, &aliases.vacation),
        }
    }

    fn role_of(&self, column: usize) -> Option<ColumnRole> {
        let slots = [
            (self.date, ColumnRole::Date),
            (self.weekday, ColumnRole::Weekday),
            (self.day, ColumnRole::Day),
            (self.month, ColumnRole::Month),
            (self.parent, ColumnRole::Parent),
            (self.holiday, ColumnRole::Holiday),
            (self.vacation, ColumnRole::Vacation),
        ];
        slots
            .into_iter()
            .find(|(idx, _)| *idx == Some(column))
            .map(|(_, role)| role)
    }
}

fn find_column(headers: &[String], aliases: &[String]) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        let wanted = header_key(alias);
        headers.iter().position(|h| header_key(h) == wanted)
    })
}

/// Turn a raw table into the normalized calendar. Fails on the first date
/// that cannot be parsed; there is no partial result.
pub fn normalize(mut raw: RawTable, config: &CalendarConfig) -> LoadResult<CustodyTable> {
    let options = config.normalize;

    if options.drop_identifier_column
        && raw.headers.first().is_some_and(|h| is_identifier_header(h))
    {
        tracing::debug!(header = %raw.headers[0], "dropping leading identifier column");
        raw.remove_column(0);
    }

    if options.drop_year_column {
        if let Some(year) = find_column(&raw.headers, &config.columns.year) {
            tracing::debug!(header = %raw.headers[year], "dropping redundant year column");
            raw.remove_column(year);
        }
    }

    let resolved = ResolvedColumns::resolve(&raw.headers, &config.columns);
    let date_column = resolved.date.ok_or(LoadError::MissingColumn("date"))?;
    if raw.rows.is_empty() {
        return Err(LoadError::EmptyTable);
    }

    let mut rows = Vec::with_capacity(raw.rows.len());
    for row_idx in 0..raw.rows.len() {
        let value = raw.cell(row_idx, date_column);
        let date = parse_date_cell(value).ok_or_else(|| LoadError::InvalidDate {
            row: row_idx + 1,
            value: value.to_string(),
        })?;

        let mut row = ScheduleRow::new(date, config.language);
        if let Some(col) = resolved.weekday {
            row = row.with_weekday_name(raw.cell(row_idx, col));
        }
        if let Some(col) = resolved.month {
            row = row.with_month_label(raw.cell(row_idx, col));
        }
        if let Some(col) = resolved.parent {
            row = row.with_parent(raw.cell(row_idx, col));
        }
        if let Some(col) = resolved.holiday {
            row = row.with_holiday(raw.cell(row_idx, col));
        }
        if let Some(col) = resolved.vacation {
            row = row.with_vacation(raw.cell(row_idx, col));
        }
        rows.push(row);
    }

    rows.sort_by_key(|row| row.date);
    if let Some(pair) = rows.windows(2).find(|pair| pair[0].date == pair[1].date) {
        return Err(LoadError::DuplicateDate(pair[0].date));
    }

    let mut columns = display_columns(&raw.headers, &resolved);
    if options.reorder_columns {
        reorder_columns(&mut columns);
    }

    Ok(CustodyTable::from_rows(&rows, columns)?)
}

/// Source order of the recognised columns. A weekday column is derived and
/// shown after the date when the source has none.
fn display_columns(headers: &[String], resolved: &ResolvedColumns) -> Vec<ColumnRole> {
    let mut columns = Vec::with_capacity(ColumnRole::ALL.len());
    for (idx, header) in headers.iter().enumerate() {
        match resolved.role_of(idx) {
            Some(role) => columns.push(role),
            None => tracing::debug!(%header, "ignoring unrecognised column"),
        }
    }
    if resolved.weekday.is_none() {
        let after_date = columns
            .iter()
            .position(|c| *c == ColumnRole::Date)
            .map_or(0, |p| p + 1);
        columns.insert(after_date, ColumnRole::Weekday);
    }
    columns
}

/// Day-of-month goes right after the weekday (before the month), and the
/// parent right after the month.
pub fn reorder_columns(columns: &mut Vec<ColumnRole>) {
    fn position(columns: &[ColumnRole], role: ColumnRole) -> Option<usize> {
        columns.iter().position(|c| *c == role)
    }

    if let Some(original) = position(columns, ColumnRole::Day) {
        columns.remove(original);
        let target = match (
            position(columns, ColumnRole::Weekday),
            position(columns, ColumnRole::Month),
        ) {
            (Some(weekday), _) => weekday + 1,
            (None, Some(month)) => month,
            (None, None) => original,
        };
        columns.insert(target.min(columns.len()), ColumnRole::Day);
    }

    if let Some(original) = position(columns, ColumnRole::Parent) {
        columns.remove(original);
        let target = position(columns, ColumnRole::Month).map_or(original, |month| month + 1);
        columns.insert(target.min(columns.len()), ColumnRole::Parent);
    }
}
