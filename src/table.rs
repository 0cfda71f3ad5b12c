use crate::calendar::{Language, date_from_i32, date_to_i32};
use crate::month::MonthKey;
use crate::row::ScheduleRow;
use chrono::{Datelike, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A displayable column of the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Date,
    Weekday,
    Day,
    Month,
    Parent,
    Holiday,
    Vacation,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 7] = [
        ColumnRole::Date,
        ColumnRole::Weekday,
        ColumnRole::Day,
        ColumnRole::Month,
        ColumnRole::Parent,
        ColumnRole::Holiday,
        ColumnRole::Vacation,
    ];

    /// Column name inside the table's DataFrame.
    pub fn column_name(&self) -> &'static str {
        match self {
            ColumnRole::Date => "date",
            ColumnRole::Weekday => "weekday",
            ColumnRole::Day => "day",
            ColumnRole::Month => "month",
            ColumnRole::Parent => "parent",
            ColumnRole::Holiday => "holiday",
            ColumnRole::Vacation => "vacation",
        }
    }

    pub fn header(&self, language: Language) -> &'static str {
        match (language, self) {
            (Language::French, ColumnRole::Date) => "Date",
            (Language::French, ColumnRole::Weekday) => "Jour",
            (Language::French, ColumnRole::Day) => "N°",
            (Language::French, ColumnRole::Month) => "Mois",
            (Language::French, ColumnRole::Parent) => "Parent",
            (Language::French, ColumnRole::Holiday) => "Férié",
            (Language::French, ColumnRole::Vacation) => "Vacances scolaires",
            (Language::English, ColumnRole::Date) => "Date",
            (Language::English, ColumnRole::Weekday) => "Weekday",
            (Language::English, ColumnRole::Day) => "Day",
            (Language::English, ColumnRole::Month) => "Month",
            (Language::English, ColumnRole::Parent) => "Parent",
            (Language::English, ColumnRole::Holiday) => "Holiday",
            (Language::English, ColumnRole::Vacation) => "School vacation",
        }
    }

    pub fn cell_text(&self, row: &ScheduleRow) -> String {
        match self {
            ColumnRole::Date => row.date.format("%Y-%m-%d").to_string(),
            ColumnRole::Weekday => row.weekday_name.clone(),
            ColumnRole::Day => row.date.day().to_string(),
            ColumnRole::Month => row.month_label.clone(),
            ColumnRole::Parent => row.assigned_parent.clone().unwrap_or_default(),
            ColumnRole::Holiday => row.holiday_name.clone().unwrap_or_default(),
            ColumnRole::Vacation => row.school_vacation_label.clone().unwrap_or_default(),
        }
    }
}

/// The normalized calendar: rows sorted by date, unique dates, labels
/// already canonicalized. Never mutated; filtering returns a new table.
#[derive(Debug, Clone)]
pub struct CustodyTable {
    df: DataFrame,
    columns: Vec<ColumnRole>,
}

impl CustodyTable {
    /// Callers must pass rows sorted by date with no duplicates; `normalize`
    /// guarantees this for loaded data.
    pub fn from_rows(rows: &[ScheduleRow], columns: Vec<ColumnRole>) -> PolarsResult<Self> {
        let dates: Vec<i32> = rows.iter().map(|r| date_to_i32(r.date)).collect();
        let days: Vec<i32> = rows.iter().map(|r| r.date.day() as i32).collect();
        let keys: Vec<i32> = rows.iter().map(|r| r.month_key.to_ordinal()).collect();

        let df = DataFrame::new(vec![
            Series::new(PlSmallStr::from_static("date"), dates)
                .cast(&DataType::Date)?
                .into_column(),
            Self::string_series("weekday", rows.iter().map(|r| Some(r.weekday_name.as_str())))
                .into_column(),
            Series::new(PlSmallStr::from_static("day"), days).into_column(),
            Self::string_series("month", rows.iter().map(|r| Some(r.month_label.as_str())))
                .into_column(),
            Self::string_series("parent", rows.iter().map(|r| r.assigned_parent.as_deref()))
                .into_column(),
            Self::string_series("holiday", rows.iter().map(|r| r.holiday_name.as_deref()))
                .into_column(),
            Self::string_series(
                "vacation",
                rows.iter().map(|r| r.school_vacation_label.as_deref()),
            )
            .into_column(),
            Series::new(PlSmallStr::from_static("month_key"), keys).into_column(),
        ])?;

        Ok(Self { df, columns })
    }

    fn string_series<'a>(name: &'static str, values: impl Iterator<Item = Option<&'a str>>) -> Series {
        let values: Vec<Option<&str>> = values.collect();
        Series::new(PlSmallStr::from_static(name), values)
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Display columns, in order.
    pub fn columns(&self) -> &[ColumnRole] {
        &self.columns
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn row(&self, row_idx: usize) -> PolarsResult<ScheduleRow> {
        ScheduleRow::from_dataframe_row(&self.df, row_idx)
    }

    pub fn rows(&self) -> PolarsResult<Vec<ScheduleRow>> {
        (0..self.df.height()).map(|idx| self.row(idx)).collect()
    }

    pub fn dates(&self) -> PolarsResult<Vec<NaiveDate>> {
        let dates = self.df.column("date")?.date()?;
        Ok((0..dates.len())
            .filter_map(|idx| dates.get(idx).and_then(date_from_i32))
            .collect())
    }

    /// Distinct month buckets in chronological order.
    pub fn months(&self) -> PolarsResult<Vec<MonthKey>> {
        let keys: BTreeSet<MonthKey> = self
            .df
            .column("month_key")?
            .i32()?
            .into_iter()
            .flatten()
            .filter_map(MonthKey::from_ordinal)
            .collect();
        Ok(keys.into_iter().collect())
    }

    /// Rows of one month bucket. No match yields an empty table, not an error.
    pub fn filter_month(&self, month: MonthKey) -> PolarsResult<Self> {
        let target = month.to_ordinal();
        let mask: Vec<bool> = self
            .df
            .column("month_key")?
            .i32()?
            .into_iter()
            .map(|key| key == Some(target))
            .collect();
        let mask = BooleanChunked::from_slice(PlSmallStr::from_static("mask"), &mask);
        Ok(Self {
            df: self.df.filter(&mask)?,
            columns: self.columns.clone(),
        })
    }

    /// Month selected when the page opens: the month of `today` when the
    /// table covers it, otherwise the latest month.
    pub fn default_month(&self, today: NaiveDate) -> PolarsResult<Option<MonthKey>> {
        let months = self.months()?;
        let current = MonthKey::from_date(today);
        if months.contains(&current) {
            return Ok(Some(current));
        }
        Ok(months.last().copied())
    }

    /// Index of the row dated `today`, or of the closest date when that day
    /// is missing. Ties go to the earlier row.
    pub fn nearest_row_index(&self, today: NaiveDate) -> PolarsResult<Option<usize>> {
        Ok(nearest_date_index(&self.dates()?, today))
    }

    /// Up to `before` rows before and `after` rows after the row nearest to
    /// `today`, clamped to the table bounds.
    pub fn window_around(&self, today: NaiveDate, before: usize, after: usize) -> PolarsResult<Self> {
        let Some(anchor) = self.nearest_row_index(today)? else {
            return Ok(self.clone());
        };
        let start = anchor.saturating_sub(before);
        let end = anchor.saturating_add(after).saturating_add(1).min(self.height());
        Ok(Self {
            df: self.df.slice(start as i64, end - start),
            columns: self.columns.clone(),
        })
    }
}

pub fn nearest_date_index(dates: &[NaiveDate], today: NaiveDate) -> Option<usize> {
    if let Some(exact) = dates.iter().position(|d| *d == today) {
        return Some(exact);
    }
    dates
        .iter()
        .enumerate()
        .min_by_key(|(idx, d)| ((**d - today).num_days().abs(), *idx))
        .map(|(idx, _)| idx)
}
