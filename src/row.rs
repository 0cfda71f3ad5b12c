use crate::calendar::{Language, date_from_i32, parse_weekday_label};
use crate::month::MonthKey;
use crate::normalize::canonical_label;
use chrono::{Datelike, NaiveDate, Weekday};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One calendar day of the custody schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub date: NaiveDate,
    pub weekday_name: String,
    pub month_label: String,
    pub assigned_parent: Option<String>,
    pub holiday_name: Option<String>,
    pub school_vacation_label: Option<String>,
    pub month_key: MonthKey,
}

impl ScheduleRow {
    /// A row with weekday and month labels derived from `date` and every
    /// optional field absent.
    pub fn new(date: NaiveDate, language: Language) -> Self {
        Self {
            date,
            weekday_name: language.weekday_name(date.weekday()).to_string(),
            month_label: language.month_name(date.month()).to_string(),
            assigned_parent: None,
            holiday_name: None,
            school_vacation_label: None,
            month_key: MonthKey::from_date(date),
        }
    }

    pub fn with_weekday_name(mut self, name: &str) -> Self {
        if let Some(name) = canonical_label(name) {
            self.weekday_name = name;
        }
        self
    }

    pub fn with_month_label(mut self, label: &str) -> Self {
        if let Some(label) = canonical_label(label) {
            self.month_label = label;
        }
        self
    }

    pub fn with_parent(mut self, parent: &str) -> Self {
        self.assigned_parent = canonical_label(parent);
        self
    }

    pub fn with_holiday(mut self, holiday: &str) -> Self {
        self.holiday_name = canonical_label(holiday);
        self
    }

    pub fn with_vacation(mut self, vacation: &str) -> Self {
        self.school_vacation_label = canonical_label(vacation);
        self
    }

    pub fn is_holiday(&self) -> bool {
        self.holiday_name.is_some()
    }

    pub fn is_vacation(&self) -> bool {
        self.school_vacation_label.is_some()
    }

    /// Weekday read from the label when it names one, otherwise from the date.
    pub fn weekday(&self) -> Weekday {
        parse_weekday_label(&self.weekday_name).unwrap_or_else(|| self.date.weekday())
    }

    pub fn from_dataframe_row(df: &DataFrame, row_idx: usize) -> PolarsResult<Self> {
        let date = df
            .column("date")?
            .date()?
            .get(row_idx)
            .and_then(date_from_i32)
            .ok_or_else(|| PolarsError::ComputeError("calendar row missing date".into()))?;

        let month_key = df
            .column("month_key")?
            .i32()?
            .get(row_idx)
            .and_then(MonthKey::from_ordinal)
            .unwrap_or_else(|| MonthKey::from_date(date));

        Ok(Self {
            date,
            weekday_name: Self::string_at(df, "weekday", row_idx)?.unwrap_or_default(),
            month_label: Self::string_at(df, "month", row_idx)?.unwrap_or_default(),
            assigned_parent: Self::string_at(df, "parent", row_idx)?,
            holiday_name: Self::string_at(df, "holiday", row_idx)?,
            school_vacation_label: Self::string_at(df, "vacation", row_idx)?,
            month_key,
        })
    }

    fn string_at(df: &DataFrame, column: &str, row_idx: usize) -> PolarsResult<Option<String>> {
        Ok(df
            .column(column)?
            .str()?
            .get(row_idx)
            .map(ToOwned::to_owned))
    }
}
