use crate::calendar::Language;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Year + month grouping key. Field order makes the derived `Ord`
/// chronological, so a sorted list of keys is in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthKeyError {
    input: String,
}

impl fmt::Display for MonthKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid month '{}' (expected YYYY-MM)", self.input)
    }
}

impl std::error::Error for MonthKeyError {}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Stable identifier used in query strings and the month selector.
    pub fn code(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Display label, e.g. "septembre 2025".
    pub fn label(&self, language: Language) -> String {
        format!("{} {}", language.month_name(self.month), self.year)
    }

    pub(crate) fn to_ordinal(self) -> i32 {
        self.year * 100 + self.month as i32
    }

    pub(crate) fn from_ordinal(ordinal: i32) -> Option<Self> {
        Self::new(ordinal.div_euclid(100), ordinal.rem_euclid(100) as u32)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MonthKeyError {
            input: s.to_string(),
        };
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        let year = year.parse::<i32>().map_err(|_| err())?;
        let month = month.parse::<u32>().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}
