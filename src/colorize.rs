use crate::calendar::Language;
use crate::config::{CalendarConfig, ParentIdentity};
use crate::row::ScheduleRow;
use crate::style::{Palette, Style, StyleCategory};
use crate::table::{ColumnRole, CustodyTable};
use chrono::{NaiveDate, Weekday};
use polars::prelude::PolarsResult;
use serde::Serialize;

/// Picks one category per row. Rules are checked in this order and the first
/// match wins:
///
/// 1. today (when an anchor date is set)
/// 2. holiday
/// 3. school vacation (unless the rule is disabled)
/// 4. transition day
/// 5. parent A / parent B
/// 6. neutral
#[derive(Debug, Clone)]
pub struct RowColorizer {
    transition_day: Weekday,
    vacation_rule: bool,
    today: Option<NaiveDate>,
    parent_a: ParentIdentity,
    parent_b: ParentIdentity,
}

impl RowColorizer {
    pub fn new(transition_day: Weekday, parent_a: ParentIdentity, parent_b: ParentIdentity) -> Self {
        Self {
            transition_day,
            vacation_rule: true,
            today: None,
            parent_a,
            parent_b,
        }
    }

    pub fn from_config(config: &CalendarConfig) -> Self {
        Self {
            transition_day: config.rules.transition_day,
            vacation_rule: config.rules.vacation_rule,
            today: None,
            parent_a: config.parent_a.clone(),
            parent_b: config.parent_b.clone(),
        }
    }

    /// Colorizer anchored on `today`, honouring `rules.highlight_today`.
    pub fn anchored(config: &CalendarConfig, today: NaiveDate) -> Self {
        Self::from_config(config).with_today(config.rules.highlight_today.then_some(today))
    }

    /// Highlight the row dated `today`. Has no effect when `today` is `None`.
    pub fn with_today(mut self, today: Option<NaiveDate>) -> Self {
        self.today = today;
        self
    }

    pub fn with_vacation_rule(mut self, enabled: bool) -> Self {
        self.vacation_rule = enabled;
        self
    }

    pub fn categorize(&self, row: &ScheduleRow) -> StyleCategory {
        if self.today == Some(row.date) {
            return StyleCategory::Today;
        }
        if row.is_holiday() {
            return StyleCategory::Holiday;
        }
        if self.vacation_rule && row.is_vacation() {
            return StyleCategory::Vacation;
        }
        if row.weekday() == self.transition_day {
            return StyleCategory::TransitionDay;
        }
        match row.assigned_parent.as_deref() {
            Some(parent) if self.parent_a.matches(parent) => StyleCategory::ParentA,
            Some(parent) if self.parent_b.matches(parent) => StyleCategory::ParentB,
            Some(parent) => {
                tracing::warn!(%parent, date = %row.date, "assigned parent matches no known identity");
                StyleCategory::Neutral
            }
            None => StyleCategory::Neutral,
        }
    }
}

/// Fixed style for the vacation-label cell, independent of the row category.
pub struct CellOverride;

impl CellOverride {
    pub const COLUMN: ColumnRole = ColumnRole::Vacation;

    pub fn for_row(row: &ScheduleRow) -> Option<StyleCategory> {
        row.is_vacation().then_some(StyleCategory::VacationCell)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledCell {
    pub text: String,
    pub category: StyleCategory,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledRow {
    pub date: NaiveDate,
    pub category: StyleCategory,
    pub cells: Vec<StyledCell>,
}

/// What a renderer needs: headers, and per row the cell text with the row
/// style applied and the vacation override layered on its cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledTable {
    pub columns: Vec<ColumnRole>,
    pub headers: Vec<String>,
    pub rows: Vec<StyledRow>,
}

impl StyledTable {
    pub fn build(
        table: &CustodyTable,
        colorizer: &RowColorizer,
        palette: &Palette,
        language: Language,
    ) -> PolarsResult<Self> {
        let columns = table.columns().to_vec();
        let headers = columns.iter().map(|c| c.header(language).to_string()).collect();
        let rows = table
            .rows()?
            .iter()
            .map(|row| Self::style_row(row, &columns, colorizer, palette))
            .collect();
        Ok(Self {
            columns,
            headers,
            rows,
        })
    }

    fn style_row(
        row: &ScheduleRow,
        columns: &[ColumnRole],
        colorizer: &RowColorizer,
        palette: &Palette,
    ) -> StyledRow {
        let category = colorizer.categorize(row);
        let cell_override = CellOverride::for_row(row);
        let cells = columns
            .iter()
            .map(|column| {
                let cell_category = match cell_override {
                    Some(over) if *column == CellOverride::COLUMN => over,
                    _ => category,
                };
                StyledCell {
                    text: column.cell_text(row),
                    category: cell_category,
                    style: palette.style(cell_category),
                }
            })
            .collect();
        StyledRow {
            date: row.date,
            category,
            cells,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub category: StyleCategory,
    pub label: String,
    pub style: Style,
}

/// Caption entries, e.g. "Jerome", "Sanou", "Vacances scolaires", "Férié".
pub fn legend(config: &CalendarConfig) -> Vec<LegendEntry> {
    let labels: [(StyleCategory, String); 6] = match config.language {
        Language::French => [
            (StyleCategory::ParentA, config.parent_a.name.clone()),
            (StyleCategory::ParentB, config.parent_b.name.clone()),
            (StyleCategory::Vacation, "Vacances scolaires".into()),
            (StyleCategory::Holiday, "Férié".into()),
            (StyleCategory::TransitionDay, "Jour de passage".into()),
            (StyleCategory::Today, "Aujourd'hui".into()),
        ],
        Language::English => [
            (StyleCategory::ParentA, config.parent_a.name.clone()),
            (StyleCategory::ParentB, config.parent_b.name.clone()),
            (StyleCategory::Vacation, "School vacation".into()),
            (StyleCategory::Holiday, "Public holiday".into()),
            (StyleCategory::TransitionDay, "Handover day".into()),
            (StyleCategory::Today, "Today".into()),
        ],
    };
    labels
        .into_iter()
        .filter(|(category, _)| config.rules.vacation_rule || *category != StyleCategory::Vacation)
        .filter(|(category, _)| config.rules.highlight_today || *category != StyleCategory::Today)
        .map(|(category, label)| LegendEntry {
            category,
            label,
            style: config.palette.style(category),
        })
        .collect()
}
