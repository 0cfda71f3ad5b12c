use crate::calendar::{Language, fold_text};
use crate::style::Palette;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

pub const CONFIG_PATH_ENV: &str = "CUSTODY_CALENDAR_CONFIG";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(SerdeJsonError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "cannot read config: {err}"),
            ConfigError::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<SerdeJsonError> for ConfigError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Parse(value)
    }
}

/// Everything that tunes loading and coloring. Every field has a default, so
/// an empty JSON object is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub title: String,
    pub language: Language,
    pub columns: ColumnAliases,
    pub normalize: NormalizeOptions,
    pub rules: RuleConfig,
    pub parent_a: ParentIdentity,
    pub parent_b: ParentIdentity,
    pub palette: Palette,
    pub window: ScrollWindow,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            title: "Calendrier de garde".to_string(),
            language: Language::default(),
            columns: ColumnAliases::default(),
            normalize: NormalizeOptions::default(),
            rules: RuleConfig::default(),
            parent_a: ParentIdentity::new("Jerome", ["Jérôme"]),
            parent_b: ParentIdentity::new("Sanou", [] as [&str; 0]),
            palette: Palette::default(),
            window: ScrollWindow::default(),
        }
    }
}

impl CalendarConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn save_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Read the file named by `CUSTODY_CALENDAR_CONFIG`, or the defaults when
    /// the variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => {
                tracing::info!(path = ?path, "loading calendar config");
                Self::from_json_file(path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Header aliases per column role, matched case- and accent-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAliases {
    pub date: Vec<String>,
    pub weekday: Vec<String>,
    pub day: Vec<String>,
    pub month: Vec<String>,
    pub year: Vec<String>,
    pub parent: Vec<String>,
    pub holiday: Vec<String>,
    pub vacation: Vec<String>,
}

fn strings<const N: usize>(values: [&str; N]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            date: strings(["date"]),
            weekday: strings(["jour", "jour_semaine", "weekday", "day_name"]),
            day: strings(["jour_num", "numero_jour", "num_jour", "day", "day_of_month"]),
            month: strings(["mois", "month"]),
            year: strings(["annee", "year"]),
            parent: strings(["parent", "assigned_parent", "garde"]),
            holiday: strings(["nom_ferie", "ferie", "holiday", "holiday_name"]),
            vacation: strings([
                "vacances_scolaires",
                "vacances",
                "school_vacation",
                "vacation",
            ]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    pub drop_identifier_column: bool,
    pub drop_year_column: bool,
    pub reorder_columns: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            drop_identifier_column: true,
            drop_year_column: true,
            reorder_columns: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub transition_day: Weekday,
    pub vacation_rule: bool,
    pub highlight_today: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            transition_day: Weekday::Fri,
            vacation_rule: true,
            highlight_today: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentIdentity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl ParentIdentity {
    pub fn new<I, S>(name: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        let folded = fold_text(value);
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .any(|candidate| fold_text(candidate) == folded)
    }
}

/// Rows shown before and after the row nearest to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollWindow {
    pub before: usize,
    pub after: usize,
}

impl Default for ScrollWindow {
    fn default() -> Self {
        Self {
            before: 3,
            after: 10,
        }
    }
}
