use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// Language used for labels derived from a date (weekday and month names).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    French,
    English,
}

impl Language {
    const FRENCH_MONTHS: [&'static str; 12] = [
        "janvier",
        "février",
        "mars",
        "avril",
        "mai",
        "juin",
        "juillet",
        "août",
        "septembre",
        "octobre",
        "novembre",
        "décembre",
    ];

    const ENGLISH_MONTHS: [&'static str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];

    /// Month name for a 1-based month number.
    pub fn month_name(self, month: u32) -> &'static str {
        let idx = (month.clamp(1, 12) - 1) as usize;
        match self {
            Language::French => Self::FRENCH_MONTHS[idx],
            Language::English => Self::ENGLISH_MONTHS[idx],
        }
    }

    pub fn weekday_name(self, weekday: Weekday) -> &'static str {
        match (self, weekday) {
            (Language::French, Weekday::Mon) => "lundi",
            (Language::French, Weekday::Tue) => "mardi",
            (Language::French, Weekday::Wed) => "mercredi",
            (Language::French, Weekday::Thu) => "jeudi",
            (Language::French, Weekday::Fri) => "vendredi",
            (Language::French, Weekday::Sat) => "samedi",
            (Language::French, Weekday::Sun) => "dimanche",
            (Language::English, Weekday::Mon) => "Monday",
            (Language::English, Weekday::Tue) => "Tuesday",
            (Language::English, Weekday::Wed) => "Wednesday",
            (Language::English, Weekday::Thu) => "Thursday",
            (Language::English, Weekday::Fri) => "Friday",
            (Language::English, Weekday::Sat) => "Saturday",
            (Language::English, Weekday::Sun) => "Sunday",
        }
    }
}

/// Parse a weekday label written in French or English, full or abbreviated.
pub fn parse_weekday_label(label: &str) -> Option<Weekday> {
    let folded = fold_text(label);
    let folded = folded.trim_end_matches('.');
    let weekday = match folded {
        "lundi" | "lun" | "monday" | "mon" => Weekday::Mon,
        "mardi" | "mar" | "tuesday" | "tue" | "tues" => Weekday::Tue,
        "mercredi" | "mer" | "wednesday" | "wed" => Weekday::Wed,
        "jeudi" | "jeu" | "thursday" | "thu" | "thurs" => Weekday::Thu,
        "vendredi" | "ven" | "friday" | "fri" => Weekday::Fri,
        "samedi" | "sam" | "saturday" | "sat" => Weekday::Sat,
        "dimanche" | "dim" | "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

/// Lowercase, trim and strip the accents found in French labels so that
/// "Jérôme", " jerome " and "JEROME" compare equal.
pub fn fold_text(input: &str) -> String {
    input
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a date cell. Accepts ISO dates (with or without a time part),
/// day-first slashed dates and Excel serial day numbers. Time of day is discarded.
pub fn parse_date_cell(input: &str) -> Option<NaiveDate> {
    let value = input.trim();
    if value.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }
    value.parse::<f64>().ok().and_then(date_from_excel_serial)
}

/// Excel 1900 date system. Serials before 61 (1900-03-01) land one day early
/// because of Excel's phantom 1900-02-29.
pub fn date_from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > 2_958_465.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

pub(crate) fn date_to_i32(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub(crate) fn date_from_i32(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

// NaiveDate::from_ymd(1970, 1, 1).num_days_from_ce()
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;
