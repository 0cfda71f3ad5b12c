use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Semantic category a row (or a single cell) is styled as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleCategory {
    Today,
    Holiday,
    Vacation,
    TransitionDay,
    ParentA,
    ParentB,
    Neutral,
    /// Cell-level override for a non-empty vacation label.
    VacationCell,
}

impl StyleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleCategory::Today => "today",
            StyleCategory::Holiday => "holiday",
            StyleCategory::Vacation => "vacation",
            StyleCategory::TransitionDay => "transition_day",
            StyleCategory::ParentA => "parent_a",
            StyleCategory::ParentB => "parent_b",
            StyleCategory::Neutral => "neutral",
            StyleCategory::VacationCell => "vacation_cell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color '{}' (expected #RRGGBB)", self.0)
    }
}

impl std::error::Error for ColorParseError {}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorParseError(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorParseError(s.to_string()))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Color>,
    #[serde(default)]
    pub bold: bool,
}

impl Style {
    pub const NONE: Style = Style {
        background: None,
        text: None,
        bold: false,
    };

    pub const fn background(color: Color) -> Self {
        Self {
            background: Some(color),
            text: None,
            bold: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.text.is_none() && !self.bold
    }

    /// Inline CSS declarations, empty for the neutral style.
    pub fn to_css(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if let Some(bg) = self.background {
            parts.push(format!("background-color: {bg}"));
        }
        if let Some(text) = self.text {
            parts.push(format!("color: {text}"));
        }
        if self.bold {
            parts.push("font-weight: bold".to_string());
        }
        parts.join("; ")
    }
}

/// One style per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub today: Style,
    pub holiday: Style,
    pub vacation: Style,
    pub transition_day: Style,
    pub parent_a: Style,
    pub parent_b: Style,
    pub neutral: Style,
    pub vacation_cell: Style,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            today: Style {
                background: Some(Color::rgb(0xFF, 0xD9, 0x66)),
                text: None,
                bold: true,
            },
            holiday: Style::background(Color::rgb(0xF4, 0xCC, 0xCC)),
            vacation: Style::background(Color::rgb(0xEA, 0xD1, 0xDC)),
            transition_day: Style::background(Color::rgb(0xFF, 0xF2, 0xCC)),
            parent_a: Style::background(Color::rgb(0xC6, 0xE0, 0xB4)),
            parent_b: Style::background(Color::rgb(0xBD, 0xD7, 0xEE)),
            neutral: Style::NONE,
            vacation_cell: Style {
                background: Some(Color::rgb(0xD9, 0xC3, 0xE9)),
                text: Some(Color::rgb(0x70, 0x30, 0xA0)),
                bold: true,
            },
        }
    }
}

impl Palette {
    pub fn style(&self, category: StyleCategory) -> Style {
        match category {
            StyleCategory::Today => self.today,
            StyleCategory::Holiday => self.holiday,
            StyleCategory::Vacation => self.vacation,
            StyleCategory::TransitionDay => self.transition_day,
            StyleCategory::ParentA => self.parent_a,
            StyleCategory::ParentB => self.parent_b,
            StyleCategory::Neutral => self.neutral,
            StyleCategory::VacationCell => self.vacation_cell,
        }
    }
}
