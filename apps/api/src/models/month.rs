//! Calendar-month values used by career entries.
//!
//! Dates travel over the wire as full ISO dates with the day fixed to 1
//! (`2020-04-01`) and are edited as `YYYY-MM`. Any incoming day is dropped.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Reserved `end_date` value for an ongoing assignment.
pub const CURRENT_SENTINEL: &str = "current";

#[derive(Debug, Error, PartialEq)]
pub enum MonthParseError {
    #[error("empty month value")]
    Empty,

    #[error("invalid month value '{0}'")]
    Invalid(String),
}

/// A year and month with no day component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
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

    /// Last calendar day of the month.
    pub fn last_day(&self) -> NaiveDate {
        let (y, m) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(y, m, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Whole months from `self` to `other` (negative when `other` is earlier).
    pub fn months_until(&self, other: YearMonth) -> i32 {
        (other.year - self.year) * 12 + (other.month as i32 - self.month as i32)
    }

    /// `YYYY-MM`, the value a month input holds.
    pub fn to_input_value(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// `YYYY-MM-01`, the stored form.
    pub fn to_iso_date(&self) -> String {
        format!("{:04}-{:02}-01", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = MonthParseError;

    /// Accepts `YYYY-MM` or `YYYY-MM-DD`; the day is validated then dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MonthParseError::Empty);
        }
        let invalid = || MonthParseError::Invalid(s.to_string());

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self::from_date(date));
        }

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_date())
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso_date())
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// End of a career entry: a month, or ongoing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndDate {
    Month(YearMonth),
    Current,
}

impl FromStr for EndDate {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == CURRENT_SENTINEL {
            Ok(EndDate::Current)
        } else {
            s.parse().map(EndDate::Month)
        }
    }
}

impl Serialize for EndDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EndDate::Month(m) => m.serialize(serializer),
            EndDate::Current => serializer.serialize_str(CURRENT_SENTINEL),
        }
    }
}

impl<'de> Deserialize<'de> for EndDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
