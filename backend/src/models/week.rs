use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Canonical textual form of a week key.
pub const WEEK_KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar week identified by its Monday.
///
/// The inner date is always a Monday, so ordering keys chronologically is the
/// same as ordering their `YYYY-MM-DD` strings lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey(NaiveDate);

impl WeekKey {
    /// Key of the week containing `date`.
    ///
    /// Sundays shift back 6 days, every other weekday shifts back
    /// `weekday - 1` days. `None` when that Monday falls before the first
    /// representable date.
    pub fn containing(date: NaiveDate) -> Option<Self> {
        let back = date.weekday().num_days_from_monday();
        date.checked_sub_days(Days::new(u64::from(back))).map(Self)
    }

    /// The Monday this key stands for.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Exactly one week earlier, if representable.
    pub fn previous(&self) -> Option<Self> {
        self.0.checked_sub_days(Days::new(7)).map(Self)
    }

    /// Exactly one week later, if representable.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add_days(Days::new(7)).map(Self)
    }

    /// Whole weeks elapsed since `earlier`, floored at zero.
    pub fn weeks_since(&self, earlier: WeekKey) -> u32 {
        let days = (self.0 - earlier.0).num_days();
        if days <= 0 {
            0
        } else {
            u32::try_from(days / 7).unwrap_or(u32::MAX)
        }
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(WEEK_KEY_FORMAT))
    }
}

/// Error returned when a week key string is not a `YYYY-MM-DD` date, or
/// names a date whose week starts outside the calendar range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid week key '{input}': expected YYYY-MM-DD")]
pub struct WeekKeyParseError {
    pub input: String,
}

impl FromStr for WeekKey {
    type Err = WeekKeyParseError;

    /// Parses a date and normalises it to its Monday.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), WEEK_KEY_FORMAT)
            .ok()
            .and_then(WeekKey::containing)
            .ok_or_else(|| WeekKeyParseError {
                input: s.to_string(),
            })
    }
}

impl Serialize for WeekKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "week_tests.rs"]
mod week_tests;
