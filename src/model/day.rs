//! Calendar-day key used to bucket tasks and archives.
//!
//! # Responsibility
//! - Normalize caller-supplied date strings into real calendar days.
//! - Provide the "today"/"previous day" defaults used by task creation and
//!   the rollover batch.
//!
//! # Invariants
//! - Only the leading 10 characters of the input are considered; callers may
//!   pass a full timestamp and only the date portion is kept.
//! - The truncated head must parse as a real `YYYY-MM-DD` calendar date;
//!   impossible dates such as `2024-02-30` are rejected.
//! - The textual form sorts lexicographically in chronological order.

use crate::model::ValidationError;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const DAY_KEY_CHARS: usize = 10;
const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// One calendar day, the scoping unit for tasks and daily archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Parses a day key from caller input.
    ///
    /// Truncates to the leading 10 characters (the system's sole date
    /// normalization rule) and then requires a strict `YYYY-MM-DD` parse.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDay {
            input: input.to_string(),
        };

        let head: String = input.trim().chars().take(DAY_KEY_CHARS).collect();
        let parsed = NaiveDate::parse_from_str(&head, DAY_KEY_FORMAT).map_err(|_| invalid())?;
        // chrono accepts unpadded month/day digits; only the canonical
        // zero-padded form round-trips.
        if parsed.format(DAY_KEY_FORMAT).to_string() != head {
            return Err(invalid());
        }
        Ok(Self(parsed))
    }

    /// Wraps an already-validated calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Returns the current calendar day in local time.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Returns the calendar day immediately before this one.
    ///
    /// Saturates at the calendar minimum instead of wrapping.
    pub fn previous_day(self) -> Self {
        Self(self.0.pred_opt().unwrap_or(self.0))
    }

    /// Returns the wrapped calendar date.
    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl Display for DayKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DAY_KEY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::DayKey;
    use crate::model::ValidationError;

    #[test]
    fn parse_accepts_plain_day() {
        let day = DayKey::parse("2024-01-05").unwrap();
        assert_eq!(day.to_string(), "2024-01-05");
    }

    #[test]
    fn parse_keeps_date_portion_of_timestamp() {
        let day = DayKey::parse("2024-01-05T08:30:00Z").unwrap();
        assert_eq!(day.to_string(), "2024-01-05");
    }

    #[test]
    fn parse_rejects_impossible_calendar_date() {
        let err = DayKey::parse("2024-02-30").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDay { .. }));
    }

    #[test]
    fn parse_rejects_short_and_garbled_input() {
        assert!(DayKey::parse("2024-1-5").is_err());
        assert!(DayKey::parse("yesterday").is_err());
        assert!(DayKey::parse("").is_err());
    }

    #[test]
    fn parse_requires_zero_padded_components() {
        assert!(DayKey::parse("2024-1-05").is_err());
        assert!(DayKey::parse("2024-01-5").is_err());
        assert!(DayKey::parse("224-01-05").is_err());
        assert!(DayKey::parse("2024-01-05").is_ok());
    }

    #[test]
    fn previous_day_crosses_month_boundary() {
        let day = DayKey::parse("2024-03-01").unwrap();
        assert_eq!(day.previous_day().to_string(), "2024-02-29");
    }

    #[test]
    fn textual_order_is_chronological() {
        let earlier = DayKey::parse("2023-12-31").unwrap();
        let later = DayKey::parse("2024-01-01").unwrap();
        assert!(earlier < later);
        assert!(earlier.to_string() < later.to_string());
    }

    #[test]
    fn serde_round_trips_as_string() {
        let day = DayKey::parse("2024-01-05").unwrap();
        let json = serde_json::to_string(&day).unwrap();
        assert_eq!(json, "\"2024-01-05\"");
        let back: DayKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, day);
    }
}
