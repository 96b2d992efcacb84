//! Calendar dates and whole-minute times of day.
//!
//! Times travel as zero-padded 24-hour `HH:MM` strings; internally they are minutes
//! since midnight so all arithmetic is exact integer math. Ordering of
//! [`TimeOfDay`] matches the lexicographic ordering of its string form.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("time '{0}' must be in HH:MM format")]
    InvalidTime(String),
    #[error("time '{0}' must have minutes 00 or 30")]
    MisalignedMinute(String),
    #[error("date '{0}' must be a calendar date in YYYY-MM-DD format")]
    InvalidDate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MINUTES_PER_DAY: u16 = 24 * 60;

    /// `minutes` must be below 24:00.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < Self::MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Parses a strict `HH:MM` (00-23, 00-59).
    pub fn parse(value: &str) -> Result<Self, TimeParseError> {
        let invalid = || TimeParseError::InvalidTime(value.to_string());
        let bytes = value.as_bytes();
        let shape_ok = bytes.len() == 5
            && bytes.iter().enumerate().all(|(i, b)| match i {
                2 => *b == b':',
                _ => b.is_ascii_digit(),
            });
        if !shape_ok {
            return Err(invalid());
        }
        let time = NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| invalid())?;
        u16::try_from(time.hour() * 60 + time.minute())
            .ok()
            .and_then(Self::from_minutes)
            .ok_or_else(invalid)
    }

    /// Parses `HH:MM` and additionally requires the minute to be `00` or `30`.
    pub fn parse_half_hour(value: &str) -> Result<Self, TimeParseError> {
        let time = Self::parse(value)?;
        if !time.is_half_hour_aligned() {
            return Err(TimeParseError::MisalignedMinute(value.to_string()));
        }
        Ok(time)
    }

    pub fn is_half_hour_aligned(self) -> bool {
        self.minute() % 30 == 0
    }

    /// Adds whole minutes; `None` when the result would reach or pass midnight.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<Self> {
        let total = u32::from(self.0).checked_add(minutes)?;
        u16::try_from(total).ok().and_then(Self::from_minutes)
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour()), u32::from(self.minute()), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, TimeParseError> {
    let bytes = value.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(TimeParseError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| TimeParseError::InvalidDate(value.to_string()))
}

/// Day-of-week index of a date: 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    // num_days_from_sunday is always 0..=6
    date.weekday().num_days_from_sunday() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_zero_padded() {
        let t = TimeOfDay::parse("09:30").unwrap();
        assert_eq!(t.minutes(), 570);
        assert_eq!(t.to_string(), "09:30");
        assert_eq!(TimeOfDay::from_minutes(5).unwrap().to_string(), "00:05");
    }

    #[test]
    fn rejects_malformed_times() {
        for bad in [
            "9:30", "24:00", "12:60", "12-30", "ab:cd", "12:300", "", " 9:30", "+1:30", "09:3a",
            "09:30:00",
        ] {
            assert!(TimeOfDay::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn half_hour_alignment() {
        assert!(TimeOfDay::parse_half_hour("10:00").is_ok());
        assert!(TimeOfDay::parse_half_hour("10:30").is_ok());
        assert_eq!(
            TimeOfDay::parse_half_hour("10:15"),
            Err(TimeParseError::MisalignedMinute("10:15".to_string()))
        );
    }

    #[test]
    fn ordering_matches_string_ordering() {
        let times = ["00:00", "08:30", "09:00", "12:00", "23:30"];
        for a in times {
            for b in times {
                let (ta, tb) = (TimeOfDay::parse(a).unwrap(), TimeOfDay::parse(b).unwrap());
                assert_eq!(ta.cmp(&tb), a.cmp(b));
            }
        }
    }

    #[test]
    fn addition_never_wraps_past_midnight() {
        let t = TimeOfDay::parse("23:00").unwrap();
        assert_eq!(t.checked_add_minutes(30).unwrap().to_string(), "23:30");
        assert!(t.checked_add_minutes(60).is_none());
    }

    #[test]
    fn dates_are_strict() {
        assert!(parse_date("2025-03-10").is_ok());
        assert!(parse_date("2025-3-10").is_err());
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_date("20250310").is_err());
        assert!(parse_date("+2025-03-1").is_err());
    }

    #[test]
    fn weekday_index_starts_on_sunday() {
        assert_eq!(weekday_index(parse_date("2025-03-09").unwrap()), 0); // Sunday
        assert_eq!(weekday_index(parse_date("2025-03-10").unwrap()), 1); // Monday
        assert_eq!(weekday_index(parse_date("2025-03-15").unwrap()), 6); // Saturday
    }

    #[test]
    fn serde_uses_the_string_form() {
        let t = TimeOfDay::parse("14:30").unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"14:30\"");
        let back: TimeOfDay = serde_json::from_str("\"14:30\"").unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<TimeOfDay>("\"25:00\"").is_err());
    }
}
