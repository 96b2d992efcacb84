//! The wire-visible slot identifier `{serviceId}_{date}_{startTime}`.
//!
//! Service ids must not contain `_`; the first segment is taken as an opaque id.
//! Parsing reads the first three segments only, and [`SlotId`]'s `Display` always
//! renders the canonical three-segment form.

use bookly_common::{invalid_input, parse_date, BooklyError, TimeOfDay};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const SLOT_ID_SEPARATOR: char = '_';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotIdError {
    #[error("Invalid slotId format: '{0}'")]
    Format(String),
    #[error("Invalid slotId date: '{0}'")]
    Date(String),
    #[error("Invalid slotId start time: '{0}'")]
    StartTime(String),
}

impl From<SlotIdError> for BooklyError {
    fn from(err: SlotIdError) -> Self {
        invalid_input(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotId {
    pub service_id: String,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
}

impl SlotId {
    pub fn new(service_id: impl Into<String>, date: NaiveDate, start_time: TimeOfDay) -> Self {
        Self {
            service_id: service_id.into(),
            date,
            start_time,
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.service_id,
            self.date.format("%Y-%m-%d"),
            self.start_time,
            sep = SLOT_ID_SEPARATOR
        )
    }
}

impl FromStr for SlotId {
    type Err = SlotIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Segments after the start time are ignored.
        let mut parts = s.split(SLOT_ID_SEPARATOR);
        let (Some(service_id), Some(date), Some(start_time)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(SlotIdError::Format(s.to_string()));
        };
        if service_id.is_empty() {
            return Err(SlotIdError::Format(s.to_string()));
        }

        let date = parse_date(date).map_err(|_| SlotIdError::Date(date.to_string()))?;
        let start_time = TimeOfDay::parse_half_hour(start_time)
            .map_err(|_| SlotIdError::StartTime(start_time.to_string()))?;

        Ok(SlotId::new(service_id, date, start_time))
    }
}
