//! The "current time" capability.
//!
//! Past date/time checks read the clock at call time; production code uses
//! [`SystemClock`] in the configured zone, tests pin a [`FixedClock`].

use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::fmt::Debug;

use crate::error::{invalid_input, BooklyError};

pub trait Clock: Send + Sync + Debug {
    /// Wall-clock "now" in the process-wide zone, without zone information.
    fn now(&self) -> NaiveDateTime;

    /// Today's calendar date in the same zone.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Builds a clock from an IANA zone name such as `Europe/Zurich`.
    pub fn from_zone_name(name: &str) -> Result<Self, BooklyError> {
        let tz = name
            .parse::<Tz>()
            .map_err(|_| invalid_input(format!("unknown time zone: {name}")))?;
        Ok(Self::new(tz))
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}
