// --- File: crates/bookly_slots/src/availability.rs ---
//! Recurring weekly availability.
//!
//! Windows are kept per weekday, sorted by start time. The sort order is an
//! invariant of [`WeeklyAvailability`], maintained on every insertion, so reads
//! never re-sort.

use bookly_common::{invalid_input, AvailabilityWindow, BooklyError, TimeOfDay};
use thiserror::Error;
use tracing::debug;

use crate::range::TimeRange;

const DAYS_PER_WEEK: usize = 7;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("day of week {0} is outside 0 (Sunday) ..= 6 (Saturday)")]
    InvalidDay(u8),
    #[error("start time {start} must be before end time {end}")]
    InvalidRange { start: TimeOfDay, end: TimeOfDay },
    #[error("time {0} must have minutes 00 or 30")]
    MisalignedTime(TimeOfDay),
    #[error("availability batch must contain at least one window")]
    EmptyBatch,
    #[error("overlapping availability on day {day_of_week}: {existing} and {candidate}")]
    Overlap {
        day_of_week: u8,
        existing: String,
        candidate: String,
    },
}

impl From<AvailabilityError> for BooklyError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::Overlap { .. } => BooklyError::Conflict(err.to_string()),
            other => invalid_input(other),
        }
    }
}

fn describe(window: &AvailabilityWindow) -> String {
    format!("{}-{}", window.start_time, window.end_time)
}

fn range_of(window: &AvailabilityWindow) -> TimeRange {
    TimeRange::new(window.start_time, window.end_time)
}

/// Same weekday and half-open overlap of the time ranges.
pub fn windows_overlap(a: &AvailabilityWindow, b: &AvailabilityWindow) -> bool {
    a.day_of_week == b.day_of_week && range_of(a).overlaps(&range_of(b))
}

/// Checks a single window on its own: weekday, half-hour grid, `start < end`.
pub fn validate_window(window: &AvailabilityWindow) -> Result<(), AvailabilityError> {
    if usize::from(window.day_of_week) >= DAYS_PER_WEEK {
        return Err(AvailabilityError::InvalidDay(window.day_of_week));
    }
    for time in [window.start_time, window.end_time] {
        if !time.is_half_hour_aligned() {
            return Err(AvailabilityError::MisalignedTime(time));
        }
    }
    if window.start_time >= window.end_time {
        return Err(AvailabilityError::InvalidRange {
            start: window.start_time,
            end: window.end_time,
        });
    }
    Ok(())
}

/// A service's weekly windows keyed by weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyAvailability {
    days: [Vec<AvailabilityWindow>; DAYS_PER_WEEK],
}

impl WeeklyAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the availability for a wholesale replacement.
    ///
    /// Every pair of windows sharing a weekday is checked, across the whole batch.
    /// Each day group is sorted by start time and a violation is any window that
    /// starts before the previous one ends.
    pub fn try_from_batch<I>(windows: I) -> Result<Self, AvailabilityError>
    where
        I: IntoIterator<Item = AvailabilityWindow>,
    {
        let mut availability = Self::default();
        for window in windows {
            validate_window(&window)?;
            availability.days[usize::from(window.day_of_week)].push(window);
        }
        if availability.is_empty() {
            return Err(AvailabilityError::EmptyBatch);
        }

        for day in availability.days.iter_mut() {
            day.sort_by_key(|w| (w.start_time, w.end_time));
            if let Some(pair) = day
                .windows(2)
                .find(|pair| pair[1].start_time < pair[0].end_time)
            {
                return Err(AvailabilityError::Overlap {
                    day_of_week: pair[0].day_of_week,
                    existing: describe(&pair[0]),
                    candidate: describe(&pair[1]),
                });
            }
        }
        Ok(availability)
    }

    /// Appends one window after checking it against the windows already held for its day.
    pub fn add_window(&mut self, window: AvailabilityWindow) -> Result<(), AvailabilityError> {
        validate_window(&window)?;
        let day = &mut self.days[usize::from(window.day_of_week)];

        if let Some(existing) = day.iter().find(|w| windows_overlap(w, &window)) {
            debug!(
                "Rejecting window {} on day {}: overlaps {}",
                describe(&window),
                window.day_of_week,
                describe(existing)
            );
            return Err(AvailabilityError::Overlap {
                day_of_week: window.day_of_week,
                existing: describe(existing),
                candidate: describe(&window),
            });
        }

        let position = day.partition_point(|w| w.start_time <= window.start_time);
        day.insert(position, window);
        Ok(())
    }

    /// Windows for one weekday, start time ascending. Out-of-range days have none.
    pub fn windows_for(&self, day_of_week: u8) -> &[AvailabilityWindow] {
        self.days
            .get(usize::from(day_of_week))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }

    /// All windows, Sunday first, start time ascending within a day.
    pub fn into_windows(self) -> Vec<AvailabilityWindow> {
        self.days.into_iter().flatten().collect()
    }
}

/// Collects stored windows without re-checking them; only the ordering is restored.
impl FromIterator<AvailabilityWindow> for WeeklyAvailability {
    fn from_iter<I: IntoIterator<Item = AvailabilityWindow>>(iter: I) -> Self {
        let mut availability = Self::default();
        for window in iter {
            if let Some(day) = availability.days.get_mut(usize::from(window.day_of_week)) {
                day.push(window);
            }
        }
        for day in availability.days.iter_mut() {
            day.sort_by_key(|w| (w.start_time, w.end_time));
        }
        availability
    }
}
