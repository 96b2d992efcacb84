// --- File: crates/bookly_slots/src/validator.rs ---
//! Booking-time checks on a single candidate slot.

use bookly_common::{weekday_index, AvailabilityWindow, TimeOfDay};
use chrono::{NaiveDate, NaiveDateTime};

use crate::range::TimeRange;

pub const MIN_DURATION_MINUTES: i64 = 30;
pub const MAX_DURATION_MINUTES: i64 = 120;
pub const DURATION_STEP_MINUTES: i64 = 30;

/// Durations are multiples of 30 between 30 and 120 inclusive.
pub fn is_valid_duration(minutes: i64) -> bool {
    (MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes)
        && minutes % DURATION_STEP_MINUTES == 0
}

/// End of a slot starting at `start`. `None` when it would cross midnight.
pub fn slot_end_time(start: TimeOfDay, duration_minutes: u32) -> Option<TimeOfDay> {
    start.checked_add_minutes(duration_minutes)
}

/// `candidate` fits inside some window of the date's weekday and overlaps no booked range.
pub fn is_slot_available(
    date: NaiveDate,
    candidate: TimeRange,
    windows: &[AvailabilityWindow],
    booked: &[TimeRange],
) -> bool {
    let day_of_week = weekday_index(date);

    let inside_window = windows
        .iter()
        .filter(|w| w.day_of_week == day_of_week)
        .any(|w| TimeRange::new(w.start_time, w.end_time).contains(&candidate));

    inside_window && !booked.iter().any(|b| candidate.overlaps(b))
}

/// The slot starts at or before `now`.
pub fn starts_at_or_before(date: NaiveDate, start: TimeOfDay, now: NaiveDateTime) -> bool {
    date.and_time(start.to_naive_time()) <= now
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookly_common::parse_date;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn monday_window() -> Vec<AvailabilityWindow> {
        vec![
            AvailabilityWindow {
                day_of_week: 1,
                start_time: t("09:00"),
                end_time: t("10:00"),
            },
            AvailabilityWindow {
                day_of_week: 1,
                start_time: t("14:00"),
                end_time: t("16:00"),
            },
        ]
    }

    #[test]
    fn durations() {
        for ok in [30, 60, 90, 120] {
            assert!(is_valid_duration(ok));
        }
        for bad in [0, 15, 45, 150, -30] {
            assert!(!is_valid_duration(bad));
        }
    }

    #[test]
    fn slot_must_fit_a_matching_weekday_window() {
        let monday = parse_date("2025-03-10").unwrap();
        let tuesday = parse_date("2025-03-11").unwrap();
        let windows = monday_window();

        assert!(is_slot_available(monday, TimeRange::new(t("09:30"), t("10:00")), &windows, &[]));
        // Second window counts too, not only the first matching one.
        assert!(is_slot_available(monday, TimeRange::new(t("15:00"), t("16:00")), &windows, &[]));
        assert!(!is_slot_available(monday, TimeRange::new(t("09:30"), t("10:30")), &windows, &[]));
        assert!(!is_slot_available(tuesday, TimeRange::new(t("09:00"), t("09:30")), &windows, &[]));
    }

    #[test]
    fn slot_must_not_overlap_booked_ranges() {
        let monday = parse_date("2025-03-10").unwrap();
        let booked = [TimeRange::new(t("09:00"), t("09:30"))];
        let windows = monday_window();

        assert!(!is_slot_available(monday, TimeRange::new(t("09:00"), t("09:30")), &windows, &booked));
        assert!(is_slot_available(monday, TimeRange::new(t("09:30"), t("10:00")), &windows, &booked));
    }

    #[test]
    fn end_time_does_not_wrap() {
        assert_eq!(slot_end_time(t("09:00"), 90), Some(t("10:30")));
        assert_eq!(slot_end_time(t("23:30"), 30), None);
    }

    #[test]
    fn start_exactly_now_counts_as_past() {
        let date = parse_date("2025-03-10").unwrap();
        let now = date.and_hms_opt(9, 0, 0).unwrap();
        assert!(starts_at_or_before(date, t("09:00"), now));
        assert!(starts_at_or_before(date, t("08:30"), now));
        assert!(!starts_at_or_before(date, t("09:30"), now));
    }
}
