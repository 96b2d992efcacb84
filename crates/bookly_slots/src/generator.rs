// --- File: crates/bookly_slots/src/generator.rs ---
use bookly_common::{weekday_index, AvailabilityWindow, TimeOfDay};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::range::TimeRange;
use crate::slot_id::SlotId;

/// A derived, never persisted, bookable interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub slot_id: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

/// Derives the bookable slots of one service on one date.
///
/// Only windows whose weekday matches `date` are walked, in the order given,
/// in fixed strides of `duration_minutes` from each window's start. A candidate
/// is kept when it ends within the window and overlaps none of `booked`.
///
/// `booked` must already be restricted to `BOOKED` appointments of that date;
/// no status filtering happens here. Windows are trusted not to overlap, so no
/// de-duplication is done either.
pub fn generate_slots(
    service_id: &str,
    duration_minutes: u32,
    date: NaiveDate,
    windows: &[AvailabilityWindow],
    booked: &[TimeRange],
) -> Vec<Slot> {
    if duration_minutes == 0 {
        debug!("Zero duration for service {}, no slots", service_id);
        return Vec::new();
    }

    let day_of_week = weekday_index(date);
    let mut slots = Vec::new();

    for window in windows.iter().filter(|w| w.day_of_week == day_of_week) {
        let window_end = u32::from(window.end_time.minutes());
        let mut current = u32::from(window.start_time.minutes());

        while current + duration_minutes <= window_end {
            // Both bounds are <= window_end < 24:00, so the conversions cannot fail.
            let (Some(start), Some(end)) = (
                u16::try_from(current).ok().and_then(TimeOfDay::from_minutes),
                u16::try_from(current + duration_minutes)
                    .ok()
                    .and_then(TimeOfDay::from_minutes),
            ) else {
                break;
            };

            let candidate = TimeRange::new(start, end);
            if !booked.iter().any(|b| candidate.overlaps(b)) {
                slots.push(Slot {
                    slot_id: SlotId::new(service_id, date, start).to_string(),
                    start_time: start,
                    end_time: end,
                });
            }

            current += duration_minutes;
        }
    }

    debug!(
        "Generated {} slots for service {} on {} (weekday {})",
        slots.len(),
        service_id,
        date,
        day_of_week
    );
    slots
}
