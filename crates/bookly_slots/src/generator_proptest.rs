#[cfg(test)]
mod tests {
    use crate::availability::{windows_overlap, WeeklyAvailability};
    use crate::generator::generate_slots;
    use crate::range::TimeRange;
    use crate::slot_id::SlotId;
    use bookly_common::{weekday_index, AvailabilityWindow, TimeOfDay};
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;

    // Half-hour grid index (0..=47) to a time of day.
    fn grid(index: u16) -> TimeOfDay {
        TimeOfDay::from_minutes(index * 30).unwrap()
    }

    fn arb_window() -> impl Strategy<Value = AvailabilityWindow> {
        (0u8..7, 0u16..47)
            .prop_flat_map(|(day, start)| (Just(day), Just(start), (start + 1)..48))
            .prop_map(|(day, start, end)| AvailabilityWindow {
                day_of_week: day,
                start_time: grid(start),
                end_time: grid(end),
            })
    }

    fn arb_booked() -> impl Strategy<Value = TimeRange> {
        (0u16..47, 1u16..5).prop_map(|(start, len)| {
            let end = (start + len).min(47);
            TimeRange::new(grid(start), grid(end.max(start + 1)))
        })
    }

    fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (0i64..3650).prop_map(|offset| {
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
        })
    }

    fn arb_duration() -> impl Strategy<Value = u32> {
        (1u32..=4).prop_map(|n| n * 30)
    }

    /// Disjoint windows, the shape persisted availability always has.
    fn arb_valid_windows() -> impl Strategy<Value = Vec<AvailabilityWindow>> {
        prop::collection::vec(arb_window(), 1..8).prop_map(|candidates| {
            let mut availability = WeeklyAvailability::new();
            for w in candidates {
                let _ = availability.add_window(w);
            }
            availability.into_windows()
        })
    }

    proptest! {
        #[test]
        fn test_generation_is_deterministic(
            windows in arb_valid_windows(),
            booked in prop::collection::vec(arb_booked(), 0..5),
            date in arb_date(),
            duration in arb_duration(),
        ) {
            let first = generate_slots("svc", duration, date, &windows, &booked);
            let second = generate_slots("svc", duration, date, &windows, &booked);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn test_no_slot_overlaps_a_booking(
            windows in arb_valid_windows(),
            booked in prop::collection::vec(arb_booked(), 0..5),
            date in arb_date(),
            duration in arb_duration(),
        ) {
            for slot in generate_slots("svc", duration, date, &windows, &booked) {
                let range = TimeRange::new(slot.start_time, slot.end_time);
                prop_assert!(booked.iter().all(|b| !range.overlaps(b)));
            }
        }

        #[test]
        fn test_slots_sit_on_the_stride_inside_a_window(
            windows in arb_valid_windows(),
            date in arb_date(),
            duration in arb_duration(),
        ) {
            let day = weekday_index(date);
            for slot in generate_slots("svc", duration, date, &windows, &[]) {
                prop_assert_eq!(
                    u32::from(slot.end_time.minutes()) - u32::from(slot.start_time.minutes()),
                    duration
                );
                let owner = windows.iter().find(|w| {
                    w.day_of_week == day
                        && TimeRange::new(w.start_time, w.end_time)
                            .contains(&TimeRange::new(slot.start_time, slot.end_time))
                });
                prop_assert!(owner.is_some());
                let offset = slot.start_time.minutes() - owner.unwrap().start_time.minutes();
                prop_assert_eq!(u32::from(offset) % duration, 0);

                let parsed: SlotId = slot.slot_id.parse().unwrap();
                prop_assert_eq!(parsed, SlotId::new("svc", date, slot.start_time));
            }
        }

        #[test]
        fn test_overlapping_batch_is_rejected(
            windows in prop::collection::vec(arb_window(), 1..8),
        ) {
            let has_overlap = windows.iter().enumerate().any(|(i, a)| {
                windows.iter().skip(i + 1).any(|b| windows_overlap(a, b))
            });
            let result = WeeklyAvailability::try_from_batch(windows.clone());
            prop_assert_eq!(result.is_err(), has_overlap);
        }
    }
}
