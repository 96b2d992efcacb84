#[cfg(test)]
mod tests {
    use crate::generator::{generate_slots, Slot};
    use crate::range::TimeRange;
    use bookly_common::{parse_date, AvailabilityWindow, TimeOfDay};

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn window(day: u8, start: &str, end: &str) -> AvailabilityWindow {
        AvailabilityWindow {
            day_of_week: day,
            start_time: t(start),
            end_time: t(end),
        }
    }

    fn starts(slots: &[Slot]) -> Vec<String> {
        slots.iter().map(|s| s.start_time.to_string()).collect()
    }

    // 2025-03-10 is a Monday (weekday 1).
    const MONDAY: &str = "2025-03-10";

    #[test]
    fn test_basic_monday_window() {
        let date = parse_date(MONDAY).unwrap();
        let slots = generate_slots("svc1", 30, date, &[window(1, "09:00", "11:00")], &[]);

        assert_eq!(starts(&slots), ["09:00", "09:30", "10:00", "10:30"]);
        assert_eq!(slots[0].slot_id, "svc1_2025-03-10_09:00");
        assert_eq!(slots[0].end_time, t("09:30"));
        assert_eq!(slots[3].end_time, t("11:00"));
    }

    #[test]
    fn test_booked_slot_is_excluded() {
        let date = parse_date(MONDAY).unwrap();
        let booked = [TimeRange::new(t("09:30"), t("10:00"))];
        let slots = generate_slots("svc1", 30, date, &[window(1, "09:00", "11:00")], &booked);

        assert_eq!(starts(&slots), ["09:00", "10:00", "10:30"]);
    }

    #[test]
    fn test_longer_booking_blocks_every_overlapping_candidate() {
        let date = parse_date(MONDAY).unwrap();
        let booked = [TimeRange::new(t("09:30"), t("10:30"))];
        let slots = generate_slots("svc1", 60, date, &[window(1, "09:00", "12:00")], &booked);

        // 09:00-10:00 and 10:00-11:00 both intersect the booking.
        assert_eq!(starts(&slots), ["11:00"]);
    }

    #[test]
    fn test_window_shorter_than_duration_yields_nothing() {
        let date = parse_date(MONDAY).unwrap();
        let slots = generate_slots("svc1", 60, date, &[window(1, "09:00", "09:30")], &[]);
        assert!(slots.is_empty());
    }

    #[test]
    fn test_tail_shorter_than_duration_is_dropped() {
        let date = parse_date(MONDAY).unwrap();
        let slots = generate_slots("svc1", 60, date, &[window(1, "09:00", "11:30")], &[]);
        assert_eq!(starts(&slots), ["09:00", "10:00"]);
    }

    #[test]
    fn test_no_window_for_weekday() {
        let tuesday = parse_date("2025-03-11").unwrap();
        let slots = generate_slots("svc1", 30, tuesday, &[window(1, "09:00", "11:00")], &[]);
        assert!(slots.is_empty());
    }

    #[test]
    fn test_zero_duration_yields_nothing() {
        let date = parse_date(MONDAY).unwrap();
        let slots = generate_slots("svc1", 0, date, &[window(1, "09:00", "11:00")], &[]);
        assert!(slots.is_empty());
    }

    #[test]
    fn test_windows_walked_in_given_order() {
        let date = parse_date(MONDAY).unwrap();
        let windows = [
            window(1, "14:00", "15:00"),
            window(0, "09:00", "10:00"),
            window(1, "09:00", "10:00"),
        ];
        let slots = generate_slots("svc1", 60, date, &windows, &[]);
        assert_eq!(starts(&slots), ["14:00", "09:00"]);
    }

    #[test]
    fn test_slot_serializes_camel_case() {
        let date = parse_date(MONDAY).unwrap();
        let slots = generate_slots("svc1", 30, date, &[window(1, "09:00", "09:30")], &[]);
        let json = serde_json::to_value(&slots[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "slotId": "svc1_2025-03-10_09:00",
                "startTime": "09:00",
                "endTime": "09:30"
            })
        );
    }
}
