use bookly_common::{AvailabilityWindow, TimeOfDay};
use bookly_slots::{generate_slots, TimeRange};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn t(minutes: u16) -> TimeOfDay {
    TimeOfDay::from_minutes(minutes).unwrap()
}

// Helper function to create a working week of windows
fn create_windows(start_hour: u16, end_hour: u16, split: bool) -> Vec<AvailabilityWindow> {
    let mut windows = Vec::new();
    for day in 1..=5 {
        if split {
            let noon = 12 * 60;
            windows.push(AvailabilityWindow {
                day_of_week: day,
                start_time: t(start_hour * 60),
                end_time: t(noon),
            });
            windows.push(AvailabilityWindow {
                day_of_week: day,
                start_time: t(noon + 60),
                end_time: t(end_hour * 60),
            });
        } else {
            windows.push(AvailabilityWindow {
                day_of_week: day,
                start_time: t(start_hour * 60),
                end_time: t(end_hour * 60),
            });
        }
    }
    windows
}

// Helper function to create booked ranges every other half hour
fn create_booked(start_hour: u16, count: u16) -> Vec<TimeRange> {
    (0..count)
        .map(|i| {
            let start = start_hour * 60 + i * 60;
            TimeRange::new(t(start), t(start + 30))
        })
        .collect()
}

fn benchmark_generate_slots(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_slots");
    // A Monday
    let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

    group.bench_function("no_bookings", |b| {
        let windows = create_windows(8, 18, false);
        let booked: Vec<TimeRange> = Vec::new();
        b.iter(|| {
            generate_slots(
                black_box("svc"),
                black_box(30),
                black_box(date),
                black_box(&windows),
                black_box(&booked),
            )
        })
    });

    group.bench_function("many_bookings", |b| {
        let windows = create_windows(8, 18, false);
        let booked = create_booked(8, 10);
        b.iter(|| {
            generate_slots(
                black_box("svc"),
                black_box(30),
                black_box(date),
                black_box(&windows),
                black_box(&booked),
            )
        })
    });

    group.bench_function("split_day_long_duration", |b| {
        let windows = create_windows(6, 23, true);
        let booked = create_booked(6, 5);
        b.iter(|| {
            generate_slots(
                black_box("svc"),
                black_box(120),
                black_box(date),
                black_box(&windows),
                black_box(&booked),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_generate_slots);
criterion_main!(benches);
