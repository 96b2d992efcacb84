use bookly_common::{Appointment, TimeOfDay};

/// A half-open `[start, end)` interval within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeRange {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Half-open overlap: touching intervals (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// `other` lies fully inside `self`.
    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl From<&Appointment> for TimeRange {
    fn from(appointment: &Appointment) -> Self {
        Self::new(appointment.start_time, appointment.end_time)
    }
}
