// --- File: crates/bookly_slots/src/lib.rs ---
//! The slot engine: recurring weekly availability, slot derivation for one date,
//! and re-validation of a single candidate slot at booking time.
//!
//! Everything here is pure and synchronous. Storage, transactions and the clock
//! are the caller's business.

pub mod availability;
pub mod generator;
#[cfg(test)]
mod generator_proptest;
#[cfg(test)]
mod generator_test;
pub mod range;
pub mod slot_id;
pub mod validator;

pub use availability::{windows_overlap, AvailabilityError, WeeklyAvailability};
pub use generator::{generate_slots, Slot};
pub use range::TimeRange;
pub use slot_id::{SlotId, SlotIdError};
pub use validator::{is_slot_available, is_valid_duration, slot_end_time, starts_at_or_before};
