//! Repository modules for database access
//!
//! One trait per entity plus its SQL implementation. Reads that must also run
//! inside a locked transaction are shared with [`crate::tx`] as executor-generic
//! functions.

pub mod appointments;
pub mod availability;
pub mod services;

pub use appointments::{AppointmentRepository, AppointmentWithService, SqlAppointmentRepository};
pub use availability::{AvailabilityRepository, SqlAvailabilityRepository};
pub use services::{ServiceRepository, SqlServiceRepository};
