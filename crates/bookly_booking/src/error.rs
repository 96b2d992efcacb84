// --- File: crates/bookly_booking/src/error.rs ---
use bookly_common::{log_error, BooklyError};
use bookly_db::DbError;
use bookly_slots::{AvailabilityError, SlotIdError};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Malformed slot id: {0}")]
    MalformedSlotId(#[from] SlotIdError),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    #[error("Appointment not found: {0}")]
    NotFound(String),

    #[error("Service provider cannot book their own service")]
    SelfBookingForbidden,

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid service duration: {0} minutes")]
    InvalidServiceDuration(i64),

    #[error("Cannot book past dates: {0} {1}")]
    PastDateTime(NaiveDate, String),

    #[error("Cannot query past dates: {0}")]
    PastDate(NaiveDate),

    #[error("Slot not available: {0}")]
    SlotUnavailable(String),

    #[error("Slot already booked: {0}")]
    SlotAlreadyBooked(String),

    #[error("Appointment already cancelled: {0}")]
    AlreadyCancelled(String),

    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error("Storage failure: {0}")]
    Storage(DbError),
}

impl From<DbError> for BookingError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::SlotTaken(slot_id) => BookingError::SlotAlreadyBooked(slot_id),
            other => BookingError::Storage(other),
        }
    }
}

impl From<BookingError> for BooklyError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::MalformedSlotId(_)
            | BookingError::InvalidInput(_)
            | BookingError::InvalidServiceDuration(_)
            | BookingError::PastDateTime(..)
            | BookingError::PastDate(_) => BooklyError::InvalidInput(err.to_string()),
            BookingError::ServiceNotFound(_) | BookingError::NotFound(_) => {
                BooklyError::NotFound(err.to_string())
            }
            BookingError::SelfBookingForbidden | BookingError::Forbidden(_) => {
                BooklyError::Forbidden(err.to_string())
            }
            BookingError::SlotUnavailable(_)
            | BookingError::SlotAlreadyBooked(_)
            | BookingError::AlreadyCancelled(_) => BooklyError::Conflict(err.to_string()),
            BookingError::Availability(inner) => inner.into(),
            BookingError::Storage(inner) => {
                log_error(&inner, "Storage failure");
                inner.into()
            }
        }
    }
}
