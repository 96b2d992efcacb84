// --- File: crates/bookly_common/src/lib.rs ---

// Declare modules within this crate
pub mod clock; // Injected "current time" capability
pub mod error; // Error taxonomy
pub mod http; // Error to HTTP response mapping
pub mod identity; // Caller identity handed over by the auth layer
pub mod logging; // Logging utilities
pub mod models; // Domain entities shared by engine, storage and API
pub mod time; // Calendar date and time-of-day value types

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{forbidden, invalid_input, BooklyError, HttpStatusCode};
pub use http::handle_json_result;
pub use identity::Identity;
pub use logging::{init, init_with_level, log_error};
pub use models::{
    Appointment, AppointmentStatus, AvailabilityWindow, Role, Service, ServiceType,
};
pub use time::{parse_date, weekday_index, TimeOfDay, TimeParseError};
