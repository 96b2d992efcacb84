// --- File: crates/bookly_booking/src/lib.rs ---
// Declare modules within this crate
pub mod error;
pub mod handlers;
pub mod logic;
pub mod models;
pub mod routes;

pub use error::BookingError;
pub use handlers::BookingState;
pub use logic::BookingService;
