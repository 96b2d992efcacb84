// --- File: crates/bookly_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Bookly errors.
///
/// Every domain error converts into one of these kinds, and each kind maps to a
/// distinct outward status so a client can tell "fix the input" (`InvalidInput`,
/// `Conflict`) from "do not retry" (`Forbidden`, `NotFound`) from "retry later"
/// (`Internal`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BooklyError {
    /// Malformed slot id, date, time, duration, or a missing required field
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No caller identity was supplied by the authentication layer
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Role or ownership mismatch
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Service, appointment or owner does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Overlapping windows, slot taken, appointment already cancelled
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unexpected storage or invariant failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BooklyError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            BooklyError::InvalidInput(_) => "INVALID_INPUT",
            BooklyError::Unauthorized(_) => "UNAUTHORIZED",
            BooklyError::Forbidden(_) => "FORBIDDEN",
            BooklyError::NotFound(_) => "NOT_FOUND",
            BooklyError::Conflict(_) => "CONFLICT",
            BooklyError::Internal(_) => "INTERNAL",
        }
    }
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for BooklyError {
    fn status_code(&self) -> u16 {
        match self {
            BooklyError::InvalidInput(_) => 400,
            BooklyError::Unauthorized(_) => 401,
            BooklyError::Forbidden(_) => 403,
            BooklyError::NotFound(_) => 404,
            BooklyError::Conflict(_) => 409,
            BooklyError::Internal(_) => 500,
        }
    }
}

impl From<serde_json::Error> for BooklyError {
    fn from(err: serde_json::Error) -> Self {
        BooklyError::InvalidInput(err.to_string())
    }
}

impl From<crate::time::TimeParseError> for BooklyError {
    fn from(err: crate::time::TimeParseError) -> Self {
        BooklyError::InvalidInput(err.to_string())
    }
}

// Utility functions for error handling
pub fn invalid_input<T: fmt::Display>(message: T) -> BooklyError {
    BooklyError::InvalidInput(message.to_string())
}

pub fn forbidden<T: fmt::Display>(message: T) -> BooklyError {
    BooklyError::Forbidden(message.to_string())
}
