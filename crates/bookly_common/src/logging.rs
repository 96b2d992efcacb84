//! Logging utilities for the Bookly services.
//!
//! Every crate logs through the `tracing` macros; this module owns subscriber
//! setup so the binary and the test suites configure output the same way.

use std::str::FromStr;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO.
///
/// ```
/// use bookly_common::logging;
///
/// logging::init();
/// logging::init_with_level(tracing::Level::DEBUG); // no-op, already initialised
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level for the `bookly` crates.
///
/// `RUST_LOG` directives are honoured on top of the given level. Calling this
/// more than once is harmless.
pub fn init_with_level(level: Level) {
    let mut filter = EnvFilter::from_default_env();
    for target in [
        "bookly_backend",
        "bookly_booking",
        "bookly_db",
        "bookly_slots",
        "bookly_common",
    ] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Initialize from a textual level such as `"debug"`, falling back to INFO.
pub fn init_from_str(level: &str) {
    init_with_level(Level::from_str(level).unwrap_or(Level::INFO));
}

/// Log an error with context at the ERROR level.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}
