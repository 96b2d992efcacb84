//! Table definitions.
//!
//! Columns are kept to TEXT and BIGINT so that every value decodes through the
//! Any driver on both SQLite and Postgres. Dates are `YYYY-MM-DD`, times `HH:MM`
//! and timestamps fixed-width RFC 3339, so text order is chronological order.

use crate::client::DbClient;
use crate::error::DbError;
use tracing::{debug, info};

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS services (
        id TEXT PRIMARY KEY,
        provider_id TEXT NOT NULL,
        name TEXT NOT NULL,
        service_type TEXT NOT NULL,
        duration_minutes BIGINT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS services_provider ON services (provider_id)",
    r#"
    CREATE TABLE IF NOT EXISTS availability_windows (
        id TEXT PRIMARY KEY,
        service_id TEXT NOT NULL REFERENCES services (id),
        day_of_week BIGINT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS availability_windows_service ON availability_windows (service_id, day_of_week)",
    r#"
    CREATE TABLE IF NOT EXISTS appointments (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        service_id TEXT NOT NULL REFERENCES services (id),
        date TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        status TEXT NOT NULL,
        slot_id TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    // At most one BOOKED appointment per (service, date, start).
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS appointments_booked_slot
        ON appointments (service_id, date, start_time)
        WHERE status = 'BOOKED'
    "#,
    "CREATE INDEX IF NOT EXISTS appointments_user ON appointments (user_id)",
    r#"
    CREATE TABLE IF NOT EXISTS slot_locks (
        scope TEXT PRIMARY KEY,
        version BIGINT NOT NULL
    )
    "#,
];

/// Creates every table and index if missing. Safe to run on each start.
pub async fn init_schema(db_client: &DbClient) -> Result<(), DbError> {
    debug!("Initializing Bookly schema on {}", db_client);

    for statement in STATEMENTS {
        db_client.execute(statement).await?;
    }

    info!("Bookly schema initialized successfully");
    Ok(())
}
