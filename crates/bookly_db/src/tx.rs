//! Locked write transactions.
//!
//! Every check-then-write sequence runs inside a [`BookingTx`]. Its first
//! statement upserts the row of a lock scope in `slot_locks`, so competing
//! writers for the same scope queue up on that row (Postgres) or on the database
//! write lock (SQLite) before anything is read. On Postgres the transaction also
//! runs SERIALIZABLE. The unique index on booked slots stays the last line of
//! defence and surfaces as [`DbError::SlotTaken`].

use crate::client::{DbBackend, DbClient, DbTransaction};
use crate::error::DbError;
use crate::repositories::{appointments, availability, services};
use crate::rows::format_date;
use bookly_common::{Appointment, AvailabilityWindow, Service};
use chrono::NaiveDate;
use std::fmt;
use tracing::{debug, error};

/// What a transaction locks: one service on one date, or one service's availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockScope(String);

impl LockScope {
    pub fn slot_date(service_id: &str, date: NaiveDate) -> Self {
        Self(format!("{}:{}", service_id, format_date(date)))
    }

    pub fn availability(service_id: &str) -> Self {
        Self(format!("{}:availability", service_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct BookingTx<'c> {
    tx: DbTransaction<'c>,
    scope: LockScope,
}

impl<'c> BookingTx<'c> {
    /// Begins a transaction and takes the lock for `scope`.
    pub async fn begin(db_client: &'c DbClient, scope: LockScope) -> Result<Self, DbError> {
        let mut tx = db_client.begin().await?;

        if db_client.backend() == DbBackend::Postgres {
            sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
                .execute(&mut *tx)
                .await
                .map_err(|e| DbError::TransactionError(e.to_string()))?;
        }

        sqlx::query(
            "INSERT INTO slot_locks (scope, version) VALUES ($1, 1) \
             ON CONFLICT (scope) DO UPDATE SET version = slot_locks.version + 1",
        )
        .bind(scope.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::classify_write(e, scope.as_str()))?;

        debug!("Lock taken for scope {}", scope);
        Ok(Self { tx, scope })
    }

    pub async fn service(&mut self, service_id: &str) -> Result<Option<Service>, DbError> {
        services::fetch_service(&mut *self.tx, service_id).await
    }

    /// Windows of the service as of now, ordered by weekday then start time.
    pub async fn windows(&mut self, service_id: &str) -> Result<Vec<AvailabilityWindow>, DbError> {
        availability::fetch_windows(&mut *self.tx, service_id).await
    }

    /// `BOOKED` appointments of the service on `date` as of now.
    pub async fn booked_on(
        &mut self,
        service_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, DbError> {
        appointments::fetch_booked(&mut *self.tx, service_id, date).await
    }

    pub async fn insert_appointment(&mut self, appointment: &Appointment) -> Result<(), DbError> {
        appointments::insert_appointment(&mut *self.tx, appointment).await
    }

    pub async fn insert_window(
        &mut self,
        service_id: &str,
        window: &AvailabilityWindow,
    ) -> Result<(), DbError> {
        availability::insert_window(&mut *self.tx, service_id, window).await
    }

    pub async fn delete_windows(&mut self, service_id: &str) -> Result<u64, DbError> {
        availability::delete_windows(&mut *self.tx, service_id).await
    }

    /// Commits. A deferred constraint or serialization failure is classified
    /// like a failed write.
    pub async fn commit(self) -> Result<(), DbError> {
        let scope = self.scope;
        self.tx.commit().await.map_err(|e| {
            let err = DbError::classify_write(e, scope.as_str());
            if !matches!(err, DbError::SlotTaken(_) | DbError::SerializationFailure(_)) {
                error!("Failed to commit transaction for {}: {}", scope, err);
            }
            err
        })
    }

    pub async fn rollback(self) -> Result<(), DbError> {
        debug!("Rolling back transaction for {}", self.scope);
        self.tx
            .rollback()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))
    }
}
