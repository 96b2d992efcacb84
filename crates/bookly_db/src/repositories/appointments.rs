//! Repository for appointments

use crate::error::DbError;
use crate::rows::{appointment_from_row, collect, format_date, format_timestamp};
use crate::DbClient;
use bookly_common::{Appointment, AppointmentStatus, ServiceType};
use chrono::NaiveDate;
use sqlx::any::AnyRow;
use sqlx::{Any, Executor, Row};
use std::future::Future;
use std::str::FromStr;
use tracing::{debug, error, info};

const APPOINTMENT_COLUMNS: &str =
    "a.id, a.user_id, a.service_id, a.date, a.start_time, a.end_time, a.status, a.slot_id, a.created_at";

/// An appointment joined with the name and type of its service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentWithService {
    pub appointment: Appointment,
    pub service_name: String,
    pub service_type: ServiceType,
}

pub trait AppointmentRepository {
    fn find_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Appointment>, DbError>> + Send;

    /// `BOOKED` appointments of one service on one date
    fn booked_for_date(
        &self,
        service_id: &str,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Appointment>, DbError>> + Send;

    /// Every appointment of a user, any status, ordered by date then start time
    fn find_by_user(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<AppointmentWithService>, DbError>> + Send;

    /// `BOOKED` appointments on one date across all services of a provider,
    /// ordered by start time
    fn booked_for_provider(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Appointment>, DbError>> + Send;

    /// Flip a `BOOKED` appointment to `CANCELLED`.
    ///
    /// The status check and the write are one statement, so two concurrent
    /// cancellations cannot both succeed.
    ///
    /// # Returns
    ///
    /// `false` if the appointment was not in `BOOKED` state
    fn cancel(&self, id: &str) -> impl Future<Output = Result<bool, DbError>> + Send;
}

pub(crate) async fn fetch_booked<'e, E>(
    executor: E,
    service_id: &str,
    date: NaiveDate,
) -> Result<Vec<Appointment>, DbError>
where
    E: Executor<'e, Database = Any>,
{
    let query = format!(
        "SELECT {} FROM appointments a \
         WHERE a.service_id = $1 AND a.date = $2 AND a.status = $3 \
         ORDER BY a.start_time",
        APPOINTMENT_COLUMNS
    );

    let rows = sqlx::query(&query)
        .bind(service_id)
        .bind(format_date(date))
        .bind(AppointmentStatus::Booked.as_str())
        .fetch_all(executor)
        .await
        .map_err(|e| {
            error!("Failed to load booked appointments: {}", e);
            DbError::QueryError(e.to_string())
        })?;

    collect(&rows, appointment_from_row)
}

/// Inserts a new appointment. A hit on the booked-slot unique index becomes
/// `DbError::SlotTaken`.
pub(crate) async fn insert_appointment<'e, E>(
    executor: E,
    appointment: &Appointment,
) -> Result<(), DbError>
where
    E: Executor<'e, Database = Any>,
{
    let query = r#"
        INSERT INTO appointments (id, user_id, service_id, date, start_time, end_time, status, slot_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
    "#;

    sqlx::query(query)
        .bind(&appointment.id)
        .bind(&appointment.user_id)
        .bind(&appointment.service_id)
        .bind(format_date(appointment.date))
        .bind(appointment.start_time.to_string())
        .bind(appointment.end_time.to_string())
        .bind(appointment.status.as_str())
        .bind(&appointment.slot_id)
        .bind(format_timestamp(&appointment.created_at))
        .execute(executor)
        .await
        .map_err(|e| {
            let err = DbError::classify_write(e, &appointment.slot_id);
            if !matches!(err, DbError::SlotTaken(_)) {
                error!("Failed to insert appointment: {}", err);
            }
            err
        })?;
    Ok(())
}

fn with_service_from_row(row: &AnyRow) -> Result<AppointmentWithService, DbError> {
    let service_type: String = row
        .try_get("service_type")
        .map_err(|e| DbError::DecodeError(format!("column service_type: {}", e)))?;
    Ok(AppointmentWithService {
        appointment: appointment_from_row(row)?,
        service_name: row
            .try_get("service_name")
            .map_err(|e| DbError::DecodeError(format!("column service_name: {}", e)))?,
        service_type: ServiceType::from_str(&service_type)
            .map_err(|e| DbError::DecodeError(e.to_string()))?,
    })
}

/// SQL implementation of the appointment repository
#[derive(Debug, Clone)]
pub struct SqlAppointmentRepository {
    db_client: DbClient,
}

impl SqlAppointmentRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

impl AppointmentRepository for SqlAppointmentRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, DbError> {
        debug!("Finding appointment {}", id);

        let query = format!("SELECT {} FROM appointments a WHERE a.id = $1", APPOINTMENT_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find appointment {}: {}", id, e);
                DbError::QueryError(e.to_string())
            })?;

        row.as_ref().map(appointment_from_row).transpose()
    }

    async fn booked_for_date(
        &self,
        service_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, DbError> {
        debug!("Loading booked appointments of {} on {}", service_id, date);
        fetch_booked(self.db_client.pool(), service_id, date).await
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<AppointmentWithService>, DbError> {
        debug!("Loading appointments of user {}", user_id);

        let query = format!(
            "SELECT {}, s.name AS service_name, s.service_type AS service_type \
             FROM appointments a JOIN services s ON s.id = a.service_id \
             WHERE a.user_id = $1 \
             ORDER BY a.date, a.start_time, a.created_at",
            APPOINTMENT_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to load appointments of user {}: {}", user_id, e);
                DbError::QueryError(e.to_string())
            })?;

        collect(&rows, with_service_from_row)
    }

    async fn booked_for_provider(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, DbError> {
        debug!("Loading schedule of provider {} on {}", provider_id, date);

        let query = format!(
            "SELECT {} FROM appointments a JOIN services s ON s.id = a.service_id \
             WHERE s.provider_id = $1 AND a.date = $2 AND a.status = $3 \
             ORDER BY a.start_time, a.service_id",
            APPOINTMENT_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(provider_id)
            .bind(format_date(date))
            .bind(AppointmentStatus::Booked.as_str())
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to load provider schedule: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        collect(&rows, appointment_from_row)
    }

    async fn cancel(&self, id: &str) -> Result<bool, DbError> {
        let result = sqlx::query("UPDATE appointments SET status = $1 WHERE id = $2 AND status = $3")
            .bind(AppointmentStatus::Cancelled.as_str())
            .bind(id)
            .bind(AppointmentStatus::Booked.as_str())
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to cancel appointment {}: {}", id, e);
                DbError::QueryError(e.to_string())
            })?;

        let cancelled = result.rows_affected() == 1;
        if cancelled {
            info!("Appointment {} cancelled", id);
        }
        Ok(cancelled)
    }
}
