//! Repository for availability windows

use crate::error::DbError;
use crate::rows::{collect, window_from_row};
use crate::tx::{BookingTx, LockScope};
use crate::DbClient;
use bookly_common::AvailabilityWindow;
use sqlx::{Any, Executor};
use std::future::Future;
use tracing::{debug, error, info};

pub trait AvailabilityRepository {
    /// Windows of a service ordered by weekday, then start time
    fn list_for_service(
        &self,
        service_id: &str,
    ) -> impl Future<Output = Result<Vec<AvailabilityWindow>, DbError>> + Send;

    /// Swap the whole window set of a service in one transaction.
    ///
    /// The batch must already be validated; readers see either the old or the new set.
    fn replace_all(
        &self,
        service_id: &str,
        windows: &[AvailabilityWindow],
    ) -> impl Future<Output = Result<(), DbError>> + Send;
}

pub(crate) async fn fetch_windows<'e, E>(
    executor: E,
    service_id: &str,
) -> Result<Vec<AvailabilityWindow>, DbError>
where
    E: Executor<'e, Database = Any>,
{
    let query = r#"
        SELECT day_of_week, start_time, end_time
        FROM availability_windows
        WHERE service_id = $1
        ORDER BY day_of_week, start_time
    "#;

    let rows = sqlx::query(query)
        .bind(service_id)
        .fetch_all(executor)
        .await
        .map_err(|e| {
            error!("Failed to load availability of {}: {}", service_id, e);
            DbError::QueryError(e.to_string())
        })?;

    collect(&rows, window_from_row)
}

pub(crate) async fn insert_window<'e, E>(
    executor: E,
    service_id: &str,
    window: &AvailabilityWindow,
) -> Result<(), DbError>
where
    E: Executor<'e, Database = Any>,
{
    let query = r#"
        INSERT INTO availability_windows (id, service_id, day_of_week, start_time, end_time)
        VALUES ($1, $2, $3, $4, $5)
    "#;

    sqlx::query(query)
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(service_id)
        .bind(i64::from(window.day_of_week))
        .bind(window.start_time.to_string())
        .bind(window.end_time.to_string())
        .execute(executor)
        .await
        .map_err(|e| {
            error!("Failed to insert availability window: {}", e);
            DbError::QueryError(e.to_string())
        })?;
    Ok(())
}

pub(crate) async fn delete_windows<'e, E>(executor: E, service_id: &str) -> Result<u64, DbError>
where
    E: Executor<'e, Database = Any>,
{
    sqlx::query("DELETE FROM availability_windows WHERE service_id = $1")
        .bind(service_id)
        .execute(executor)
        .await
        .map(|r| r.rows_affected())
        .map_err(|e| {
            error!("Failed to delete availability of {}: {}", service_id, e);
            DbError::QueryError(e.to_string())
        })
}

/// SQL implementation of the availability repository
#[derive(Debug, Clone)]
pub struct SqlAvailabilityRepository {
    db_client: DbClient,
}

impl SqlAvailabilityRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

impl AvailabilityRepository for SqlAvailabilityRepository {
    async fn list_for_service(&self, service_id: &str) -> Result<Vec<AvailabilityWindow>, DbError> {
        debug!("Listing availability of service {}", service_id);
        fetch_windows(self.db_client.pool(), service_id).await
    }

    async fn replace_all(
        &self,
        service_id: &str,
        windows: &[AvailabilityWindow],
    ) -> Result<(), DbError> {
        let mut tx = BookingTx::begin(&self.db_client, LockScope::availability(service_id)).await?;

        let removed = tx.delete_windows(service_id).await?;
        for window in windows {
            tx.insert_window(service_id, window).await?;
        }
        tx.commit().await?;

        info!(
            "Replaced availability of service {}: {} windows removed, {} inserted",
            service_id,
            removed,
            windows.len()
        );
        Ok(())
    }
}
