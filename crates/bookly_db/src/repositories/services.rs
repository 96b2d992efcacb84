//! Repository for services

use crate::error::DbError;
use crate::rows::{collect, format_timestamp, service_from_row};
use crate::DbClient;
use bookly_common::{Service, ServiceType};
use sqlx::{Any, Executor};
use std::future::Future;
use tracing::{debug, error, info};

const SERVICE_COLUMNS: &str = "id, provider_id, name, service_type, duration_minutes, created_at";

/// Storage of services.
///
/// The duration is stored as given; callers validate it before writing.
pub trait ServiceRepository {
    /// Store a new service
    fn create(&self, service: Service) -> impl Future<Output = Result<Service, DbError>> + Send;

    /// Overwrite name, type and duration of an existing service
    ///
    /// # Returns
    ///
    /// `false` if no service with that id exists
    fn update(&self, service: &Service) -> impl Future<Output = Result<bool, DbError>> + Send;

    fn find_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Service>, DbError>> + Send;

    /// All services, optionally of one type, ordered by name
    fn list(
        &self,
        service_type: Option<ServiceType>,
    ) -> impl Future<Output = Result<Vec<Service>, DbError>> + Send;

    /// Services owned by one provider, newest first
    fn list_by_provider(
        &self,
        provider_id: &str,
    ) -> impl Future<Output = Result<Vec<Service>, DbError>> + Send;
}

/// Loads one service on any executor (pool or open transaction).
pub(crate) async fn fetch_service<'e, E>(executor: E, id: &str) -> Result<Option<Service>, DbError>
where
    E: Executor<'e, Database = Any>,
{
    let query = format!("SELECT {} FROM services WHERE id = $1", SERVICE_COLUMNS);
    let row = sqlx::query(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            error!("Failed to find service {}: {}", id, e);
            DbError::QueryError(e.to_string())
        })?;

    row.as_ref().map(service_from_row).transpose()
}

/// SQL implementation of the service repository
#[derive(Debug, Clone)]
pub struct SqlServiceRepository {
    db_client: DbClient,
}

impl SqlServiceRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

impl ServiceRepository for SqlServiceRepository {
    async fn create(&self, service: Service) -> Result<Service, DbError> {
        debug!("Creating service {} for provider {}", service.id, service.provider_id);

        let query = r#"
            INSERT INTO services (id, provider_id, name, service_type, duration_minutes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
        "#;

        sqlx::query(query)
            .bind(&service.id)
            .bind(&service.provider_id)
            .bind(&service.name)
            .bind(service.service_type.as_str())
            .bind(service.duration_minutes)
            .bind(format_timestamp(&service.created_at))
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to insert service: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        info!("Service {} created", service.id);
        Ok(service)
    }

    async fn update(&self, service: &Service) -> Result<bool, DbError> {
        debug!("Updating service {}", service.id);

        let query = r#"
            UPDATE services
            SET name = $1, service_type = $2, duration_minutes = $3
            WHERE id = $4
        "#;

        let result = sqlx::query(query)
            .bind(&service.name)
            .bind(service.service_type.as_str())
            .bind(service.duration_minutes)
            .bind(&service.id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to update service {}: {}", service.id, e);
                DbError::QueryError(e.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Service>, DbError> {
        debug!("Finding service {}", id);
        fetch_service(self.db_client.pool(), id).await
    }

    async fn list(&self, service_type: Option<ServiceType>) -> Result<Vec<Service>, DbError> {
        debug!("Listing services (type filter: {:?})", service_type);

        let rows = match service_type {
            Some(service_type) => {
                let query = format!(
                    "SELECT {} FROM services WHERE service_type = $1 ORDER BY name, id",
                    SERVICE_COLUMNS
                );
                sqlx::query(&query)
                    .bind(service_type.as_str())
                    .fetch_all(self.db_client.pool())
                    .await
            }
            None => {
                let query = format!("SELECT {} FROM services ORDER BY name, id", SERVICE_COLUMNS);
                sqlx::query(&query).fetch_all(self.db_client.pool()).await
            }
        }
        .map_err(|e| {
            error!("Failed to list services: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        collect(&rows, service_from_row)
    }

    async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<Service>, DbError> {
        debug!("Listing services of provider {}", provider_id);

        let query = format!(
            "SELECT {} FROM services WHERE provider_id = $1 ORDER BY created_at DESC, id",
            SERVICE_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(provider_id)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to list provider services: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        collect(&rows, service_from_row)
    }
}
