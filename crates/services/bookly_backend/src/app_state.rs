// --- File: crates/services/bookly_backend/src/app_state.rs ---
use bookly_booking::{BookingService, BookingState};
use bookly_common::{BooklyError, Clock, SystemClock};
use bookly_config::AppConfig;
use bookly_db::DbClientFactory;
use std::sync::Arc;
use tracing::info;

/// Application state that is shared across all routes.
///
/// Built once at startup: the database is connected and migrated, and the
/// clock is pinned to the configured scheduling time zone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub booking: Arc<BookingState>,
}

impl AppState {
    pub async fn new(config: Arc<AppConfig>) -> Result<Self, BooklyError> {
        let db = DbClientFactory::new().connect_and_migrate(&config).await?;
        info!("Database ready: {}", db);

        let clock: Arc<dyn Clock> =
            Arc::new(SystemClock::from_zone_name(&config.scheduling.time_zone)?);
        let service = BookingService::new(
            db,
            clock,
            config.scheduling.allowed_durations.clone(),
        );

        Ok(Self {
            booking: Arc::new(BookingState { service }),
            config,
        })
    }
}
