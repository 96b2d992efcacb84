//! Database integration for Bookly
//!
//! Persistence for services, availability windows and appointments on top of
//! SQLx's Any driver. SQLite is the default backend, Postgres is available through
//! the `postgres` feature.
//!
//! # Example
//!
//! ```rust,no_run
//! use bookly_config::AppConfig;
//! use bookly_db::{DbClient, DbClientFactory};
//! use std::sync::Arc;
//!
//! async fn setup_db(config: AppConfig) -> Result<DbClient, Box<dyn std::error::Error>> {
//!     let db_client = DbClientFactory::new()
//!         .connect_and_migrate(&Arc::new(config))
//!         .await?;
//!     Ok(db_client)
//! }
//! ```

pub mod client;
pub mod error;
pub mod factory;
pub mod repositories;
mod rows;
pub mod schema;
pub mod tx;

pub use client::{DbBackend, DbClient, DbTransaction};
pub use error::DbError;
pub use factory::DbClientFactory;
pub use repositories::{
    AppointmentRepository, AppointmentWithService, AvailabilityRepository, ServiceRepository,
    SqlAppointmentRepository, SqlAvailabilityRepository, SqlServiceRepository,
};
pub use schema::init_schema;
pub use tx::{BookingTx, LockScope};
