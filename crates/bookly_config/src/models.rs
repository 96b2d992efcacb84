// --- File: crates/bookly_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

// --- Database Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. sqlite:data/bookly.db, or "secret_from_env" to read DATABASE_URL
    #[serde(default)]
    pub max_connections: Option<u32>,
}

// --- Scheduling Config ---
/// The single implicit timezone and the booking rules shared by every service.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulingConfig {
    /// IANA zone used to read "now" for past date/time checks.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Service durations (minutes) a provider may choose from.
    #[serde(default = "default_allowed_durations")]
    pub allowed_durations: Vec<i64>,
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_allowed_durations() -> Vec<i64> {
    vec![30, 60, 90, 120]
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            allowed_durations: default_allowed_durations(),
        }
    }
}

// --- Logging Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    #[serde(default)]
    pub scheduling: SchedulingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}
