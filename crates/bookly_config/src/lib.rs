//! Configuration for the Bookly services.
//!
//! Configuration is layered: `config/default.*`, then `config/{RUN_ENV}.*`, then
//! environment variables prefixed with `PREFIX` (default `BOOKLY`) using `__` as the
//! nesting separator, e.g. `BOOKLY__SERVER__PORT=8080`.

use chrono_tz::Tz;
use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

pub mod models;
pub use models::*;

/// Marker value replaced by the matching environment variable after loading.
pub const SECRET_MARKER: &str = "secret_from_env";

/// Loads the application configuration from the default locations.
///
/// The configuration directory defaults to `./config` and can be moved with
/// `BOOKLY_CONFIG_DIR`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let config_dir = env::var("BOOKLY_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "BOOKLY".to_string());

    load_config_from(&config_dir, &run_env, &prefix)
}

/// Loads the configuration from an explicit directory, run environment and env prefix.
pub fn load_config_from(
    config_dir: &Path,
    run_env: &str,
    prefix: &str,
) -> Result<AppConfig, ConfigError> {
    let default_path = config_dir.join("default");
    let env_path = config_dir.join(run_env);

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(Environment::with_prefix(prefix).separator("__"));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    let config = apply_env_overrides_from_marker(raw_config)?;
    validate(&config)?;
    Ok(config)
}

/// Checks the values serde cannot check on its own.
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    config
        .scheduling
        .time_zone
        .parse::<Tz>()
        .map_err(|err| {
            ConfigError::Message(format!(
                "scheduling.time_zone '{}' is not a valid IANA zone: {err}",
                config.scheduling.time_zone
            ))
        })?;

    if config.scheduling.allowed_durations.is_empty() {
        return Err(ConfigError::Message(
            "scheduling.allowed_durations must not be empty".to_string(),
        ));
    }
    if let Some(bad) = config
        .scheduling
        .allowed_durations
        .iter()
        .find(|d| !(30..=120).contains(*d) || *d % 30 != 0)
    {
        return Err(ConfigError::Message(format!(
            "scheduling.allowed_durations contains {bad}; durations must be multiples of 30 between 30 and 120"
        )));
    }

    if let Some(db) = &config.database {
        if db.url.is_empty() {
            return Err(ConfigError::Message("database.url must not be empty".to_string()));
        }
    }
    Ok(())
}

/// Recursively replaces all "secret_from_env" string values with environment variable values.
///
/// The variable name is the config path joined with `_` and upper-cased, so
/// `database.url` is read from `DATABASE_URL`.
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let env_key = path.join("_").to_uppercase();
                if let Ok(env_val) = env::var(&env_key) {
                    *obj = Value::String(env_val);
                } else {
                    warn!("env var {} not found for {}", env_key, SECRET_MARKER);
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

/// Applies environment overrides based on "secret_from_env" markers in the loaded config.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    inject_env_secrets(&mut json);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to rebuild config: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment, once.
///
/// The file defaults to `.env` and can be overridden with `DOTENV_OVERRIDE`.
/// Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn defaults_apply_when_no_files_exist() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path(), "debug", "BOOKLY_TEST_EMPTY").unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.scheduling.time_zone, "UTC");
        assert_eq!(config.scheduling.allowed_durations, vec![30, 60, 90, 120]);
        assert!(config.database.is_none());
    }

    #[test]
    fn run_env_file_overrides_default_file() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "default.toml",
            r#"
[server]
host = "0.0.0.0"
port = 8080

[database]
url = "sqlite:data/bookly.db"
"#,
        );
        write(
            dir.path(),
            "prod.toml",
            r#"
[server]
host = "0.0.0.0"
port = 9090

[scheduling]
time_zone = "Europe/Zurich"
"#,
        );

        let config = load_config_from(dir.path(), "prod", "BOOKLY_TEST_LAYER").unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.scheduling.time_zone, "Europe/Zurich");
        assert_eq!(config.database.unwrap().url, "sqlite:data/bookly.db");
    }

    #[test]
    fn invalid_time_zone_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "default.toml",
            "[scheduling]\ntime_zone = \"Mars/Olympus\"\n",
        );
        let err = load_config_from(dir.path(), "debug", "BOOKLY_TEST_TZ").unwrap_err();
        assert!(err.to_string().contains("time_zone"));
    }

    #[test]
    fn durations_outside_the_half_hour_grid_are_rejected() {
        let mut config = AppConfig::default();
        config.scheduling.allowed_durations = vec![30, 45];
        assert!(validate(&config).is_err());

        config.scheduling.allowed_durations = vec![150];
        assert!(validate(&config).is_err());

        config.scheduling.allowed_durations = vec![60, 120];
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn secret_marker_is_replaced_from_environment() {
        env::set_var("DATABASE_URL", "sqlite:from-env.db");
        let config = AppConfig {
            database: Some(DatabaseConfig {
                url: SECRET_MARKER.to_string(),
                max_connections: None,
            }),
            ..AppConfig::default()
        };

        let config = apply_env_overrides_from_marker(config).unwrap();
        assert_eq!(config.database.unwrap().url, "sqlite:from-env.db");
    }
}
