//! # Enquiry Configuration
//!
//! Layered configuration loaded with the `config` crate, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `config/enquiry.toml` (optional)
//! 3. `config/enquiry.<environment>.toml` (optional)
//! 4. `ENQUIRY__<SECTION>__<KEY>` environment variables, e.g. `ENQUIRY__DATABASE__HOST`
//!
//! The environment name comes from `ENQUIRY_ENV`, then `APP_ENV`, defaulting to
//! `development`.
//!
//! Connection credentials are usually kept in a secret store as a JSON document;
//! [`StoredConnectionDetails`] parses that document and
//! [`DatabaseConfig::apply_connection_details`] overlays it.

use crate::error::{EnquiryError, EnquiryResult};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

const SENSITIVE_KEYS: [&str; 5] = ["password", "secret", "token", "credential", "url"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnquiryConfig {
    pub environment: String,
    pub api: ApiConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Version reported to callers of the outer API
    pub version: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Schema / database name
    pub database: String,
    /// Full connection URL; takes precedence over the discrete fields
    #[serde(default)]
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[MASKED]")
            .field("database", &self.database)
            .field("url", &self.url.as_ref().map(|_| "[MASKED]"))
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout_seconds", &self.acquire_timeout_seconds)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            username: "enquiry".to_string(),
            password: String::new(),
            database: "vehicle_enquiry".to_string(),
            url: None,
            max_connections: 10,
            min_connections: 0,
            acquire_timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> EnquiryResult<()> {
        if self.url.is_none() {
            if self.host.trim().is_empty() {
                return Err(invalid("database.host must not be empty"));
            }
            if self.database.trim().is_empty() {
                return Err(invalid("database.database must not be empty"));
            }
        }
        if self.max_connections == 0 {
            return Err(invalid("database.max_connections must be at least 1"));
        }
        if self.min_connections > self.max_connections {
            return Err(invalid(format!(
                "database.min_connections ({}) exceeds max_connections ({})",
                self.min_connections, self.max_connections
            )));
        }
        if self.acquire_timeout_seconds == 0 {
            return Err(invalid("database.acquire_timeout_seconds must be positive"));
        }
        Ok(())
    }

    /// Connection options for the pool; an explicit `url` wins over discrete fields
    pub fn connect_options(&self) -> EnquiryResult<PgConnectOptions> {
        if let Some(url) = &self.url {
            return url
                .parse::<PgConnectOptions>()
                .map_err(|e| invalid(format!("database.url is not a valid connection URL: {e}")));
        }

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database))
    }

    /// Overlay credentials read from the secret store. The schema name stays
    /// as configured.
    pub fn apply_connection_details(&mut self, details: &StoredConnectionDetails) {
        self.host = details.host.clone();
        self.port = details.port;
        self.username = details.username.clone();
        self.password = details.password.clone();
        self.url = None;
    }
}

/// Connection details as stored in the secret store.
#[derive(Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConnectionDetails {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub engine: Option<String>,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub dbname: Option<String>,
    #[serde(default)]
    pub db_cluster_identifier: Option<String>,
}

impl fmt::Debug for StoredConnectionDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredConnectionDetails")
            .field("username", &self.username)
            .field("password", &"[MASKED]")
            .field("engine", &self.engine)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("db_cluster_identifier", &self.db_cluster_identifier)
            .finish()
    }
}

impl StoredConnectionDetails {
    pub fn from_secret_str(secret: &str) -> EnquiryResult<Self> {
        serde_json::from_str(secret)
            .map_err(|e| invalid(format!("stored connection details are malformed: {e}")))
    }
}

impl Default for EnquiryConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            api: ApiConfig {
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            database: DatabaseConfig::default(),
        }
    }
}

impl EnquiryConfig {
    /// Load from `./config` for the detected environment
    pub fn load() -> EnquiryResult<Self> {
        Self::load_from(Path::new("config"), &detect_environment())
    }

    /// Load from an explicit directory and environment
    pub fn load_from(config_dir: &Path, environment: &str) -> EnquiryResult<Self> {
        let defaults = Self::default();
        let database = &defaults.database;

        debug!(
            environment = %environment,
            config_dir = %config_dir.display(),
            "Loading enquiry configuration"
        );

        let settings = Config::builder()
            .set_default("environment", environment)?
            .set_default("api.version", defaults.api.version.as_str())?
            .set_default("database.host", database.host.as_str())?
            .set_default("database.port", i64::from(database.port))?
            .set_default("database.username", database.username.as_str())?
            .set_default("database.password", database.password.as_str())?
            .set_default("database.database", database.database.as_str())?
            .set_default("database.max_connections", i64::from(database.max_connections))?
            .set_default("database.min_connections", i64::from(database.min_connections))?
            .set_default(
                "database.acquire_timeout_seconds",
                database.acquire_timeout_seconds as i64,
            )?
            .add_source(config_file(config_dir, None))
            .add_source(config_file(config_dir, Some(environment)))
            .add_source(
                Environment::with_prefix("ENQUIRY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: EnquiryConfig = settings.try_deserialize()?;
        config.validate()?;

        debug!(config = %config.sanitized(), "Enquiry configuration loaded");

        Ok(config)
    }

    pub fn validate(&self) -> EnquiryResult<()> {
        if self.environment.trim().is_empty() {
            return Err(invalid("environment must not be empty"));
        }
        self.database.validate()
    }

    /// JSON view with credentials masked, safe to log
    pub fn sanitized(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        mask_sensitive(&mut value);
        value
    }
}

/// `ENQUIRY_ENV`, then `APP_ENV`, defaulting to `development`
pub fn detect_environment() -> String {
    env::var("ENQUIRY_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
        .to_lowercase()
}

fn config_file(
    config_dir: &Path,
    environment: Option<&str>,
) -> impl config::Source + Send + Sync + 'static {
    let path: PathBuf = match environment {
        Some(environment) => config_dir.join(format!("enquiry.{environment}.toml")),
        None => config_dir.join("enquiry.toml"),
    };
    File::from(path).format(FileFormat::Toml).required(false)
}

fn invalid(message: impl Into<String>) -> EnquiryError {
    EnquiryError::Configuration(message.into())
}

fn mask_sensitive(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                let key = key.to_lowercase();
                if SENSITIVE_KEYS.iter().any(|pattern| key.contains(pattern)) {
                    if !val.is_null() {
                        *val = serde_json::Value::String("[MASKED]".to_string());
                    }
                } else {
                    mask_sensitive(val);
                }
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(mask_sensitive),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = EnquiryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.port, 5432);
    }

    #[test]
    fn rejects_inverted_pool_bounds() {
        let mut database = DatabaseConfig::default();
        database.min_connections = 20;

        let error = database.validate().unwrap_err();
        assert!(matches!(error, EnquiryError::Configuration(_)));
        assert!(error.to_string().contains("min_connections"));
    }

    #[test]
    fn explicit_url_skips_discrete_field_checks() {
        let database = DatabaseConfig {
            host: String::new(),
            url: Some("postgresql://enquiry:pw@db.internal:5433/vehicles".to_string()),
            ..DatabaseConfig::default()
        };

        assert!(database.validate().is_ok());
        assert!(database.connect_options().is_ok());
    }

    #[test]
    fn malformed_url_is_a_configuration_error() {
        let database = DatabaseConfig {
            url: Some("not a url".to_string()),
            ..DatabaseConfig::default()
        };
        assert!(matches!(
            database.connect_options(),
            Err(EnquiryError::Configuration(_))
        ));
    }

    #[test]
    fn secret_overlays_credentials_but_keeps_schema() {
        let secret = r#"{
            "username": "reader",
            "password": "s3cr3t-value",
            "engine": "postgres",
            "host": "cluster.internal",
            "port": 6432,
            "dbname": "ignored",
            "dbClusterIdentifier": "enquiry-cluster"
        }"#;

        let details = StoredConnectionDetails::from_secret_str(secret).unwrap();
        assert_eq!(details.db_cluster_identifier.as_deref(), Some("enquiry-cluster"));
        assert!(!format!("{details:?}").contains("s3cr3t-value"));

        let mut database = DatabaseConfig {
            url: Some("postgresql://old".to_string()),
            ..DatabaseConfig::default()
        };
        database.apply_connection_details(&details);

        assert_eq!(database.host, "cluster.internal");
        assert_eq!(database.port, 6432);
        assert_eq!(database.username, "reader");
        assert_eq!(database.database, "vehicle_enquiry");
        assert_eq!(database.url, None);
    }

    #[test]
    fn malformed_secret_is_a_configuration_error() {
        let error = StoredConnectionDetails::from_secret_str("{\"username\": 1}").unwrap_err();
        assert!(matches!(error, EnquiryError::Configuration(_)));
    }

    #[test]
    fn sanitized_view_masks_credentials() {
        let mut config = EnquiryConfig::default();
        config.database.password = "hunter2".to_string();
        config.database.url = Some("postgresql://u:hunter2@h/db".to_string());

        let rendered = config.sanitized().to_string();
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[MASKED]"));
        assert!(rendered.contains("localhost"));
        assert!(!format!("{:?}", config.database).contains("hunter2"));
    }
}
