use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::storage::{PostgresConfig, StorageConfig, StorageType};

/// Conventional environment variables and the keys they override
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("DATABASE_URL", "database.url"),
    ("TEAMSERVER_DB_HOST", "database.host"),
    ("TEAMSERVER_DB_PORT", "database.port"),
    ("TEAMSERVER_DB_USER", "database.user"),
    ("TEAMSERVER_PASSWORD", "database.password"),
    ("TEAMSERVER_DB_NAME", "database.name"),
];

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub workflow: WorkflowConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `postgres` or `memory`
    pub backend: String,
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub name: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4747,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let postgres = PostgresConfig::default();

        Self {
            backend: "postgres".to_string(),
            url: postgres.url,
            host: postgres.host,
            port: postgres.port,
            user: postgres.user,
            password: postgres.password,
            name: postgres.database,
            max_connections: postgres.max_connections,
            connect_timeout_secs: postgres.connect_timeout_secs,
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

impl DatabaseConfig {
    /// Resolve the configured backend into a storage configuration
    pub fn storage_config(&self) -> Result<StorageConfig, DomainError> {
        let storage_type = StorageType::from_str(&self.backend).ok_or_else(|| {
            DomainError::configuration(format!("Unknown database backend '{}'", self.backend))
        })?;

        Ok(match storage_type {
            StorageType::InMemory => StorageConfig::in_memory(),
            StorageType::Postgres => StorageConfig::postgres(PostgresConfig {
                url: self.url.clone().filter(|url| !url.is_empty()),
                host: self.host.clone(),
                port: self.port,
                user: self.user.clone(),
                password: self.password.clone(),
                database: self.name.clone(),
                max_connections: self.max_connections,
                connect_timeout_secs: self.connect_timeout_secs,
            }),
        })
    }
}

impl WorkflowConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load configuration from files and the process environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(std::env::vars().collect())
    }

    /// Load configuration using `vars` in place of the process environment
    pub fn load_from(vars: HashMap<String, String>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("TEAMSERVER")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            );

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, vars.get(*var).cloned())?;
        }

        builder.build()?.try_deserialize()
    }
}
