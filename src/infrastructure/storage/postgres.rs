//! PostgreSQL connection pooling

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use tracing::info;

use crate::domain::DomainError;

/// PostgreSQL connection configuration
///
/// A connection URL, when present, wins over the discrete fields.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Full connection URL
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection acquire timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "teamserver".to_string(),
            password: None,
            database: "teamserver_development".to_string(),
            max_connections: 10,
            connect_timeout_secs: 30,
        }
    }
}

impl PostgresConfig {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Build connection options from the URL or the discrete fields
    pub fn connect_options(&self) -> Result<PgConnectOptions, DomainError> {
        if let Some(url) = &self.url {
            return url.parse::<PgConnectOptions>().map_err(|e| {
                DomainError::configuration(format!("Invalid database URL: {}", e))
            });
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database)
            .ssl_mode(PgSslMode::Disable);

        if let Some(password) = &self.password {
            options = options.password(password);
        }

        Ok(options)
    }

    /// Human-readable target for logs, never including the password
    pub fn describe(&self) -> String {
        match &self.url {
            Some(_) => "database URL".to_string(),
            None => format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database),
        }
    }
}

/// Open a connection pool
pub async fn connect_pool(config: &PostgresConfig) -> Result<PgPool, DomainError> {
    let options = config.connect_options()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect_with(options)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

    info!(database = %config.describe(), "Connected to PostgreSQL");
    Ok(pool)
}
