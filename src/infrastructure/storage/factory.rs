//! Storage factory for runtime backend selection

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, TeamStore};
use crate::infrastructure::team::{InMemoryTeamStore, PostgresTeamStore};

use super::migrations::run_team_migrations;
use super::postgres::{connect_pool, PostgresConfig};

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Factory for creating team stores
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Create the configured store; Postgres stores are migrated before use
    pub async fn create(config: &StorageConfig) -> Result<Arc<dyn TeamStore>, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory team store");
                Ok(Arc::new(InMemoryTeamStore::new()))
            }
            StorageConfig::Postgres(pg_config) => {
                let pool = connect_pool(pg_config).await?;
                run_team_migrations(&pool).await?;
                Ok(Arc::new(PostgresTeamStore::new(pool)))
            }
        }
    }
}
