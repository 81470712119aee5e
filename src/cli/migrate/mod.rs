//! Migrate command - applies the schema to the configured database

use tracing::info;

use crate::infrastructure::storage::{
    connect_pool, run_team_migrations, PostgresMigrator, StorageConfig,
};

/// Apply pending migrations and report the resulting schema version
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let pg_config = match config.database.storage_config()? {
        StorageConfig::Postgres(pg_config) => pg_config,
        StorageConfig::InMemory => {
            anyhow::bail!("Migrations require the postgres backend");
        }
    };

    let pool = connect_pool(&pg_config).await?;
    run_team_migrations(&pool).await?;

    let version = PostgresMigrator::new(pool).current_version().await?;
    info!(version = ?version, "Database schema is up to date");

    Ok(())
}
