//! Storage infrastructure - connection pooling, schema and backend selection

mod factory;
pub mod migrations;
mod postgres;

pub use factory::{StorageConfig, StorageFactory, StorageType};
pub use migrations::{run_team_migrations, Migration, PostgresMigrator};
pub use postgres::{connect_pool, PostgresConfig};
