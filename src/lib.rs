//! Team server
//!
//! Teams whose membership is established by possession of an OpenPGP public
//! key:
//! - Team provisioning with the submitter as founding admin
//! - Join requests against existing teams
//! - PostgreSQL or in-memory storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::KeyIdentityResolver;
use infrastructure::openpgp::OpenPgpKeyRingParser;
use infrastructure::storage::StorageFactory;
use infrastructure::team::TeamService;
use tracing::info;

/// Create the application state, connecting and migrating the configured store
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = config.database.storage_config()?;
    info!(backend = ?storage_config.storage_type(), "Initializing team store");

    let store = StorageFactory::create(&storage_config).await?;
    let resolver = KeyIdentityResolver::new(Arc::new(OpenPgpKeyRingParser::new()));
    let team_service = TeamService::new(store, resolver).with_timeout(config.workflow.timeout());

    Ok(AppState::new(Arc::new(team_service)))
}
