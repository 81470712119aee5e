//! Team service - provisioning, join requests and team queries

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{
    DomainError, Fingerprint, KeyIdentityResolver, Member, Team, TeamName, TeamStore,
    TeamStoreTransaction,
};

/// Default deadline for a single workflow
pub const DEFAULT_WORKFLOW_TIMEOUT: Duration = Duration::from_secs(10);

/// Team service for provisioning teams and recording join requests
#[derive(Debug, Clone)]
pub struct TeamService {
    store: Arc<dyn TeamStore>,
    resolver: KeyIdentityResolver,
    timeout: Duration,
}

impl TeamService {
    /// Create a new team service
    pub fn new(store: Arc<dyn TeamStore>, resolver: KeyIdentityResolver) -> Self {
        Self {
            store,
            resolver,
            timeout: DEFAULT_WORKFLOW_TIMEOUT,
        }
    }

    /// Set the deadline applied to each workflow
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create a team whose founding admin is the holder of `armored`.
    ///
    /// The key registration, team and admin membership are written in one
    /// transaction. Validation and key resolution happen before it opens.
    pub async fn provision(&self, team_name: &str, armored: &str) -> Result<Uuid, DomainError> {
        let name = TeamName::new(team_name).map_err(|e| DomainError::validation(e.to_string()))?;
        let fingerprint = self.resolver.resolve(armored)?;

        info!(team_name = %name.as_str(), fingerprint = %fingerprint, "Provisioning team");

        let uuid = self
            .deadline("provision team", self.provision_unit(&name, &fingerprint, armored))
            .await?;

        info!(team_uuid = %uuid, fingerprint = %fingerprint, "Provisioned team");
        Ok(uuid)
    }

    /// Record a request by the holder of `armored` to join the team `team_uuid`
    pub async fn request_join(&self, team_uuid: &str, armored: &str) -> Result<i64, DomainError> {
        let fingerprint = self.resolver.resolve(armored)?;
        let uuid = parse_team_uuid(team_uuid)?;

        let id = self
            .deadline("request to join team", async {
                self.store.upsert_public_key(&fingerprint, armored).await?;
                let team = self.store.get_team_by_uuid(&uuid).await?;
                self.store.create_join_request(&fingerprint, team.uuid()).await
            })
            .await?;

        info!(team_uuid = %uuid, fingerprint = %fingerprint, request_id = id, "Recorded join request");
        Ok(id)
    }

    /// List all teams
    pub async fn list(&self) -> Result<Vec<Team>, DomainError> {
        self.store.list_teams().await
    }

    /// Get a team by its public UUID
    pub async fn get(&self, team_uuid: &str) -> Result<Team, DomainError> {
        let uuid = parse_team_uuid(team_uuid)?;
        self.store.get_team_by_uuid(&uuid).await
    }

    /// List the members of a team
    pub async fn members(&self, team_uuid: &str) -> Result<Vec<Member>, DomainError> {
        let team = self.get(team_uuid).await?;
        self.store.list_members(team.id()).await
    }

    async fn provision_unit(
        &self,
        name: &TeamName,
        fingerprint: &Fingerprint,
        armored: &str,
    ) -> Result<Uuid, DomainError> {
        let mut tx = self.store.begin().await?;

        match write_team(tx.as_mut(), name, fingerprint, armored).await {
            Ok(uuid) => {
                tx.commit().await?;
                Ok(uuid)
            }
            Err(e) => {
                warn!(error = %e, "Rolling back team provisioning");
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn deadline<T>(
        &self,
        operation: &str,
        fut: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, timeout_ms = self.timeout.as_millis() as u64, "Workflow timed out");
                Err(DomainError::timeout(operation, self.timeout))
            }
        }
    }
}

async fn write_team(
    tx: &mut dyn TeamStoreTransaction,
    name: &TeamName,
    fingerprint: &Fingerprint,
    armored: &str,
) -> Result<Uuid, DomainError> {
    let key_id = tx.upsert_public_key(fingerprint, armored).await?;
    let (team_id, uuid) = tx.create_team(name).await?;
    let membership_id = tx.create_membership(team_id, fingerprint, true).await?;

    debug!(key_id, team_id, membership_id, "Staged team provisioning");
    Ok(uuid)
}

/// No team can carry an unparseable UUID, so a malformed one is not found
fn parse_team_uuid(value: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value).map_err(|_| DomainError::not_found(format!("Team '{}' not found", value)))
}
