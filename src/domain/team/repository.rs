//! Team persistence port

use async_trait::async_trait;
use uuid::Uuid;

use super::entity::{Member, Team, TeamName};
use crate::domain::fingerprint::Fingerprint;
use crate::domain::DomainError;

/// Storage operations the team workflows depend on.
///
/// Single-write operations each run in their own unit of work. Multi-write
/// sequences that must land together go through [`TeamStore::begin`].
#[async_trait]
pub trait TeamStore: Send + Sync + std::fmt::Debug {
    /// List all teams
    async fn list_teams(&self) -> Result<Vec<Team>, DomainError>;

    /// Get a team by its public UUID, failing with `NotFound` if absent
    async fn get_team_by_uuid(&self, uuid: &Uuid) -> Result<Team, DomainError>;

    /// Record a join request against the team with `team_uuid`
    async fn create_join_request(
        &self,
        fingerprint: &Fingerprint,
        team_uuid: &Uuid,
    ) -> Result<i64, DomainError>;

    /// List the members of a team with their armored keys
    async fn list_members(&self, team_id: i64) -> Result<Vec<Member>, DomainError>;

    /// Open a unit of work
    async fn begin(&self) -> Result<Box<dyn TeamStoreTransaction>, DomainError>;

    /// Insert a team with a freshly generated UUID
    async fn create_team(&self, name: &TeamName) -> Result<(i64, Uuid), DomainError> {
        let mut tx = self.begin().await?;
        let created = tx.create_team(name).await?;
        tx.commit().await?;
        Ok(created)
    }

    /// Grant a key membership of a team
    async fn create_membership(
        &self,
        team_id: i64,
        fingerprint: &Fingerprint,
        is_admin: bool,
    ) -> Result<i64, DomainError> {
        let mut tx = self.begin().await?;
        let id = tx.create_membership(team_id, fingerprint, is_admin).await?;
        tx.commit().await?;
        Ok(id)
    }

    /// Register a key, or refresh its armored text if already registered
    async fn upsert_public_key(
        &self,
        fingerprint: &Fingerprint,
        armored: &str,
    ) -> Result<i64, DomainError> {
        let mut tx = self.begin().await?;
        let id = tx.upsert_public_key(fingerprint, armored).await?;
        tx.commit().await?;
        Ok(id)
    }
}

/// Writes staged in one atomic unit.
///
/// Nothing written through a transaction is visible to other callers until
/// `commit` succeeds. Dropping a transaction without committing discards it.
#[async_trait]
pub trait TeamStoreTransaction: Send {
    async fn upsert_public_key(
        &mut self,
        fingerprint: &Fingerprint,
        armored: &str,
    ) -> Result<i64, DomainError>;

    async fn create_team(&mut self, name: &TeamName) -> Result<(i64, Uuid), DomainError>;

    async fn create_membership(
        &mut self,
        team_id: i64,
        fingerprint: &Fingerprint,
        is_admin: bool,
    ) -> Result<i64, DomainError>;

    async fn commit(self: Box<Self>) -> Result<(), DomainError>;

    async fn rollback(self: Box<Self>) -> Result<(), DomainError>;
}
