//! In-memory team store

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    DomainError, Fingerprint, JoinRequest, Member, Membership, PublicKey, Team, TeamName,
    TeamStore, TeamStoreTransaction,
};

#[derive(Debug, Default)]
struct Tables {
    teams: Vec<Team>,
    public_keys: HashMap<Fingerprint, PublicKey>,
    memberships: Vec<Membership>,
    join_requests: Vec<JoinRequest>,
    last_team_id: i64,
    last_key_id: i64,
    last_membership_id: i64,
    last_join_request_id: i64,
}

#[derive(Debug, Default)]
struct Inner {
    tables: RwLock<Tables>,
    fail_memberships: AtomicBool,
}

impl Inner {
    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, DomainError> {
        self.tables
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, DomainError> {
        let tables = self
            .tables
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(f(&tables))
    }
}

/// Thread-safe in-memory team store
///
/// Useful for testing and development. Data is lost when the process
/// terminates. Transactions stage their writes and apply them under a single
/// write lock on commit, so readers never observe a partial unit of work.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTeamStore {
    inner: Arc<Inner>,
}

impl InMemoryTeamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent membership insert fail with a storage error
    pub fn fail_memberships(&self, fail: bool) {
        self.inner.fail_memberships.store(fail, Ordering::SeqCst);
    }

    pub fn team_count(&self) -> usize {
        self.inner.read(|t| t.teams.len()).unwrap_or_default()
    }

    pub fn public_key_count(&self) -> usize {
        self.inner.read(|t| t.public_keys.len()).unwrap_or_default()
    }

    pub fn public_key(&self, fingerprint: &Fingerprint) -> Option<PublicKey> {
        self.inner
            .read(|t| t.public_keys.get(fingerprint).cloned())
            .ok()
            .flatten()
    }

    pub fn memberships(&self, team_id: i64) -> Vec<Membership> {
        self.inner
            .read(|t| {
                t.memberships
                    .iter()
                    .filter(|m| m.team_id() == team_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn join_requests(&self, team_id: i64) -> Vec<JoinRequest> {
        self.inner
            .read(|t| {
                t.join_requests
                    .iter()
                    .filter(|r| r.team_id() == team_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl TeamStore for InMemoryTeamStore {
    async fn list_teams(&self) -> Result<Vec<Team>, DomainError> {
        self.inner.read(|t| t.teams.clone())
    }

    async fn get_team_by_uuid(&self, uuid: &Uuid) -> Result<Team, DomainError> {
        self.inner
            .read(|t| t.teams.iter().find(|team| team.uuid() == uuid).cloned())?
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", uuid)))
    }

    async fn create_join_request(
        &self,
        fingerprint: &Fingerprint,
        team_uuid: &Uuid,
    ) -> Result<i64, DomainError> {
        let mut tables = self.inner.write()?;

        let team_id = tables
            .teams
            .iter()
            .find(|team| team.uuid() == team_uuid)
            .map(Team::id)
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", team_uuid)))?;

        if !tables.public_keys.contains_key(fingerprint) {
            return Err(DomainError::storage(format!(
                "Public key '{}' is not registered",
                fingerprint
            )));
        }

        tables.last_join_request_id += 1;
        let id = tables.last_join_request_id;
        tables
            .join_requests
            .push(JoinRequest::new(id, team_id, fingerprint.clone()));

        Ok(id)
    }

    async fn list_members(&self, team_id: i64) -> Result<Vec<Member>, DomainError> {
        self.inner.read(|t| {
            t.memberships
                .iter()
                .filter(|m| m.team_id() == team_id)
                .filter_map(|m| {
                    t.public_keys.get(m.fingerprint()).map(|key| Member {
                        public_key: key.armored().to_string(),
                        is_admin: m.is_admin(),
                    })
                })
                .collect()
        })
    }

    async fn begin(&self) -> Result<Box<dyn TeamStoreTransaction>, DomainError> {
        Ok(Box::new(InMemoryTransaction {
            inner: Arc::clone(&self.inner),
            keys: Vec::new(),
            teams: Vec::new(),
            memberships: Vec::new(),
        }))
    }
}

/// Writes staged until commit
#[derive(Debug)]
struct InMemoryTransaction {
    inner: Arc<Inner>,
    keys: Vec<PublicKey>,
    teams: Vec<Team>,
    memberships: Vec<Membership>,
}

impl InMemoryTransaction {
    fn staged_key(&self, fingerprint: &Fingerprint) -> Option<&PublicKey> {
        self.keys.iter().rev().find(|k| k.fingerprint() == fingerprint)
    }
}

#[async_trait]
impl TeamStoreTransaction for InMemoryTransaction {
    async fn upsert_public_key(
        &mut self,
        fingerprint: &Fingerprint,
        armored: &str,
    ) -> Result<i64, DomainError> {
        let existing = match self.staged_key(fingerprint) {
            Some(key) => Some(key.id()),
            None => self
                .inner
                .read(|t| t.public_keys.get(fingerprint).map(PublicKey::id))?,
        };

        let id = match existing {
            Some(id) => id,
            None => {
                let mut tables = self.inner.write()?;
                tables.last_key_id += 1;
                tables.last_key_id
            }
        };

        self.keys
            .push(PublicKey::new(id, fingerprint.clone(), armored));
        Ok(id)
    }

    async fn create_team(&mut self, name: &TeamName) -> Result<(i64, Uuid), DomainError> {
        let id = {
            let mut tables = self.inner.write()?;
            tables.last_team_id += 1;
            tables.last_team_id
        };
        let uuid = Uuid::new_v4();

        self.teams.push(Team::new(id, name.as_str(), uuid));
        Ok((id, uuid))
    }

    async fn create_membership(
        &mut self,
        team_id: i64,
        fingerprint: &Fingerprint,
        is_admin: bool,
    ) -> Result<i64, DomainError> {
        if self.inner.fail_memberships.load(Ordering::SeqCst) {
            return Err(DomainError::storage("Failed to create team user: injected failure"));
        }

        let (team_known, key_known) = self.inner.read(|t| {
            (
                t.teams.iter().any(|team| team.id() == team_id),
                t.public_keys.contains_key(fingerprint),
            )
        })?;

        if !team_known && !self.teams.iter().any(|team| team.id() == team_id) {
            return Err(DomainError::storage(format!(
                "Team id {} does not exist",
                team_id
            )));
        }

        if !key_known && self.staged_key(fingerprint).is_none() {
            return Err(DomainError::storage(format!(
                "Public key '{}' is not registered",
                fingerprint
            )));
        }

        let id = {
            let mut tables = self.inner.write()?;
            tables.last_membership_id += 1;
            tables.last_membership_id
        };

        self.memberships
            .push(Membership::new(id, team_id, fingerprint.clone(), is_admin));
        Ok(id)
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let this = *self;
        let mut tables = this.inner.write()?;

        for key in this.keys {
            let armored = key.armored().to_string();
            tables
                .public_keys
                .entry(key.fingerprint().clone())
                .and_modify(|existing| existing.refresh(armored))
                .or_insert(key);
        }
        tables.teams.extend(this.teams);
        tables.memberships.extend(this.memberships);

        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(byte: u8) -> Fingerprint {
        Fingerprint::from_bytes(&[byte; 20])
    }

    fn name(value: &str) -> TeamName {
        TeamName::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_public_key_is_idempotent() {
        let store = InMemoryTeamStore::new();

        let first = store.upsert_public_key(&fp(1), "first").await.unwrap();
        let second = store.upsert_public_key(&fp(1), "second").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.public_key_count(), 1);
        assert_eq!(store.public_key(&fp(1)).unwrap().armored(), "second");
    }

    #[tokio::test]
    async fn test_create_team_generates_unique_uuids() {
        let store = InMemoryTeamStore::new();

        let (id_a, uuid_a) = store.create_team(&name("A")).await.unwrap();
        let (id_b, uuid_b) = store.create_team(&name("B")).await.unwrap();

        assert_ne!(id_a, id_b);
        assert_ne!(uuid_a, uuid_b);

        let team = store.get_team_by_uuid(&uuid_b).await.unwrap();
        assert_eq!(team.name(), "B");
        assert_eq!(team.id(), id_b);
    }

    #[tokio::test]
    async fn test_get_team_by_unknown_uuid() {
        let store = InMemoryTeamStore::new();
        let err = store.get_team_by_uuid(&Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_invisible() {
        let store = InMemoryTeamStore::new();
        let mut tx = store.begin().await.unwrap();

        tx.upsert_public_key(&fp(1), "key").await.unwrap();
        let (team_id, _) = tx.create_team(&name("Hidden")).await.unwrap();
        tx.create_membership(team_id, &fp(1), true).await.unwrap();

        assert_eq!(store.team_count(), 0);
        assert_eq!(store.public_key_count(), 0);

        drop(tx);
        assert_eq!(store.team_count(), 0);
        assert!(store.memberships(team_id).is_empty());
    }

    #[tokio::test]
    async fn test_commit_applies_all_writes() {
        let store = InMemoryTeamStore::new();
        let mut tx = store.begin().await.unwrap();

        tx.upsert_public_key(&fp(1), "key").await.unwrap();
        let (team_id, _) = tx.create_team(&name("Acme")).await.unwrap();
        tx.create_membership(team_id, &fp(1), true).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(store.team_count(), 1);
        assert_eq!(store.memberships(team_id).len(), 1);

        let members = store.list_members(team_id).await.unwrap();
        assert_eq!(
            members,
            vec![Member {
                public_key: "key".to_string(),
                is_admin: true
            }]
        );
    }

    #[tokio::test]
    async fn test_membership_requires_registered_key() {
        let store = InMemoryTeamStore::new();
        let (team_id, _) = store.create_team(&name("Acme")).await.unwrap();

        let err = store
            .create_membership(team_id, &fp(9), false)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_injected_membership_failure() {
        let store = InMemoryTeamStore::new();
        store.upsert_public_key(&fp(1), "key").await.unwrap();
        let (team_id, _) = store.create_team(&name("Acme")).await.unwrap();

        store.fail_memberships(true);
        assert!(store.create_membership(team_id, &fp(1), true).await.is_err());

        store.fail_memberships(false);
        assert!(store.create_membership(team_id, &fp(1), true).await.is_ok());
    }

    #[tokio::test]
    async fn test_join_requests_are_not_deduplicated() {
        let store = InMemoryTeamStore::new();
        store.upsert_public_key(&fp(2), "key").await.unwrap();
        let (team_id, uuid) = store.create_team(&name("Acme")).await.unwrap();

        let first = store.create_join_request(&fp(2), &uuid).await.unwrap();
        let second = store.create_join_request(&fp(2), &uuid).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.join_requests(team_id).len(), 2);
    }

    #[tokio::test]
    async fn test_join_request_unknown_team() {
        let store = InMemoryTeamStore::new();
        store.upsert_public_key(&fp(2), "key").await.unwrap();

        let err = store
            .create_join_request(&fp(2), &Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
