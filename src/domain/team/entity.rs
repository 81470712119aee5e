//! Team entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_team_name, TeamValidationError};
use crate::domain::fingerprint::Fingerprint;

/// Team entity
///
/// `id` is the internal surrogate key; `uuid` is the only identifier exposed
/// to clients and never changes once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: i64,
    name: String,
    uuid: Uuid,
}

impl Team {
    /// Create a team value for a row that already exists in storage
    pub fn new(id: i64, name: impl Into<String>, uuid: Uuid) -> Self {
        Self {
            id,
            name: name.into(),
            uuid,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uuid(&self) -> &Uuid {
        &self.uuid
    }
}

/// A validated team name, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamName(String);

impl TeamName {
    pub fn new(name: impl Into<String>) -> Result<Self, TeamValidationError> {
        let name = name.into();
        validate_team_name(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Links a key identity to a team
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    id: i64,
    team_id: i64,
    fingerprint: Fingerprint,
    is_admin: bool,
}

impl Membership {
    pub fn new(id: i64, team_id: i64, fingerprint: Fingerprint, is_admin: bool) -> Self {
        Self {
            id,
            team_id,
            fingerprint,
            is_admin,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn team_id(&self) -> i64 {
        self.team_id
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

/// A recorded request by a key to join a team. Carries no approval state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    id: i64,
    team_id: i64,
    fingerprint: Fingerprint,
    created_at: DateTime<Utc>,
}

impl JoinRequest {
    pub fn new(id: i64, team_id: i64, fingerprint: Fingerprint) -> Self {
        Self {
            id,
            team_id,
            fingerprint,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn team_id(&self) -> i64 {
        self.team_id
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Team member view: the member's armored key and admin flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub public_key: String,
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_accessors() {
        let uuid = Uuid::new_v4();
        let team = Team::new(7, "Acme", uuid);

        assert_eq!(team.id(), 7);
        assert_eq!(team.name(), "Acme");
        assert_eq!(team.uuid(), &uuid);
    }

    #[test]
    fn test_team_name_valid() {
        let name = TeamName::new("Acme Corp").unwrap();
        assert_eq!(name.as_str(), "Acme Corp");
    }

    #[test]
    fn test_team_name_invalid() {
        assert!(TeamName::new("").is_err());
        assert!(TeamName::new("   ").is_err());
    }

    #[test]
    fn test_membership_accessors() {
        let fp = Fingerprint::from_bytes(&[0x42; 20]);
        let membership = Membership::new(1, 2, fp.clone(), true);

        assert_eq!(membership.team_id(), 2);
        assert_eq!(membership.fingerprint(), &fp);
        assert!(membership.is_admin());
    }

    #[test]
    fn test_join_request_timestamp() {
        let before = Utc::now();
        let request = JoinRequest::new(1, 2, Fingerprint::from_bytes(&[0x01; 20]));

        assert!(request.created_at() >= before);
        assert_eq!(request.team_id(), 2);
    }
}
