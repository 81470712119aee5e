//! Team request and response bodies

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Member, Team};

/// Body of `POST /teams`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    pub team_name: String,
    pub public_key: String,
}

/// Body of `POST /teams/{uuid}/request`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinTeamRequest {
    pub public_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamResponse {
    pub team_uuid: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    /// Surrogate id, rendered as a string
    pub id: String,
    pub team_name: String,
    pub uuid: Uuid,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id().to_string(),
            team_name: team.name().to_string(),
            uuid: *team.uuid(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummaryResponse {
    pub team_name: String,
}

impl From<&Team> for TeamSummaryResponse {
    fn from(team: &Team) -> Self {
        Self {
            team_name: team.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub public_key: String,
    pub is_admin: bool,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            public_key: member.public_key,
            is_admin: member.is_admin,
        }
    }
}
