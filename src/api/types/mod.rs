//! HTTP request, response and error types

pub mod error;
pub mod json;
pub mod team;

pub use error::{ApiError, ApiErrorResponse};
pub use json::decode_json;
pub use team::{
    CreateTeamRequest, CreateTeamResponse, JoinTeamRequest, MemberResponse, TeamResponse,
    TeamSummaryResponse,
};
