//! Team endpoints

use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use super::path::Route;
use super::state::AppState;
use super::types::{
    decode_json, ApiError, CreateTeamRequest, CreateTeamResponse, JoinTeamRequest, MemberResponse,
    TeamResponse, TeamSummaryResponse,
};

/// Execute a resolved route
pub async fn handle(state: &AppState, route: Route, body: Bytes) -> Result<Response, ApiError> {
    match route {
        Route::ListTeams => list_teams(state).await,
        Route::ProvisionTeam => create_team(state, &body).await,
        Route::GetTeam(id) => get_team(state, &id).await,
        Route::TeamSummary(id) => get_team_summary(state, &id).await,
        Route::TeamMembers(id) => list_team_members(state, &id).await,
        Route::JoinRequest(id) => request_to_join(state, &id, &body).await,
    }
}

/// GET /teams
async fn list_teams(state: &AppState) -> Result<Response, ApiError> {
    debug!("Listing teams");

    let teams = state.team_service.list().await?;
    let body: Vec<TeamResponse> = teams.iter().map(TeamResponse::from).collect();

    Ok(Json(body).into_response())
}

/// POST /teams
async fn create_team(state: &AppState, body: &Bytes) -> Result<Response, ApiError> {
    let request: CreateTeamRequest = decode_json(body)?;
    debug!(team_name = %request.team_name, "Creating team");

    let team_uuid = state
        .team_service
        .provision(&request.team_name, &request.public_key)
        .await?;

    Ok(Json(CreateTeamResponse { team_uuid }).into_response())
}

/// GET /teams/{uuid}
async fn get_team(state: &AppState, id: &str) -> Result<Response, ApiError> {
    debug!(team = %id, "Getting team");

    let team = state.team_service.get(id).await?;

    Ok(Json(TeamResponse::from(&team)).into_response())
}

/// GET /teams/{uuid}/summary
async fn get_team_summary(state: &AppState, id: &str) -> Result<Response, ApiError> {
    let team = state.team_service.get(id).await?;

    Ok(Json(TeamSummaryResponse::from(&team)).into_response())
}

/// GET /teams/{uuid}/members
async fn list_team_members(state: &AppState, id: &str) -> Result<Response, ApiError> {
    let members = state.team_service.members(id).await?;
    let body: Vec<MemberResponse> = members.into_iter().map(MemberResponse::from).collect();

    Ok(Json(body).into_response())
}

/// POST /teams/{uuid}/request
async fn request_to_join(state: &AppState, id: &str, body: &Bytes) -> Result<Response, ApiError> {
    let request: JoinTeamRequest = decode_json(body)?;
    debug!(team = %id, "Recording join request");

    state.team_service.request_join(id, &request.public_key).await?;

    Ok(StatusCode::CREATED.into_response())
}
