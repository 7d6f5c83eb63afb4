use super::auth::CurrentUser;
use super::error::ApiError;
use super::AppState;
use crate::models::{NewTeamMember, Profile, ProfilePatch, TeamMember, TeamMemberPatch};
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<TeamMember>>, ApiError> {
    Ok(Json(state.db.team_members_for_owner(user.id).await?))
}

pub async fn invite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewTeamMember>,
) -> Result<Json<TeamMember>, ApiError> {
    Ok(Json(state.db.insert_team_member(user.id, &body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<TeamMemberPatch>,
) -> Result<Json<TeamMember>, ApiError> {
    state
        .db
        .update_team_member(user.id, id, &body)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::message("Team member not found"))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.db.delete_team_member(user.id, id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Profile>, ApiError> {
    state
        .db
        .profile(user.id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::message("Profile not found"))
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<ProfilePatch>,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(state.db.upsert_profile(user.id, &body).await?))
}
