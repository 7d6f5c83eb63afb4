use super::auth::CurrentUser;
use super::error::ApiError;
use super::AppState;
use crate::models::{CampaignComment, NewCampaignComment};
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

pub async fn list_for_campaign(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<Vec<CampaignComment>>, ApiError> {
    Ok(Json(state.db.comments_for_campaign(user.id, campaign_id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewCampaignComment>,
) -> Result<Json<CampaignComment>, ApiError> {
    Ok(Json(state.db.insert_comment(user.id, &body).await?))
}

/// Idempotent: deleting an already-deleted comment succeeds.
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.db.delete_comment(user.id, id).await?;
    Ok(Json(json!({ "success": true })))
}
