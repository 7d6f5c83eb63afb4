use super::auth::CurrentUser;
use super::error::ApiError;
use super::AppState;
use crate::models::Campaign;
use crate::sync::SyncOutcome;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Campaign>>, ApiError> {
    Ok(Json(state.db.campaigns_for_user(user.id).await?))
}

pub async fn get_one(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Campaign>, ApiError> {
    state
        .db
        .campaign(user.id, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::message("Campaign not found"))
}

/// Bulk sync of every active ad account of the caller.
pub async fn sync_all(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, ApiError> {
    match state.engine.sync_user(user.id).await? {
        SyncOutcome::NoActiveAccounts => {
            Ok(Json(json!({ "message": "No active accounts found" })))
        }
        SyncOutcome::Synced { campaigns_synced } => {
            Ok(Json(json!({ "success": true, "campaignsSynced": campaigns_synced })))
        }
    }
}

#[derive(Deserialize)]
pub struct RealtimeSyncRequest {
    pub action: String,
    pub data: Option<RealtimeSyncData>,
}

#[derive(Deserialize)]
pub struct RealtimeSyncData {
    #[serde(rename = "campaignId")]
    pub campaign_id: Uuid,
}

/// Sync actions triggered from the dashboard: a single-campaign refresh
/// or a bulk re-sync of the caller's accounts.
pub async fn realtime_sync(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<RealtimeSyncRequest>,
) -> Result<Json<Value>, ApiError> {
    match body.action.as_str() {
        "sync_campaigns" => {
            let data = body
                .data
                .ok_or_else(|| ApiError::message("Missing campaign data"))?;
            let campaign = state
                .engine
                .sync_single_campaign(user.id, data.campaign_id)
                .await?;
            Ok(Json(json!({ "success": true, "data": campaign })))
        }
        "bulk_sync" => {
            let synced = match state.engine.sync_user(user.id).await? {
                SyncOutcome::NoActiveAccounts => 0,
                SyncOutcome::Synced { campaigns_synced } => campaigns_synced,
            };
            Ok(Json(json!({ "success": true, "synced": synced })))
        }
        other => Err(ApiError::message(format!("Unknown action: {other}"))),
    }
}
