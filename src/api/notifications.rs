use super::auth::CurrentUser;
use super::error::ApiError;
use super::AppState;
use crate::models::Notification;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Notification>>, ApiError> {
    Ok(Json(state.db.notifications_for_user(user.id).await?))
}

#[derive(Deserialize)]
pub struct ReadToggle {
    #[serde(default = "default_read")]
    pub is_read: bool,
}

fn default_read() -> bool {
    true
}

pub async fn set_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ReadToggle>,
) -> Result<Json<Notification>, ApiError> {
    state
        .db
        .mark_notification_read(user.id, id, body.is_read)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::message("Notification not found"))
}

pub async fn read_all(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let updated = state.db.mark_all_notifications_read(user.id).await?;
    Ok(Json(json!({ "success": true, "updated": updated })))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.db.delete_notification(user.id, id).await?;
    Ok(Json(json!({ "success": true })))
}
