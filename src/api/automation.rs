use super::auth::CurrentUser;
use super::error::ApiError;
use super::AppState;
use crate::models::{AutomationRule, AutomationRulePatch, NewAutomationRule};
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<AutomationRule>>, ApiError> {
    Ok(Json(state.db.automation_rules_for_user(user.id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewAutomationRule>,
) -> Result<Json<AutomationRule>, ApiError> {
    Ok(Json(state.db.insert_automation_rule(user.id, &body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<AutomationRulePatch>,
) -> Result<Json<AutomationRule>, ApiError> {
    state
        .db
        .update_automation_rule(user.id, id, &body)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::message("Automation rule not found"))
}

#[derive(Deserialize)]
pub struct ActiveToggle {
    pub is_active: bool,
}

/// Rules are descriptive storage; activation toggles the flag and emits
/// the change event, nothing evaluates or executes them.
pub async fn set_active(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ActiveToggle>,
) -> Result<Json<AutomationRule>, ApiError> {
    state
        .db
        .set_automation_rule_active(user.id, id, body.is_active)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::message("Automation rule not found"))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.db.delete_automation_rule(user.id, id).await?;
    Ok(Json(json!({ "success": true })))
}
