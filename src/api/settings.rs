use super::auth::CurrentUser;
use super::error::ApiError;
use super::AppState;
use crate::models::{
    AlertSetting, AlertSettingPatch, AutomatedReport, AutomatedReportPatch, BudgetGoal,
    BudgetGoalPatch, NewAlertSetting, NewAutomatedReport, NewBudgetGoal,
};
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

// Budget goals

pub async fn list_goals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<BudgetGoal>>, ApiError> {
    Ok(Json(state.db.budget_goals_for_user(user.id).await?))
}

pub async fn create_goal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewBudgetGoal>,
) -> Result<Json<BudgetGoal>, ApiError> {
    Ok(Json(state.db.insert_budget_goal(user.id, &body).await?))
}

pub async fn update_goal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<BudgetGoalPatch>,
) -> Result<Json<BudgetGoal>, ApiError> {
    state
        .db
        .update_budget_goal(user.id, id, &body)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::message("Budget goal not found"))
}

pub async fn remove_goal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.db.delete_budget_goal(user.id, id).await?;
    Ok(Json(json!({ "success": true })))
}

// Alert settings

pub async fn list_alerts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<AlertSetting>>, ApiError> {
    Ok(Json(state.db.alert_settings_for_user(user.id).await?))
}

pub async fn create_alert(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewAlertSetting>,
) -> Result<Json<AlertSetting>, ApiError> {
    Ok(Json(state.db.insert_alert_setting(user.id, &body).await?))
}

pub async fn update_alert(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<AlertSettingPatch>,
) -> Result<Json<AlertSetting>, ApiError> {
    state
        .db
        .update_alert_setting(user.id, id, &body)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::message("Alert setting not found"))
}

#[derive(Deserialize)]
pub struct EnabledToggle {
    pub is_enabled: bool,
}

pub async fn set_alert_enabled(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<EnabledToggle>,
) -> Result<Json<AlertSetting>, ApiError> {
    state
        .db
        .set_alert_setting_enabled(user.id, id, body.is_enabled)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::message("Alert setting not found"))
}

pub async fn remove_alert(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.db.delete_alert_setting(user.id, id).await?;
    Ok(Json(json!({ "success": true })))
}

// Automated reports

pub async fn list_reports(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<AutomatedReport>>, ApiError> {
    Ok(Json(state.db.automated_reports_for_user(user.id).await?))
}

pub async fn create_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewAutomatedReport>,
) -> Result<Json<AutomatedReport>, ApiError> {
    Ok(Json(state.db.insert_automated_report(user.id, &body).await?))
}

pub async fn update_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<AutomatedReportPatch>,
) -> Result<Json<AutomatedReport>, ApiError> {
    state
        .db
        .update_automated_report(user.id, id, &body)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::message("Automated report not found"))
}

#[derive(Deserialize)]
pub struct ReportActiveToggle {
    pub is_active: bool,
}

pub async fn set_report_active(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ReportActiveToggle>,
) -> Result<Json<AutomatedReport>, ApiError> {
    state
        .db
        .set_automated_report_active(user.id, id, body.is_active)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::message("Automated report not found"))
}

pub async fn remove_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.db.delete_automated_report(user.id, id).await?;
    Ok(Json(json!({ "success": true })))
}
