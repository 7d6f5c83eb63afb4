use super::auth::CurrentUser;
use super::error::ApiError;
use super::AppState;
use crate::ai::{
    contextual_suggestions, contextual_system_prompt, insight_prompt, ChatMessage, InsightAction,
    INSIGHTS_SYSTEM_PROMPT,
};
use crate::constants::{ASSISTANT_MODEL, INSIGHTS_MODEL};
use crate::models::{AiInsight, ChangeEntry};
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

const CONTEXT_CAMPAIGN_LIMIT: i64 = 10;
const HISTORY_LIMIT: i64 = 50;

#[derive(Deserialize)]
pub struct InsightsRequest {
    pub action: String,
    #[serde(rename = "campaignData", default)]
    pub campaign_data: Value,
}

/// General-purpose marketing insight: one canned analysis prompt over the
/// submitted campaign payload, persisted for history.
pub async fn marketing_insights(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<InsightsRequest>,
) -> Result<Json<Value>, ApiError> {
    let action: InsightAction = body.action.parse()?;

    let messages = [
        ChatMessage::system(INSIGHTS_SYSTEM_PROMPT),
        ChatMessage::user(insight_prompt(action, &body.campaign_data)),
    ];
    let insights = state.ai.chat(INSIGHTS_MODEL, &messages, None, 0.7).await?;

    state
        .db
        .insert_ai_insight(user.id, action.as_str(), &insights, &body.campaign_data)
        .await?;

    Ok(Json(json!({ "insights": insights })))
}

#[derive(Deserialize)]
pub struct AssistantRequest {
    pub message: String,
    #[serde(default)]
    pub context: String,
}

/// Context-aware chat: the system prompt embeds the user's campaigns,
/// alerts and rules; the interaction is logged to change history.
pub async fn contextual_assistant(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<AssistantRequest>,
) -> Result<Json<Value>, ApiError> {
    tracing::info!(user = %user.id, context = %body.context, "contextual assistant request");

    let campaigns = state.db.recent_campaigns(user.id, CONTEXT_CAMPAIGN_LIMIT).await?;
    let alerts = state.db.alert_settings_for_user(user.id).await?;
    let rules = state.db.automation_rules_for_user(user.id).await?;

    let messages = [
        ChatMessage::system(contextual_system_prompt(&body.context, &campaigns, &alerts, &rules)),
        ChatMessage::user(body.message.clone()),
    ];
    let response = state
        .ai
        .chat(ASSISTANT_MODEL, &messages, Some(1000), 0.7)
        .await?;

    state
        .db
        .insert_change_entry(
            user.id,
            "ai_interaction",
            None,
            Some("ai_query"),
            Some(&body.message),
            Some(&response),
            Some(&format!("Context: {}", body.context)),
        )
        .await?;

    Ok(Json(json!({
        "response": response,
        "context": body.context,
        "suggestions": contextual_suggestions(&body.context, &campaigns),
    })))
}

pub async fn change_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ChangeEntry>>, ApiError> {
    Ok(Json(state.db.change_history_for_user(user.id, HISTORY_LIMIT).await?))
}

pub async fn insight_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<AiInsight>>, ApiError> {
    Ok(Json(state.db.ai_insights_for_user(user.id, HISTORY_LIMIT).await?))
}
