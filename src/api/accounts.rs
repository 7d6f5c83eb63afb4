use super::auth::CurrentUser;
use super::error::ApiError;
use super::AppState;
use crate::models::{AdAccount, NewAdAccount, Platform};
use crate::oauth::{DiscoveredAccount, OAuthTokens};
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<AdAccount>>, ApiError> {
    Ok(Json(state.db.ad_accounts_for_user(user.id).await?))
}

#[derive(Deserialize)]
pub struct AdAccountUpdate {
    pub account_name: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<AdAccountUpdate>,
) -> Result<Json<AdAccount>, ApiError> {
    state
        .db
        .update_ad_account(user.id, id, body.account_name.as_deref(), body.is_active)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::message("Ad account not found"))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.db.delete_ad_account(user.id, id).await?;
    Ok(Json(json!({ "success": true })))
}

/// Body of the OAuth function endpoints. Without a `code` the call starts
/// the flow and returns the provider authorization URL; with one it
/// finishes the exchange and stores the discovered accounts.
#[derive(Deserialize)]
pub struct OAuthCallback {
    pub code: Option<String>,
}

pub async fn google_oauth(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<OAuthCallback>,
) -> Result<Json<Value>, ApiError> {
    let Some(code) = body.code else {
        let auth_url = state.google_oauth.authorization_url(user.id);
        return Ok(Json(json!({ "authUrl": auth_url })));
    };

    let tokens = state.google_oauth.exchange_code(&code).await?;
    let accounts = state
        .google_oauth
        .list_accessible_customers(&tokens.access_token)
        .await?;

    store_accounts(&state, user.id, Platform::GoogleAds, &tokens, &accounts).await?;

    Ok(Json(json!({ "success": true, "accounts": accounts.len() })))
}

pub async fn meta_oauth(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<OAuthCallback>,
) -> Result<Json<Value>, ApiError> {
    let Some(code) = body.code else {
        let auth_url = state.meta_oauth.authorization_url(user.id);
        return Ok(Json(json!({ "authUrl": auth_url })));
    };

    let tokens = state.meta_oauth.exchange_code(&code).await?;
    let accounts = state.meta_oauth.list_ad_accounts(&tokens.access_token).await?;

    store_accounts(&state, user.id, Platform::MetaAds, &tokens, &accounts).await?;

    Ok(Json(json!({ "success": true, "accounts": accounts.len() })))
}

async fn store_accounts(
    state: &AppState,
    user_id: Uuid,
    platform: Platform,
    tokens: &OAuthTokens,
    accounts: &[DiscoveredAccount],
) -> Result<(), ApiError> {
    let expires_at = tokens.expires_at(Utc::now());

    for account in accounts {
        state
            .db
            .insert_ad_account(&NewAdAccount {
                user_id,
                platform,
                account_id: account.account_id.clone(),
                account_name: account.account_name.clone(),
                access_token: Some(tokens.access_token.clone()),
                refresh_token: tokens.refresh_token.clone(),
                expires_at,
            })
            .await?;
    }

    tracing::info!(%user_id, %platform, accounts = accounts.len(), "connected ad accounts");
    Ok(())
}
