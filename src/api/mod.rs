mod accounts;
mod assistant;
mod auth;
mod automation;
mod campaigns;
mod comments;
mod error;
mod notifications;
mod realtime;
mod settings;
mod team;

pub use auth::CurrentUser;
pub use error::ApiError;

use crate::ai::OpenAiClient;
use crate::auth::AuthClient;
use crate::config::Config;
use crate::db::Database;
use crate::events::EventHub;
use crate::oauth::{GoogleAdsOAuth, MetaAdsOAuth};
use crate::sync::SyncEngine;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<Database>,
    pub engine: Arc<SyncEngine>,
    pub auth: Arc<AuthClient>,
    pub ai: Arc<OpenAiClient>,
    pub google_oauth: Arc<GoogleAdsOAuth>,
    pub meta_oauth: Arc<MetaAdsOAuth>,
    pub events: EventHub,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        // Table surface
        .route("/ad-accounts", get(accounts::list))
        .route("/ad-accounts/:id", patch(accounts::update).delete(accounts::remove))
        .route("/campaigns", get(campaigns::list))
        .route("/campaigns/:id", get(campaigns::get_one))
        .route("/campaigns/:id/comments", get(comments::list_for_campaign))
        .route("/comments", post(comments::create))
        .route("/comments/:id", delete(comments::remove))
        .route("/automation-rules", get(automation::list).post(automation::create))
        .route(
            "/automation-rules/:id",
            patch(automation::update).delete(automation::remove),
        )
        .route("/automation-rules/:id/active", put(automation::set_active))
        .route("/budget-goals", get(settings::list_goals).post(settings::create_goal))
        .route(
            "/budget-goals/:id",
            patch(settings::update_goal).delete(settings::remove_goal),
        )
        .route("/alert-settings", get(settings::list_alerts).post(settings::create_alert))
        .route(
            "/alert-settings/:id",
            patch(settings::update_alert).delete(settings::remove_alert),
        )
        .route("/alert-settings/:id/enabled", put(settings::set_alert_enabled))
        .route(
            "/automated-reports",
            get(settings::list_reports).post(settings::create_report),
        )
        .route(
            "/automated-reports/:id",
            patch(settings::update_report).delete(settings::remove_report),
        )
        .route("/automated-reports/:id/active", put(settings::set_report_active))
        .route("/notifications", get(notifications::list))
        .route("/notifications/:id", delete(notifications::remove))
        .route("/notifications/:id/read", put(notifications::set_read))
        .route("/notifications/read-all", post(notifications::read_all))
        .route("/team-members", get(team::list).post(team::invite))
        .route("/team-members/:id", patch(team::update).delete(team::remove))
        .route("/profile", get(team::get_profile).patch(team::update_profile))
        .route("/change-history", get(assistant::change_history))
        .route("/ai-insights", get(assistant::insight_history))
        // Function endpoints
        .route("/functions/google-ads-oauth", post(accounts::google_oauth))
        .route("/functions/meta-ads-oauth", post(accounts::meta_oauth))
        .route("/functions/sync-campaigns", post(campaigns::sync_all))
        .route("/functions/realtime-sync", post(campaigns::realtime_sync))
        .route("/functions/ai-marketing-insights", post(assistant::marketing_insights))
        .route(
            "/functions/ai-contextual-assistant",
            post(assistant::contextual_assistant),
        )
        // Change feed
        .route("/realtime/events", get(realtime::events))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(state: AppState, bind_addr: &str) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = bind_addr, "listening");
    axum::serve(listener, router(state)).await
}
