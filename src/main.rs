use marketing_dashboard_service::api::{self, AppState};
use marketing_dashboard_service::auth::AuthClient;
use marketing_dashboard_service::config::Config;
use marketing_dashboard_service::db::Database;
use marketing_dashboard_service::events::EventHub;
use marketing_dashboard_service::oauth::{GoogleAdsOAuth, MetaAdsOAuth};
use marketing_dashboard_service::platforms::LiveCampaignSource;
use marketing_dashboard_service::sync::SyncEngine;
use marketing_dashboard_service::ai::OpenAiClient;

use std::error::Error;
use std::sync::Arc;
use tokio::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env_filter).init();

    // Load configuration
    let config = Arc::new(Config::from_env()?);

    // Database connection and change feed
    let events = EventHub::new();
    let db = Arc::new(Database::connect(&config.database_url, events.clone()).await?);
    db.ensure_schema().await?;

    // Sync engine over the live platform APIs
    let source = Arc::new(LiveCampaignSource::new(
        config.google_ads_developer_token.clone(),
    ));
    let engine = Arc::new(SyncEngine::new(db.clone(), source));

    // Background worker: bulk sync every connected account on an interval
    let worker = engine.clone();
    let interval = Duration::from_secs(config.sync_interval_secs);
    tokio::spawn(async move {
        worker.run(interval).await;
    });

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        auth: Arc::new(AuthClient::new(&config.auth_base_url, &config.auth_api_key)),
        ai: Arc::new(OpenAiClient::new(&config.openai_api_key)),
        google_oauth: Arc::new(GoogleAdsOAuth::new(&config)),
        meta_oauth: Arc::new(MetaAdsOAuth::new(&config)),
        config,
        db,
        engine,
        events,
    };

    api::serve(state, &bind_addr).await?;
    Ok(())
}
