//! Sync engine behavior against in-memory fakes: no Postgres, no network.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use marketing_dashboard_service::db::DatabaseError;
use marketing_dashboard_service::models::{
    AdAccount, Campaign, CampaignUpsert, NewNotification, Platform,
};
use marketing_dashboard_service::platforms::{CampaignSource, PlatformError, RemoteCampaign};
use marketing_dashboard_service::sync::{CampaignStore, SyncEngine, SyncError, SyncOutcome};

/// In-memory stand-in for the Postgres store, keyed the same way:
/// campaigns upsert on `(campaign_id, platform)`.
#[derive(Default)]
struct FakeStore {
    accounts: Mutex<Vec<AdAccount>>,
    campaigns: Mutex<Vec<Campaign>>,
    notifications: Mutex<Vec<NewNotification>>,
}

impl FakeStore {
    fn with_accounts(accounts: Vec<AdAccount>) -> Self {
        Self {
            accounts: Mutex::new(accounts),
            ..Default::default()
        }
    }

    fn campaign_count(&self) -> usize {
        self.campaigns.lock().unwrap().len()
    }

    fn campaign_named(&self, name: &str) -> Option<Campaign> {
        self.campaigns
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.campaign_name == name)
            .cloned()
    }

    fn notifications(&self) -> Vec<NewNotification> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl CampaignStore for FakeStore {
    async fn active_ad_accounts_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<AdAccount>, DatabaseError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id && a.is_active)
            .cloned()
            .collect())
    }

    async fn all_active_ad_accounts(&self) -> Result<Vec<AdAccount>, DatabaseError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.is_active)
            .cloned()
            .collect())
    }

    async fn campaign(&self, user_id: Uuid, id: Uuid) -> Result<Option<Campaign>, DatabaseError> {
        Ok(self
            .campaigns
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user_id == user_id && c.id == id)
            .cloned())
    }

    async fn ad_account(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<AdAccount>, DatabaseError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.user_id == user_id && a.id == id)
            .cloned())
    }

    async fn upsert_campaign(&self, up: &CampaignUpsert) -> Result<Campaign, DatabaseError> {
        let mut campaigns = self.campaigns.lock().unwrap();
        let now = Utc::now();

        if let Some(existing) = campaigns
            .iter_mut()
            .find(|c| c.campaign_id == up.campaign_id && c.platform == up.platform)
        {
            existing.campaign_name = up.campaign_name.clone();
            existing.status = up.status.clone();
            existing.budget_amount = up.budget_amount;
            existing.impressions = up.impressions;
            existing.clicks = up.clicks;
            existing.conversions = up.conversions;
            existing.cost = up.cost;
            existing.ctr = up.ctr;
            existing.cpc = up.cpc;
            existing.last_synced_at = Some(now);
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let campaign = Campaign {
            id: Uuid::new_v4(),
            user_id: up.user_id,
            ad_account_id: up.ad_account_id,
            platform: up.platform,
            campaign_id: up.campaign_id.clone(),
            campaign_name: up.campaign_name.clone(),
            status: up.status.clone(),
            budget_amount: up.budget_amount,
            currency: up.currency.clone(),
            impressions: up.impressions,
            clicks: up.clicks,
            conversions: up.conversions,
            cost: up.cost,
            ctr: up.ctr,
            cpc: up.cpc,
            last_synced_at: Some(now),
            created_at: now,
            updated_at: now,
        };
        campaigns.push(campaign.clone());
        Ok(campaign)
    }

    async fn insert_sync_notification(&self, new: &NewNotification) -> Result<(), DatabaseError> {
        self.notifications.lock().unwrap().push(new.clone());
        Ok(())
    }
}

/// Canned platform responses per account id; missing entries fail the
/// upstream call.
struct FakeSource {
    responses: HashMap<Uuid, Vec<RemoteCampaign>>,
}

impl FakeSource {
    fn new(responses: HashMap<Uuid, Vec<RemoteCampaign>>) -> Self {
        Self { responses }
    }
}

#[async_trait]
impl CampaignSource for FakeSource {
    async fn fetch_campaigns(
        &self,
        account: &AdAccount,
    ) -> Result<Vec<RemoteCampaign>, PlatformError> {
        self.responses
            .get(&account.id)
            .cloned()
            .ok_or_else(|| PlatformError::RequestFailed("upstream returned 401".to_string()))
    }
}

fn account(user_id: Uuid, platform: Platform, active: bool) -> AdAccount {
    AdAccount {
        id: Uuid::new_v4(),
        user_id,
        platform,
        account_id: "acct".to_string(),
        account_name: "Test Account".to_string(),
        access_token_encrypted: Some("token".to_string()),
        refresh_token_encrypted: None,
        expires_at: None,
        is_active: active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn remote(id: &str, name: &str) -> RemoteCampaign {
    RemoteCampaign {
        campaign_id: id.to_string(),
        name: name.to_string(),
        status: "ACTIVE".to_string(),
        budget_amount: 25.0,
        impressions: 10_000,
        clicks: 200,
        conversions: 12,
        cost: 48.0,
        ctr: 0.0,
        cpc: 0.0,
    }
}

fn engine(store: Arc<FakeStore>, source: FakeSource) -> SyncEngine {
    SyncEngine::new(store, Arc::new(source))
}

#[tokio::test]
async fn zero_active_accounts_reports_no_accounts_and_writes_nothing() {
    let user_id = Uuid::new_v4();
    let store = Arc::new(FakeStore::with_accounts(vec![account(
        user_id,
        Platform::GoogleAds,
        false,
    )]));
    let engine = engine(store.clone(), FakeSource::new(HashMap::new()));

    let outcome = engine.sync_user(user_id).await.unwrap();

    assert_eq!(outcome, SyncOutcome::NoActiveAccounts);
    assert_eq!(store.campaign_count(), 0);
}

#[tokio::test]
async fn one_failing_account_does_not_stop_the_other() {
    let user_id = Uuid::new_v4();
    let good = account(user_id, Platform::MetaAds, true);
    let bad = account(user_id, Platform::GoogleAds, true);

    // Only the Meta account has a canned response; the Google one fails.
    let mut responses = HashMap::new();
    responses.insert(good.id, vec![remote("m1", "Summer Sale"), remote("m2", "Retargeting")]);

    let store = Arc::new(FakeStore::with_accounts(vec![bad, good]));
    let engine = engine(store.clone(), FakeSource::new(responses));

    let outcome = engine.sync_user(user_id).await.unwrap();

    assert_eq!(outcome, SyncOutcome::Synced { campaigns_synced: 2 });
    assert_eq!(store.campaign_count(), 2);
    assert!(store.campaign_named("Summer Sale").is_some());
}

#[tokio::test]
async fn repeated_sync_updates_rows_in_place() {
    let user_id = Uuid::new_v4();
    let acct = account(user_id, Platform::MetaAds, true);

    let mut responses = HashMap::new();
    responses.insert(acct.id, vec![remote("m1", "Summer Sale")]);
    let store = Arc::new(FakeStore::with_accounts(vec![acct.clone()]));
    let engine = engine(store.clone(), FakeSource::new(responses));

    engine.sync_user(user_id).await.unwrap();
    let first = store.campaign_named("Summer Sale").unwrap();

    engine.sync_user(user_id).await.unwrap();
    assert_eq!(store.campaign_count(), 1);
    let second = store.campaign_named("Summer Sale").unwrap();
    assert_eq!(second.id, first.id);
}

#[tokio::test]
async fn single_campaign_sync_records_a_low_priority_notification() {
    let user_id = Uuid::new_v4();
    let acct = account(user_id, Platform::MetaAds, true);

    let mut responses = HashMap::new();
    responses.insert(acct.id, vec![remote("m1", "Summer Sale")]);
    let store = Arc::new(FakeStore::with_accounts(vec![acct.clone()]));
    let engine = engine(store.clone(), FakeSource::new(responses));

    // Seed the row the refresh will target.
    let seeded = store
        .upsert_campaign(&CampaignUpsert {
            user_id,
            ad_account_id: acct.id,
            platform: Platform::MetaAds,
            campaign_id: "m1".to_string(),
            campaign_name: "Summer Sale".to_string(),
            status: "PAUSED".to_string(),
            budget_amount: 0.0,
            currency: "USD".to_string(),
            impressions: 0,
            clicks: 0,
            conversions: 0,
            cost: 0.0,
            ctr: 0.0,
            cpc: 0.0,
        })
        .await
        .unwrap();

    let updated = engine.sync_single_campaign(user_id, seeded.id).await.unwrap();

    assert_eq!(updated.id, seeded.id);
    assert_eq!(updated.status, "ACTIVE");
    assert_eq!(updated.impressions, 10_000);

    let notifications = store.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].notification_type, "campaign_update");
    assert_eq!(notifications[0].priority, "low");
    assert_eq!(notifications[0].campaign_id, Some(seeded.id));
}

#[tokio::test]
async fn single_campaign_sync_of_unknown_id_is_an_error() {
    let user_id = Uuid::new_v4();
    let store = Arc::new(FakeStore::with_accounts(vec![]));
    let engine = engine(store, FakeSource::new(HashMap::new()));

    let err = engine.sync_single_campaign(user_id, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, SyncError::CampaignNotFound));
}

#[tokio::test]
async fn campaign_dropped_upstream_reports_not_found() {
    let user_id = Uuid::new_v4();
    let acct = account(user_id, Platform::GoogleAds, true);

    // Upstream no longer lists the campaign we hold locally.
    let mut responses = HashMap::new();
    responses.insert(acct.id, vec![remote("other", "Different Campaign")]);
    let store = Arc::new(FakeStore::with_accounts(vec![acct.clone()]));
    let engine = engine(store.clone(), FakeSource::new(responses));

    let seeded = store
        .upsert_campaign(&CampaignUpsert {
            user_id,
            ad_account_id: acct.id,
            platform: Platform::GoogleAds,
            campaign_id: "gone".to_string(),
            campaign_name: "Stale".to_string(),
            status: "ENABLED".to_string(),
            budget_amount: 5.0,
            currency: "USD".to_string(),
            impressions: 0,
            clicks: 0,
            conversions: 0,
            cost: 0.0,
            ctr: 0.0,
            cpc: 0.0,
        })
        .await
        .unwrap();

    let err = engine.sync_single_campaign(user_id, seeded.id).await.unwrap_err();
    assert!(matches!(err, SyncError::CampaignNotFound));
}
