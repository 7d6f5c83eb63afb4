use crate::db::{Database, DatabaseError};
use crate::models::{AdAccount, Campaign, CampaignUpsert, NewNotification};
use crate::platforms::{CampaignSource, PlatformError, RemoteCampaign};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::time::{self, Duration};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
    #[error("Campaign not found")]
    CampaignNotFound,
    #[error("Ad account not found")]
    AccountNotFound,
}

/// The store operations the sync engine needs. [`Database`] implements
/// this; tests use an in-memory fake.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn active_ad_accounts_for_user(&self, user_id: Uuid) -> Result<Vec<AdAccount>, DatabaseError>;
    async fn all_active_ad_accounts(&self) -> Result<Vec<AdAccount>, DatabaseError>;
    async fn campaign(&self, user_id: Uuid, id: Uuid) -> Result<Option<Campaign>, DatabaseError>;
    async fn ad_account(&self, user_id: Uuid, id: Uuid) -> Result<Option<AdAccount>, DatabaseError>;
    async fn upsert_campaign(&self, up: &CampaignUpsert) -> Result<Campaign, DatabaseError>;
    async fn insert_sync_notification(&self, new: &NewNotification) -> Result<(), DatabaseError>;
}

#[async_trait]
impl CampaignStore for Database {
    async fn active_ad_accounts_for_user(&self, user_id: Uuid) -> Result<Vec<AdAccount>, DatabaseError> {
        Database::active_ad_accounts_for_user(self, user_id).await
    }

    async fn all_active_ad_accounts(&self) -> Result<Vec<AdAccount>, DatabaseError> {
        Database::all_active_ad_accounts(self).await
    }

    async fn campaign(&self, user_id: Uuid, id: Uuid) -> Result<Option<Campaign>, DatabaseError> {
        Database::campaign(self, user_id, id).await
    }

    async fn ad_account(&self, user_id: Uuid, id: Uuid) -> Result<Option<AdAccount>, DatabaseError> {
        Database::ad_account(self, user_id, id).await
    }

    async fn upsert_campaign(&self, up: &CampaignUpsert) -> Result<Campaign, DatabaseError> {
        Database::upsert_campaign(self, up).await
    }

    async fn insert_sync_notification(&self, new: &NewNotification) -> Result<(), DatabaseError> {
        Database::insert_notification(self, new).await.map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    NoActiveAccounts,
    Synced { campaigns_synced: usize },
}

/// Pulls campaigns from the connected platforms and upserts them keyed on
/// `(campaign_id, platform)`. A failure on one account is logged and the
/// loop continues with the next; the outcome reports the total synced
/// across succeeding accounts.
pub struct SyncEngine {
    store: Arc<dyn CampaignStore>,
    source: Arc<dyn CampaignSource>,
}

impl SyncEngine {
    pub fn new(store: Arc<dyn CampaignStore>, source: Arc<dyn CampaignSource>) -> Self {
        Self { store, source }
    }

    /// Sync every active account of one user.
    pub async fn sync_user(&self, user_id: Uuid) -> Result<SyncOutcome, SyncError> {
        let accounts = self.store.active_ad_accounts_for_user(user_id).await?;
        if accounts.is_empty() {
            return Ok(SyncOutcome::NoActiveAccounts);
        }

        Ok(SyncOutcome::Synced {
            campaigns_synced: self.sync_accounts(&accounts).await,
        })
    }

    async fn sync_accounts(&self, accounts: &[AdAccount]) -> usize {
        let mut total = 0;
        for account in accounts {
            match self.sync_account(account).await {
                Ok(synced) => total += synced,
                Err(e) => {
                    tracing::error!(account = %account.id, error = %e, "error syncing account");
                }
            }
        }
        total
    }

    async fn sync_account(&self, account: &AdAccount) -> Result<usize, SyncError> {
        let remote = self.source.fetch_campaigns(account).await?;
        let mut synced = 0;
        for campaign in &remote {
            self.store
                .upsert_campaign(&upsert_from_remote(account, campaign))
                .await?;
            synced += 1;
        }
        tracing::debug!(account = %account.id, platform = %account.platform, synced, "account synced");
        Ok(synced)
    }

    /// Refresh one campaign from its platform and record a low-priority
    /// notification about the update.
    pub async fn sync_single_campaign(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
    ) -> Result<Campaign, SyncError> {
        let campaign = self
            .store
            .campaign(user_id, campaign_id)
            .await?
            .ok_or(SyncError::CampaignNotFound)?;
        let account = self
            .store
            .ad_account(user_id, campaign.ad_account_id)
            .await?
            .ok_or(SyncError::AccountNotFound)?;

        let remote = self.source.fetch_campaigns(&account).await?;
        let matched = remote
            .into_iter()
            .find(|r| r.campaign_id == campaign.campaign_id)
            .ok_or(SyncError::CampaignNotFound)?;

        let updated = self
            .store
            .upsert_campaign(&upsert_from_remote(&account, &matched))
            .await?;

        self.store
            .insert_sync_notification(&NewNotification {
                user_id,
                notification_type: "campaign_update".to_string(),
                title: "Campaign updated".to_string(),
                message: format!("Campaign data for {} was synced", updated.campaign_name),
                priority: "low".to_string(),
                campaign_id: Some(updated.id),
            })
            .await?;

        Ok(updated)
    }

    /// Background loop: bulk sync every active account on a fixed
    /// interval. Errors never stop the loop.
    pub async fn run(&self, interval: Duration) {
        loop {
            match self.store.all_active_ad_accounts().await {
                Ok(accounts) => {
                    tracing::info!(accounts = accounts.len(), "starting scheduled campaign sync");
                    let synced = self.sync_accounts(&accounts).await;
                    tracing::info!(campaigns_synced = synced, "scheduled campaign sync finished");
                }
                Err(e) => {
                    tracing::error!(error = %e, "could not load accounts for scheduled sync");
                }
            }

            time::sleep(interval).await;
        }
    }
}

/// Maps a platform campaign onto the upsert payload, deriving CTR and CPC
/// when the platform did not report them.
pub fn upsert_from_remote(account: &AdAccount, remote: &RemoteCampaign) -> CampaignUpsert {
    CampaignUpsert {
        user_id: account.user_id,
        ad_account_id: account.id,
        platform: account.platform,
        campaign_id: remote.campaign_id.clone(),
        campaign_name: remote.name.clone(),
        status: remote.status.clone(),
        budget_amount: remote.budget_amount,
        currency: "USD".to_string(),
        impressions: remote.impressions,
        clicks: remote.clicks,
        conversions: remote.conversions,
        cost: remote.cost,
        ctr: derive_ctr(remote),
        cpc: derive_cpc(remote),
    }
}

/// Click-through rate as a percentage: clicks / impressions. Platforms
/// that already report it win over the derived value.
fn derive_ctr(remote: &RemoteCampaign) -> f64 {
    if remote.ctr != 0.0 {
        return remote.ctr;
    }
    if remote.impressions > 0 {
        remote.clicks as f64 / remote.impressions as f64 * 100.0
    } else {
        0.0
    }
}

/// Cost per click: cost / clicks.
fn derive_cpc(remote: &RemoteCampaign) -> f64 {
    if remote.cpc != 0.0 {
        return remote.cpc;
    }
    if remote.clicks > 0 {
        remote.cost / remote.clicks as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::Platform;

    fn account() -> AdAccount {
        AdAccount {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            platform: Platform::MetaAds,
            account_id: "act_1".to_string(),
            account_name: "Acme".to_string(),
            access_token_encrypted: Some("token".to_string()),
            refresh_token_encrypted: None,
            expires_at: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn remote(impressions: i64, clicks: i64, cost: f64, ctr: f64, cpc: f64) -> RemoteCampaign {
        RemoteCampaign {
            campaign_id: "c1".to_string(),
            name: "Campaign".to_string(),
            status: "ACTIVE".to_string(),
            budget_amount: 10.0,
            impressions,
            clicks,
            conversions: 0,
            cost,
            ctr,
            cpc,
        }
    }

    #[test]
    fn derives_ctr_and_cpc_when_not_reported() {
        let up = upsert_from_remote(&account(), &remote(2000, 40, 12.0, 0.0, 0.0));
        assert_eq!(up.ctr, 2.0);
        assert_eq!(up.cpc, 0.3);
    }

    #[test]
    fn reported_ctr_and_cpc_are_kept() {
        let up = upsert_from_remote(&account(), &remote(2000, 40, 12.0, 1.85, 0.27));
        assert_eq!(up.ctr, 1.85);
        assert_eq!(up.cpc, 0.27);
    }

    #[test]
    fn zero_traffic_yields_zero_rates() {
        let up = upsert_from_remote(&account(), &remote(0, 0, 0.0, 0.0, 0.0));
        assert_eq!(up.ctr, 0.0);
        assert_eq!(up.cpc, 0.0);
    }

    #[test]
    fn upsert_carries_the_account_scope() {
        let acct = account();
        let up = upsert_from_remote(&acct, &remote(1, 1, 1.0, 0.0, 0.0));
        assert_eq!(up.user_id, acct.user_id);
        assert_eq!(up.ad_account_id, acct.id);
        assert_eq!(up.platform, acct.platform);
    }
}
