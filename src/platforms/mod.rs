pub mod google;
pub mod meta;

use crate::models::{AdAccount, Platform};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("API request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Account has no stored access token")]
    MissingAccessToken,
}

/// A campaign as reported by an ad platform, already mapped onto the
/// common schema. Google's list call carries no metrics, so those arrive
/// zeroed; Meta fills them from the embedded insights.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCampaign {
    pub campaign_id: String,
    pub name: String,
    pub status: String,
    pub budget_amount: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub cost: f64,
    pub ctr: f64,
    pub cpc: f64,
}

impl RemoteCampaign {
    pub fn with_zero_metrics(campaign_id: String, name: String, status: String, budget_amount: f64) -> Self {
        Self {
            campaign_id,
            name,
            status,
            budget_amount,
            impressions: 0,
            clicks: 0,
            conversions: 0,
            cost: 0.0,
            ctr: 0.0,
            cpc: 0.0,
        }
    }
}

/// Where the sync engine reads campaigns from. The live implementation
/// talks to the ad platform APIs; tests substitute a fake.
#[async_trait]
pub trait CampaignSource: Send + Sync {
    async fn fetch_campaigns(&self, account: &AdAccount) -> Result<Vec<RemoteCampaign>, PlatformError>;
}

/// Dispatches to the per-platform API client for the account's platform.
pub struct LiveCampaignSource {
    developer_token: String,
}

impl LiveCampaignSource {
    pub fn new(developer_token: String) -> Self {
        Self { developer_token }
    }
}

#[async_trait]
impl CampaignSource for LiveCampaignSource {
    async fn fetch_campaigns(&self, account: &AdAccount) -> Result<Vec<RemoteCampaign>, PlatformError> {
        let token = account
            .access_token_encrypted
            .as_deref()
            .ok_or(PlatformError::MissingAccessToken)?;

        match account.platform {
            Platform::GoogleAds => {
                google::GoogleAdsApi::new(token, &account.account_id, &self.developer_token)
                    .list_campaigns()
                    .await
            }
            Platform::MetaAds => {
                meta::MetaAdsApi::new(token, &account.account_id)
                    .list_campaigns()
                    .await
            }
        }
    }
}
