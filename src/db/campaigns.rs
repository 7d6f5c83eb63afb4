use super::{Database, DatabaseError};
use crate::events::{ChangeEvent, ChangeOp, ChangeTable};
use crate::models::{Campaign, CampaignUpsert};
use tokio_postgres::Row;
use uuid::Uuid;

const CAMPAIGN_COLUMNS: &str = "id, user_id, ad_account_id, platform, campaign_id, campaign_name, \
     status, budget_amount, currency, impressions, clicks, conversions, cost, ctr, cpc, \
     last_synced_at, created_at, updated_at";

fn campaign_from_row(row: &Row) -> Result<Campaign, DatabaseError> {
    let platform: String = row.get("platform");
    Ok(Campaign {
        id: row.get("id"),
        user_id: row.get("user_id"),
        ad_account_id: row.get("ad_account_id"),
        platform: platform
            .parse()
            .map_err(|e: crate::models::UnknownPlatform| DatabaseError::UnexpectedValue(e.to_string()))?,
        campaign_id: row.get("campaign_id"),
        campaign_name: row.get("campaign_name"),
        status: row.get("status"),
        budget_amount: row.get("budget_amount"),
        currency: row.get("currency"),
        impressions: row.get("impressions"),
        clicks: row.get("clicks"),
        conversions: row.get("conversions"),
        cost: row.get("cost"),
        ctr: row.get("ctr"),
        cpc: row.get("cpc"),
        last_synced_at: row.get("last_synced_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

impl Database {
    pub async fn campaigns_for_user(&self, user_id: Uuid) -> Result<Vec<Campaign>, DatabaseError> {
        let rows = self
            .client
            .query(
                &format!(
                    "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE user_id = $1 ORDER BY created_at DESC"
                ),
                &[&user_id],
            )
            .await?;
        rows.iter().map(campaign_from_row).collect()
    }

    /// Most recently created campaigns, used as context for the assistant.
    pub async fn recent_campaigns(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Campaign>, DatabaseError> {
        let rows = self
            .client
            .query(
                &format!(
                    "SELECT {CAMPAIGN_COLUMNS} FROM campaigns \
                     WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
                ),
                &[&user_id, &limit],
            )
            .await?;
        rows.iter().map(campaign_from_row).collect()
    }

    pub async fn campaign(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Campaign>, DatabaseError> {
        let row = self
            .client
            .query_opt(
                &format!("SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE id = $1 AND user_id = $2"),
                &[&id, &user_id],
            )
            .await?;
        row.as_ref().map(campaign_from_row).transpose()
    }

    /// Insert-or-update keyed on `(campaign_id, platform)`, stamping
    /// `last_synced_at`. Publishes a campaigns change event on success.
    pub async fn upsert_campaign(&self, up: &CampaignUpsert) -> Result<Campaign, DatabaseError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO campaigns \
                     (user_id, ad_account_id, platform, campaign_id, campaign_name, status, \
                      budget_amount, currency, impressions, clicks, conversions, cost, ctr, cpc, \
                      last_synced_at) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, NOW()) \
                     ON CONFLICT (campaign_id, platform) DO UPDATE SET \
                       campaign_name = EXCLUDED.campaign_name, \
                       status = EXCLUDED.status, \
                       budget_amount = EXCLUDED.budget_amount, \
                       currency = EXCLUDED.currency, \
                       impressions = EXCLUDED.impressions, \
                       clicks = EXCLUDED.clicks, \
                       conversions = EXCLUDED.conversions, \
                       cost = EXCLUDED.cost, \
                       ctr = EXCLUDED.ctr, \
                       cpc = EXCLUDED.cpc, \
                       last_synced_at = NOW(), \
                       updated_at = NOW() \
                     RETURNING {CAMPAIGN_COLUMNS}"
                ),
                &[
                    &up.user_id,
                    &up.ad_account_id,
                    &up.platform.as_str(),
                    &up.campaign_id,
                    &up.campaign_name,
                    &up.status,
                    &up.budget_amount,
                    &up.currency,
                    &up.impressions,
                    &up.clicks,
                    &up.conversions,
                    &up.cost,
                    &up.ctr,
                    &up.cpc,
                ],
            )
            .await?;

        let campaign = campaign_from_row(&row)?;
        self.events().publish(ChangeEvent {
            table: ChangeTable::Campaigns,
            op: ChangeOp::Update,
            user_id: campaign.user_id,
            row: serde_json::to_value(&campaign).unwrap_or_default(),
        });
        Ok(campaign)
    }
}
