use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Connected advertising platform. Stored as text in the database
/// (`google_ads` / `meta_ads`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    GoogleAds,
    MetaAds,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::GoogleAds => "google_ads",
            Platform::MetaAds => "meta_ads",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google_ads" => Ok(Platform::GoogleAds),
            "meta_ads" => Ok(Platform::MetaAds),
            other => Err(UnknownPlatform(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub platform: Platform,
    pub account_id: String,
    pub account_name: String,
    pub access_token_encrypted: Option<String>,
    pub refresh_token_encrypted: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewAdAccount {
    pub user_id: Uuid,
    pub platform: Platform,
    pub account_id: String,
    pub account_name: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Campaign {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ad_account_id: Uuid,
    pub platform: Platform,
    pub campaign_id: String,
    pub campaign_name: String,
    pub status: String,
    pub budget_amount: f64,
    pub currency: String,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub cost: f64,
    pub ctr: f64,
    pub cpc: f64,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for the `(campaign_id, platform)` keyed upsert performed by the
/// sync engine.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CampaignUpsert {
    pub user_id: Uuid,
    pub ad_account_id: Uuid,
    pub platform: Platform,
    pub campaign_id: String,
    pub campaign_name: String,
    pub status: String,
    pub budget_amount: f64,
    pub currency: String,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub cost: f64,
    pub ctr: f64,
    pub cpc: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AutomationRule {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub rule_type: String,
    pub condition_type: String,
    pub condition_value: f64,
    pub action_type: String,
    pub action_value: Option<f64>,
    /// Target campaign ids. Empty means the rule applies to all campaigns.
    pub campaigns: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BudgetGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub month_year: String,
    pub monthly_budget: f64,
    pub target_ctr: Option<f64>,
    pub target_cpc: Option<f64>,
    pub target_roas: Option<f64>,
    pub target_conversions: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AlertSetting {
    pub id: Uuid,
    pub user_id: Uuid,
    pub alert_type: String,
    pub threshold_value: Option<f64>,
    pub is_enabled: bool,
    pub email_enabled: bool,
    pub push_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AutomatedReport {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub report_type: String,
    pub schedule_day: Option<i32>,
    pub email_recipients: Vec<String>,
    pub is_active: bool,
    pub last_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub priority: String,
    pub campaign_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub priority: String,
    pub campaign_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CampaignComment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub comment: String,
    pub is_internal: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TeamMember {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub member_id: Uuid,
    pub role: String,
    pub permissions: Vec<String>,
    pub is_active: bool,
    pub invited_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Audit trail row. The contextual assistant logs its interactions here
/// with `action = "ai_interaction"`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChangeEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub campaign_id: Option<Uuid>,
    pub field_changed: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AiInsight {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub insights: String,
    pub campaign_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewAutomationRule {
    pub name: String,
    pub rule_type: String,
    pub condition_type: String,
    pub condition_value: f64,
    pub action_type: String,
    pub action_value: Option<f64>,
    #[serde(default)]
    pub campaigns: Vec<String>,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AutomationRulePatch {
    pub name: Option<String>,
    pub rule_type: Option<String>,
    pub condition_type: Option<String>,
    pub condition_value: Option<f64>,
    pub action_type: Option<String>,
    pub action_value: Option<f64>,
    pub campaigns: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewBudgetGoal {
    pub campaign_id: Option<Uuid>,
    pub month_year: String,
    pub monthly_budget: f64,
    pub target_ctr: Option<f64>,
    pub target_cpc: Option<f64>,
    pub target_roas: Option<f64>,
    pub target_conversions: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BudgetGoalPatch {
    pub month_year: Option<String>,
    pub monthly_budget: Option<f64>,
    pub target_ctr: Option<f64>,
    pub target_cpc: Option<f64>,
    pub target_roas: Option<f64>,
    pub target_conversions: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewAlertSetting {
    pub alert_type: String,
    pub threshold_value: Option<f64>,
    #[serde(default = "default_true")]
    pub is_enabled: bool,
    #[serde(default)]
    pub email_enabled: bool,
    #[serde(default = "default_true")]
    pub push_enabled: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AlertSettingPatch {
    pub alert_type: Option<String>,
    pub threshold_value: Option<f64>,
    pub email_enabled: Option<bool>,
    pub push_enabled: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewAutomatedReport {
    pub name: String,
    pub report_type: String,
    pub schedule_day: Option<i32>,
    #[serde(default)]
    pub email_recipients: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AutomatedReportPatch {
    pub name: Option<String>,
    pub report_type: Option<String>,
    pub schedule_day: Option<i32>,
    pub email_recipients: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewCampaignComment {
    pub campaign_id: Option<Uuid>,
    pub comment: String,
    #[serde(default)]
    pub is_internal: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewTeamMember {
    pub member_id: Uuid,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TeamMemberPatch {
    pub role: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub accepted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProfilePatch {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_round_trips_through_text() {
        assert_eq!(Platform::GoogleAds.as_str(), "google_ads");
        assert_eq!("meta_ads".parse::<Platform>().unwrap(), Platform::MetaAds);
        assert!("tiktok_ads".parse::<Platform>().is_err());
    }

    #[test]
    fn platform_serializes_snake_case() {
        let json = serde_json::to_string(&Platform::MetaAds).unwrap();
        assert_eq!(json, "\"meta_ads\"");
    }
}
