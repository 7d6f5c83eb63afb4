// API Versions
pub const GOOGLE_ADS_API_VERSION: &str = "v14";
pub const META_API_VERSION: &str = "v18.0";

// API Base URLs
pub const GOOGLE_ADS_BASE_URL: &str = "https://googleads.googleapis.com";
pub const GOOGLE_OAUTH_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_OAUTH_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const META_GRAPH_BASE_URL: &str = "https://graph.facebook.com";
pub const META_DIALOG_BASE_URL: &str = "https://www.facebook.com";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

// OAuth Scopes
pub const GOOGLE_ADS_SCOPE: &str = "https://www.googleapis.com/auth/adwords";
pub const META_ADS_SCOPES: &str = "ads_management,ads_read,business_management";

// Chat Models
pub const INSIGHTS_MODEL: &str = "gpt-4o-mini";
pub const ASSISTANT_MODEL: &str = "gpt-4.1-2025-04-14";

// Worker Settings
pub const WORKER_INTERVAL_SECS: u64 = 1800; // 30 minutes

// Meta Marketing API Fields
pub const META_CAMPAIGN_FIELDS: &str =
    "id,name,status,daily_budget,insights.date_preset(last_30d){spend,impressions,clicks,cpc,ctr,conversions}";
pub const META_AD_ACCOUNT_FIELDS: &str = "id,name,account_status";
