use super::{PlatformError, RemoteCampaign};
use crate::constants::{META_API_VERSION, META_CAMPAIGN_FIELDS, META_GRAPH_BASE_URL};
use reqwest::Client;
use serde_json::Value;

pub struct MetaAdsApi {
    client: Client,
    access_token: String,
    account_id: String,
    base_url: String,
}

impl MetaAdsApi {
    pub fn new(access_token: &str, account_id: &str) -> Self {
        Self {
            client: Client::new(),
            access_token: access_token.to_string(),
            account_id: account_id.to_string(),
            base_url: format!("{}/{}", META_GRAPH_BASE_URL, META_API_VERSION),
        }
    }

    /// One call with the insights sub-query embedded; single-page results
    /// are assumed.
    pub async fn list_campaigns(&self) -> Result<Vec<RemoteCampaign>, PlatformError> {
        let url = format!("{}/{}/campaigns", self.base_url, self.account_id);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("fields", META_CAMPAIGN_FIELDS),
                ("access_token", &self.access_token),
            ])
            .send()
            .await
            .map_err(|e| PlatformError::RequestFailed(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| PlatformError::InvalidResponse(e.to_string()))?;

        Ok(parse_campaigns(&body))
    }
}

/// Maps the Graph API `data[]` objects onto the common schema. The Graph
/// API reports numeric fields as strings; absent insights mean the
/// campaign had no delivery in the window and all metrics are zero.
pub(crate) fn parse_campaigns(body: &Value) -> Vec<RemoteCampaign> {
    let mut campaigns = Vec::new();

    if let Some(data) = body["data"].as_array() {
        for campaign in data {
            let insights = campaign
                .get("insights")
                .and_then(|i| i.get("data"))
                .and_then(|d| d.get(0))
                .unwrap_or(&Value::Null);

            campaigns.push(RemoteCampaign {
                campaign_id: campaign["id"].as_str().unwrap_or("").to_string(),
                name: campaign["name"].as_str().unwrap_or("").to_string(),
                status: campaign["status"].as_str().unwrap_or("").to_string(),
                budget_amount: lenient_f64(&campaign["daily_budget"]),
                impressions: lenient_i64(&insights["impressions"]),
                clicks: lenient_i64(&insights["clicks"]),
                conversions: lenient_i64(&insights["conversions"]),
                cost: lenient_f64(&insights["spend"]),
                ctr: lenient_f64(&insights["ctr"]),
                cpc: lenient_f64(&insights["cpc"]),
            });
        }
    }

    campaigns
}

/// Graph API numerics arrive either as JSON numbers or as strings;
/// anything unparseable counts as zero.
pub(crate) fn lenient_f64(value: &Value) -> f64 {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
        .unwrap_or(0.0)
}

pub(crate) fn lenient_i64(value: &Value) -> i64 {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_string_typed_numeric_fields() {
        assert_eq!(lenient_f64(&json!("12.75")), 12.75);
        assert_eq!(lenient_f64(&json!(3.5)), 3.5);
        assert_eq!(lenient_f64(&json!("n/a")), 0.0);
        assert_eq!(lenient_i64(&json!("4821")), 4821);
        assert_eq!(lenient_i64(&json!(17)), 17);
        assert_eq!(lenient_i64(&json!(null)), 0);
    }

    #[test]
    fn parses_campaigns_with_insights() {
        let body = json!({
            "data": [
                {
                    "id": "238401",
                    "name": "Summer Sale",
                    "status": "ACTIVE",
                    "daily_budget": "5000",
                    "insights": {
                        "data": [
                            {
                                "spend": "321.45",
                                "impressions": "90210",
                                "clicks": "1810",
                                "cpc": "0.18",
                                "ctr": "2.01",
                                "conversions": "64"
                            }
                        ]
                    }
                }
            ]
        });

        let campaigns = parse_campaigns(&body);
        assert_eq!(campaigns.len(), 1);

        let c = &campaigns[0];
        assert_eq!(c.campaign_id, "238401");
        assert_eq!(c.name, "Summer Sale");
        assert_eq!(c.status, "ACTIVE");
        assert_eq!(c.budget_amount, 5000.0);
        assert_eq!(c.cost, 321.45);
        assert_eq!(c.impressions, 90210);
        assert_eq!(c.clicks, 1810);
        assert_eq!(c.cpc, 0.18);
        assert_eq!(c.ctr, 2.01);
        assert_eq!(c.conversions, 64);
    }

    #[test]
    fn absent_insights_zero_the_metrics() {
        let body = json!({
            "data": [
                { "id": "9", "name": "Dormant", "status": "PAUSED" }
            ]
        });

        let campaigns = parse_campaigns(&body);
        assert_eq!(campaigns[0].budget_amount, 0.0);
        assert_eq!(campaigns[0].impressions, 0);
        assert_eq!(campaigns[0].cost, 0.0);
    }

    #[test]
    fn missing_data_array_yields_no_campaigns() {
        assert!(parse_campaigns(&json!({"error": {"message": "expired token"}})).is_empty());
    }
}
