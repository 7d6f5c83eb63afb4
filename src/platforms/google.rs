use super::{PlatformError, RemoteCampaign};
use crate::constants::{GOOGLE_ADS_API_VERSION, GOOGLE_ADS_BASE_URL};
use reqwest::Client;

const MICROS_PER_UNIT: f64 = 1_000_000.0;

pub struct GoogleAdsApi {
    client: Client,
    access_token: String,
    customer_id: String,
    developer_token: String,
    base_url: String,
}

impl GoogleAdsApi {
    pub fn new(access_token: &str, customer_id: &str, developer_token: &str) -> Self {
        Self {
            client: Client::new(),
            access_token: access_token.to_string(),
            customer_id: customer_id.to_string(),
            developer_token: developer_token.to_string(),
            base_url: format!("{}/{}", GOOGLE_ADS_BASE_URL, GOOGLE_ADS_API_VERSION),
        }
    }

    /// One list call per account; single-page results are assumed.
    pub async fn list_campaigns(&self) -> Result<Vec<RemoteCampaign>, PlatformError> {
        let url = format!("{}/customers/{}/campaigns", self.base_url, self.customer_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .header("developer-token", &self.developer_token)
            .send()
            .await
            .map_err(|e| PlatformError::RequestFailed(e.to_string()))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PlatformError::InvalidResponse(e.to_string()))?;

        Ok(parse_campaigns(&body))
    }
}

/// Maps the `results[].campaign` objects onto the common schema. Budget
/// arrives in micros and is converted to currency units; an absent budget
/// is treated as zero. The list call reports no metrics.
pub(crate) fn parse_campaigns(body: &serde_json::Value) -> Vec<RemoteCampaign> {
    let mut campaigns = Vec::new();

    if let Some(results) = body["results"].as_array() {
        for result in results {
            let campaign = &result["campaign"];
            let budget_micros = campaign["campaign_budget"]["amount_micros"]
                .as_f64()
                .or_else(|| {
                    campaign["campaign_budget"]["amount_micros"]
                        .as_str()
                        .and_then(|s| s.parse().ok())
                })
                .unwrap_or(0.0);

            campaigns.push(RemoteCampaign::with_zero_metrics(
                value_to_id(&campaign["id"]),
                campaign["name"].as_str().unwrap_or("").to_string(),
                campaign["status"].as_str().unwrap_or("").to_string(),
                micros_to_units(budget_micros),
            ));
        }
    }

    campaigns
}

pub(crate) fn micros_to_units(micros: f64) -> f64 {
    micros / MICROS_PER_UNIT
}

// Campaign ids come back as JSON numbers or strings depending on the
// serving endpoint.
fn value_to_id(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_budget_micros_to_currency_units() {
        assert_eq!(micros_to_units(2_500_000.0), 2.5);
        assert_eq!(micros_to_units(0.0), 0.0);
    }

    #[test]
    fn parses_campaign_list_results() {
        let body = json!({
            "results": [
                {
                    "campaign": {
                        "id": "111222333",
                        "name": "Brand Search",
                        "status": "ENABLED",
                        "campaign_budget": { "amount_micros": 15_000_000.0 }
                    }
                },
                {
                    "campaign": {
                        "id": 444555666u64,
                        "name": "Display Retargeting",
                        "status": "PAUSED"
                    }
                }
            ]
        });

        let campaigns = parse_campaigns(&body);
        assert_eq!(campaigns.len(), 2);

        assert_eq!(campaigns[0].campaign_id, "111222333");
        assert_eq!(campaigns[0].name, "Brand Search");
        assert_eq!(campaigns[0].status, "ENABLED");
        assert_eq!(campaigns[0].budget_amount, 15.0);
        assert_eq!(campaigns[0].impressions, 0);

        // Absent budget maps to zero
        assert_eq!(campaigns[1].campaign_id, "444555666");
        assert_eq!(campaigns[1].budget_amount, 0.0);
    }

    #[test]
    fn empty_or_malformed_body_yields_no_campaigns() {
        assert!(parse_campaigns(&json!({})).is_empty());
        assert!(parse_campaigns(&json!({"results": "nope"})).is_empty());
    }
}
