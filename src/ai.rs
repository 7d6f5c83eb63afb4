use crate::constants::OPENAI_BASE_URL;
use crate::models::{AlertSetting, AutomationRule, Campaign};
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("API request failed: {0}")]
    RequestFailed(String),
    #[error("Chat API error: {0}")]
    Api(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Invalid action")]
    InvalidAction,
}

/// The canned analyses offered by the marketing-insights endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightAction {
    AnalyzePerformance,
    OptimizeSuggestions,
    ForecastAnalysis,
}

impl InsightAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightAction::AnalyzePerformance => "analyze_performance",
            InsightAction::OptimizeSuggestions => "optimize_suggestions",
            InsightAction::ForecastAnalysis => "forecast_analysis",
        }
    }
}

impl fmt::Display for InsightAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsightAction {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "analyze_performance" => Ok(InsightAction::AnalyzePerformance),
            "optimize_suggestions" => Ok(InsightAction::OptimizeSuggestions),
            "forecast_analysis" => Ok(InsightAction::ForecastAnalysis),
            _ => Err(AiError::InvalidAction),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// Thin client for the chat-completions API.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    pub async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        max_tokens: Option<u32>,
        temperature: f64,
    ) -> Result<String, AiError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut payload = json!({
            "model": model,
            "messages": messages,
            "temperature": temperature,
        });
        if let Some(max_tokens) = max_tokens {
            payload["max_tokens"] = max_tokens.into();
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            let message = body["error"]["message"].as_str().unwrap_or("Unknown error");
            return Err(AiError::Api(message.to_string()));
        }

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AiError::InvalidResponse("missing message content".to_string()))
    }
}

pub const INSIGHTS_SYSTEM_PROMPT: &str =
    "You are a digital marketing specialist focused on advertising campaign analysis.";

/// Builds the user prompt for an insight action around the pretty-printed
/// campaign payload.
pub fn insight_prompt(action: InsightAction, campaign_data: &Value) -> String {
    let data = serde_json::to_string_pretty(campaign_data).unwrap_or_default();

    match action {
        InsightAction::AnalyzePerformance => format!(
            "Analyze the performance of the following campaigns:\n{data}\n\n\
             Provide insights on:\n\
             1. Campaigns with the best ROI\n\
             2. Optimization suggestions\n\
             3. Growth opportunities\n\
             4. Important alerts"
        ),
        InsightAction::OptimizeSuggestions => format!(
            "Based on the campaign data:\n{data}\n\n\
             Provide specific recommendations for:\n\
             1. Budget adjustments\n\
             2. Keyword optimization\n\
             3. CTR improvement\n\
             4. CPC reduction"
        ),
        InsightAction::ForecastAnalysis => format!(
            "Analyze the campaign trends:\n{data}\n\n\
             Provide forecasts for:\n\
             1. Expected performance next month\n\
             2. Recommended budget\n\
             3. Growth potential\n\
             4. Identified risks"
        ),
    }
}

/// System prompt for the contextual assistant, embedding the user's
/// current screen and a digest of their data.
pub fn contextual_system_prompt(
    context: &str,
    campaigns: &[Campaign],
    alerts: &[AlertSetting],
    rules: &[AutomationRule],
) -> String {
    let campaign_lines = campaigns
        .iter()
        .map(|c| {
            format!(
                "- {}: Impressions: {}, Clicks: {}, CPC: ${:.2}",
                c.campaign_name, c.impressions, c.clicks, c.cpc
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a digital marketing assistant specialized in advertising campaigns.\n\n\
         Current user context:\n\
         - Current screen: {context}\n\
         - Active campaigns: {}\n\
         - Configured alerts: {}\n\
         - Automation rules: {}\n\n\
         Campaign data:\n{campaign_lines}\n\n\
         Provide personalized insights, optimization suggestions and answers \
         specific to the user's current context.",
        campaigns.len(),
        alerts.len(),
        rules.len()
    )
}

/// Fixed per-screen follow-up suggestions returned alongside the
/// assistant's reply.
pub fn contextual_suggestions(context: &str, campaigns: &[Campaign]) -> Vec<String> {
    let mut suggestions = Vec::new();

    match context {
        "dashboard" => {
            suggestions.push("Review the campaigns with the highest CPC for optimization".to_string());
            if !campaigns.is_empty() {
                suggestions.push("Configure alerts for low-performing campaigns".to_string());
            }
        }
        "campaigns" => {
            suggestions.push("Create automation rules for budget adjustments".to_string());
            suggestions.push("Analyze performance over a specific period".to_string());
        }
        "automation" => {
            suggestions.push("Configure alerts for when rules are activated".to_string());
            suggestions.push("Create a backup of important configurations".to_string());
        }
        _ => {}
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn actions_parse_from_their_wire_names() {
        assert_eq!(
            "analyze_performance".parse::<InsightAction>().unwrap(),
            InsightAction::AnalyzePerformance
        );
        assert_eq!(
            "forecast_analysis".parse::<InsightAction>().unwrap(),
            InsightAction::ForecastAnalysis
        );
        assert!(matches!(
            "delete_everything".parse::<InsightAction>(),
            Err(AiError::InvalidAction)
        ));
    }

    #[test]
    fn insight_prompts_embed_the_campaign_payload() {
        let data = json!([{"campaign_name": "Spring Push", "cpc": 0.42}]);

        let analyze = insight_prompt(InsightAction::AnalyzePerformance, &data);
        assert!(analyze.contains("Spring Push"));
        assert!(analyze.contains("best ROI"));

        let optimize = insight_prompt(InsightAction::OptimizeSuggestions, &data);
        assert!(optimize.contains("CPC reduction"));

        let forecast = insight_prompt(InsightAction::ForecastAnalysis, &data);
        assert!(forecast.contains("next month"));
    }

    fn campaign(name: &str) -> Campaign {
        Campaign {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            ad_account_id: Uuid::new_v4(),
            platform: crate::models::Platform::GoogleAds,
            campaign_id: "1".to_string(),
            campaign_name: name.to_string(),
            status: "ENABLED".to_string(),
            budget_amount: 10.0,
            currency: "USD".to_string(),
            impressions: 1000,
            clicks: 25,
            conversions: 3,
            cost: 12.5,
            ctr: 2.5,
            cpc: 0.5,
            last_synced_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn system_prompt_reports_counts_and_campaign_lines() {
        let campaigns = vec![campaign("Brand"), campaign("Retargeting")];
        let prompt = contextual_system_prompt("dashboard", &campaigns, &[], &[]);
        assert!(prompt.contains("Current screen: dashboard"));
        assert!(prompt.contains("Active campaigns: 2"));
        assert!(prompt.contains("- Brand: Impressions: 1000, Clicks: 25, CPC: $0.50"));
    }

    #[test]
    fn suggestions_depend_on_screen_and_data() {
        assert_eq!(contextual_suggestions("dashboard", &[]).len(), 1);
        assert_eq!(contextual_suggestions("dashboard", &[campaign("A")]).len(), 2);
        assert_eq!(contextual_suggestions("campaigns", &[]).len(), 2);
        assert_eq!(contextual_suggestions("automation", &[]).len(), 2);
        assert!(contextual_suggestions("settings", &[]).is_empty());
    }
}
