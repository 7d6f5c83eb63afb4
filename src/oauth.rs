use crate::config::Config;
use crate::constants::{
    GOOGLE_ADS_API_VERSION, GOOGLE_ADS_BASE_URL, GOOGLE_ADS_SCOPE, GOOGLE_OAUTH_AUTH_URL,
    GOOGLE_OAUTH_TOKEN_URL, META_ADS_SCOPES, META_API_VERSION, META_DIALOG_BASE_URL,
    META_GRAPH_BASE_URL,
};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use url::form_urlencoded;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum OAuthError {
    #[error("API request failed: {0}")]
    RequestFailed(String),
    #[error("OAuth error: {0}")]
    Exchange(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

impl OAuthTokens {
    /// Absolute expiry computed from `expires_in`; providers that issue
    /// non-expiring tokens yield `None`.
    pub fn expires_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.expires_in.map(|secs| now + Duration::seconds(secs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredAccount {
    pub account_id: String,
    pub account_name: String,
}

/// Authorization-code exchange against Google's identity endpoints, plus
/// discovery of the accessible Google Ads customers.
pub struct GoogleAdsOAuth {
    client: Client,
    client_id: String,
    client_secret: String,
    developer_token: String,
    redirect_uri: String,
}

impl GoogleAdsOAuth {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            client_id: config.google_ads_client_id.clone(),
            client_secret: config.google_ads_client_secret.clone(),
            developer_token: config.google_ads_developer_token.clone(),
            redirect_uri: format!("{}/functions/google-ads-oauth", config.public_url),
        }
    }

    /// Consent URL the client is redirected to; `state` carries the user id.
    pub fn authorization_url(&self, user_id: Uuid) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", GOOGLE_ADS_SCOPE)
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent")
            .append_pair("state", &user_id.to_string())
            .finish();
        format!("{GOOGLE_OAUTH_AUTH_URL}?{query}")
    }

    pub async fn exchange_code(&self, code: &str) -> Result<OAuthTokens, OAuthError> {
        let response = self
            .client
            .post(GOOGLE_OAUTH_TOKEN_URL)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| OAuthError::RequestFailed(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| OAuthError::InvalidResponse(e.to_string()))?;

        parse_google_tokens(&body)
    }

    /// The customers reachable with the exchanged token, as bare ids.
    pub async fn list_accessible_customers(
        &self,
        access_token: &str,
    ) -> Result<Vec<DiscoveredAccount>, OAuthError> {
        let url = format!(
            "{GOOGLE_ADS_BASE_URL}/{GOOGLE_ADS_API_VERSION}/customers:listAccessibleCustomers"
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .header("developer-token", &self.developer_token)
            .send()
            .await
            .map_err(|e| OAuthError::RequestFailed(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| OAuthError::InvalidResponse(e.to_string()))?;

        Ok(google_accounts_from(&body))
    }
}

pub(crate) fn parse_google_tokens(body: &Value) -> Result<OAuthTokens, OAuthError> {
    if body.get("error").is_some() {
        let description = body["error_description"]
            .as_str()
            .or_else(|| body["error"].as_str())
            .unwrap_or("unknown error");
        return Err(OAuthError::Exchange(description.to_string()));
    }

    let access_token = body["access_token"]
        .as_str()
        .ok_or_else(|| OAuthError::InvalidResponse("missing access_token".to_string()))?;

    Ok(OAuthTokens {
        access_token: access_token.to_string(),
        refresh_token: body["refresh_token"].as_str().map(str::to_string),
        expires_in: body["expires_in"].as_i64(),
    })
}

/// `resourceNames` entries look like `customers/1234567890`; accounts get
/// a generated display name since the list call carries none.
pub(crate) fn google_accounts_from(body: &Value) -> Vec<DiscoveredAccount> {
    let mut accounts = Vec::new();

    if let Some(names) = body["resourceNames"].as_array() {
        for name in names {
            if let Some(customer_id) = name.as_str().and_then(|n| n.split('/').nth(1)) {
                accounts.push(DiscoveredAccount {
                    account_id: customer_id.to_string(),
                    account_name: format!("Google Ads Account {customer_id}"),
                });
            }
        }
    }

    accounts
}

/// Authorization-code exchange against Meta's dialog/token endpoints, plus
/// discovery of the user's ad accounts.
pub struct MetaAdsOAuth {
    client: Client,
    app_id: String,
    app_secret: String,
    redirect_uri: String,
}

impl MetaAdsOAuth {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            app_id: config.meta_app_id.clone(),
            app_secret: config.meta_app_secret.clone(),
            redirect_uri: format!("{}/functions/meta-ads-oauth", config.public_url),
        }
    }

    pub fn authorization_url(&self, user_id: Uuid) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.app_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", META_ADS_SCOPES)
            .append_pair("response_type", "code")
            .append_pair("state", &user_id.to_string())
            .finish();
        format!("{META_DIALOG_BASE_URL}/{META_API_VERSION}/dialog/oauth?{query}")
    }

    pub async fn exchange_code(&self, code: &str) -> Result<OAuthTokens, OAuthError> {
        let url = format!("{META_GRAPH_BASE_URL}/{META_API_VERSION}/oauth/access_token");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client_id", self.app_id.as_str()),
                ("client_secret", self.app_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("code", code),
            ])
            .send()
            .await
            .map_err(|e| OAuthError::RequestFailed(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| OAuthError::InvalidResponse(e.to_string()))?;

        parse_meta_tokens(&body)
    }

    pub async fn list_ad_accounts(
        &self,
        access_token: &str,
    ) -> Result<Vec<DiscoveredAccount>, OAuthError> {
        let url = format!("{META_GRAPH_BASE_URL}/{META_API_VERSION}/me/adaccounts");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("fields", crate::constants::META_AD_ACCOUNT_FIELDS),
                ("access_token", access_token),
            ])
            .send()
            .await
            .map_err(|e| OAuthError::RequestFailed(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| OAuthError::InvalidResponse(e.to_string()))?;

        Ok(meta_accounts_from(&body))
    }
}

pub(crate) fn parse_meta_tokens(body: &Value) -> Result<OAuthTokens, OAuthError> {
    if let Some(error) = body.get("error") {
        let message = error["message"].as_str().unwrap_or("unknown error");
        return Err(OAuthError::Exchange(message.to_string()));
    }

    let access_token = body["access_token"]
        .as_str()
        .ok_or_else(|| OAuthError::InvalidResponse("missing access_token".to_string()))?;

    Ok(OAuthTokens {
        access_token: access_token.to_string(),
        refresh_token: None,
        expires_in: body["expires_in"].as_i64(),
    })
}

pub(crate) fn meta_accounts_from(body: &Value) -> Vec<DiscoveredAccount> {
    let mut accounts = Vec::new();

    if let Some(data) = body["data"].as_array() {
        for account in data {
            accounts.push(DiscoveredAccount {
                account_id: account["id"].as_str().unwrap_or("").to_string(),
                account_name: account["name"].as_str().unwrap_or("").to_string(),
            });
        }
    }

    accounts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_expiry_is_computed_from_expires_in() {
        let now = Utc::now();
        let tokens = OAuthTokens {
            access_token: "t".to_string(),
            refresh_token: None,
            expires_in: Some(3600),
        };
        assert_eq!(tokens.expires_at(now), Some(now + Duration::seconds(3600)));

        let non_expiring = OAuthTokens {
            access_token: "t".to_string(),
            refresh_token: None,
            expires_in: None,
        };
        assert_eq!(non_expiring.expires_at(now), None);
    }

    #[test]
    fn google_token_errors_surface_the_description() {
        let body = json!({"error": "invalid_grant", "error_description": "Bad Request"});
        let err = parse_google_tokens(&body).unwrap_err();
        assert!(matches!(err, OAuthError::Exchange(msg) if msg == "Bad Request"));
    }

    #[test]
    fn google_tokens_parse_with_optional_refresh() {
        let body = json!({"access_token": "ya29.x", "expires_in": 3599});
        let tokens = parse_google_tokens(&body).unwrap();
        assert_eq!(tokens.access_token, "ya29.x");
        assert_eq!(tokens.refresh_token, None);
        assert_eq!(tokens.expires_in, Some(3599));
    }

    #[test]
    fn google_customer_ids_come_from_resource_names() {
        let body = json!({"resourceNames": ["customers/1112223334", "customers/9998887776"]});
        let accounts = google_accounts_from(&body);
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].account_id, "1112223334");
        assert_eq!(accounts[0].account_name, "Google Ads Account 1112223334");
    }

    #[test]
    fn meta_token_errors_surface_the_message() {
        let body = json!({"error": {"message": "Invalid verification code format."}});
        let err = parse_meta_tokens(&body).unwrap_err();
        assert!(matches!(err, OAuthError::Exchange(msg) if msg.contains("verification code")));
    }

    #[test]
    fn meta_ad_accounts_parse_id_and_name() {
        let body = json!({"data": [{"id": "act_101", "name": "Acme Ads", "account_status": 1}]});
        let accounts = meta_accounts_from(&body);
        assert_eq!(
            accounts,
            vec![DiscoveredAccount {
                account_id: "act_101".to_string(),
                account_name: "Acme Ads".to_string(),
            }]
        );
    }

    #[test]
    fn authorization_urls_carry_the_expected_parameters() {
        let config = test_config();
        let user_id = Uuid::nil();

        let google = GoogleAdsOAuth::new(&config).authorization_url(user_id);
        assert!(google.starts_with(GOOGLE_OAUTH_AUTH_URL));
        assert!(google.contains("client_id=google-client"));
        assert!(google.contains("access_type=offline"));
        assert!(google.contains("prompt=consent"));
        assert!(google.contains(&format!("state={user_id}")));

        let meta = MetaAdsOAuth::new(&config).authorization_url(user_id);
        assert!(meta.contains("/dialog/oauth?"));
        assert!(meta.contains("client_id=meta-app"));
        assert!(meta.contains("response_type=code"));
        assert!(meta.contains(&format!("state={user_id}")));
    }

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            public_url: "https://dashboard.example.com".to_string(),
            auth_base_url: "https://auth.example.com".to_string(),
            auth_api_key: "anon".to_string(),
            google_ads_client_id: "google-client".to_string(),
            google_ads_client_secret: "secret".to_string(),
            google_ads_developer_token: "devtok".to_string(),
            meta_app_id: "meta-app".to_string(),
            meta_app_secret: "secret".to_string(),
            openai_api_key: "sk-test".to_string(),
            sync_interval_secs: 1800,
        }
    }
}
