use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("API request failed: {0}")]
    RequestFailed(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// The authenticated principal as reported by the hosted auth service.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Validates bearer tokens against the hosted auth service's user-info
/// endpoint. Token issuance and session handling stay on the platform.
pub struct AuthClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AuthClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub async fn get_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        let url = format!("{}/auth/v1/user", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| AuthError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::Unauthorized);
        }

        response
            .json::<AuthUser>()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = AuthClient::new("https://auth.example.com/", "anon");
        assert_eq!(client.base_url, "https://auth.example.com");
    }

    #[test]
    fn auth_user_deserializes_from_user_info_payload() {
        let user: AuthUser = serde_json::from_str(
            r#"{"id": "7c9e6679-7425-40de-944b-e07fc1f90ae7", "email": "ops@example.com", "role": "authenticated"}"#,
        )
        .unwrap();
        assert_eq!(user.email.as_deref(), Some("ops@example.com"));
    }
}
