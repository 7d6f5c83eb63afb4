use crate::constants::WORKER_INTERVAL_SECS;
use dotenv::dotenv;
use std::env;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// Public base URL of this service, used to build OAuth redirect URIs.
    pub public_url: String,
    pub auth_base_url: String,
    pub auth_api_key: String,
    pub google_ads_client_id: String,
    pub google_ads_client_secret: String,
    pub google_ads_developer_token: String,
    pub meta_app_id: String,
    pub meta_app_secret: String,
    pub openai_api_key: String,
    pub sync_interval_secs: u64,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    MissingEnv(String),
    #[error("Invalid URL in {0}: {1}")]
    InvalidUrl(String, String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

fn required(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingEnv(name.to_string()))
}

fn required_url(name: &str) -> Result<String, ConfigError> {
    let value = required(name)?;
    Url::parse(&value).map_err(|e| ConfigError::InvalidUrl(name.to_string(), e.to_string()))?;
    Ok(value)
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let sync_interval_secs = match env::var("SYNC_INTERVAL_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue("SYNC_INTERVAL_SECS".to_string(), e.to_string()))?,
            Err(_) => WORKER_INTERVAL_SECS,
        };

        Ok(Self {
            database_url: required_url("DATABASE_URL")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            public_url: required_url("PUBLIC_URL")?,
            auth_base_url: required_url("AUTH_BASE_URL")?,
            auth_api_key: required("AUTH_API_KEY")?,
            google_ads_client_id: required("GOOGLE_ADS_CLIENT_ID")?,
            google_ads_client_secret: required("GOOGLE_ADS_CLIENT_SECRET")?,
            google_ads_developer_token: required("GOOGLE_ADS_DEVELOPER_TOKEN")?,
            meta_app_id: required("META_APP_ID")?,
            meta_app_secret: required("META_APP_SECRET")?,
            openai_api_key: required("OPENAI_API_KEY")?,
            sync_interval_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_env_is_reported_by_name() {
        let err = required("THIS_VARIABLE_DOES_NOT_EXIST").unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv(name) if name == "THIS_VARIABLE_DOES_NOT_EXIST"));
    }

    #[test]
    fn url_values_are_validated() {
        env::set_var("TEST_BAD_URL", "not a url");
        let err = required_url("TEST_BAD_URL").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(name, _) if name == "TEST_BAD_URL"));
        env::remove_var("TEST_BAD_URL");
    }
}
