mod accounts;
mod alerts;
mod campaigns;
mod comments;
mod goals;
mod history;
mod notifications;
mod profiles;
mod reports;
mod rules;
mod schema;
mod team;

use crate::events::EventHub;
use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode};
use postgres_openssl::MakeTlsConnector;
use thiserror::Error;
use tokio_postgres::{Client, Config};

use std::str::FromStr;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] tokio_postgres::Error),
    #[error("SSL error: {0}")]
    SslError(#[from] openssl::error::ErrorStack),
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),
    #[error("Unexpected row value: {0}")]
    UnexpectedValue(String),
}

/// Postgres-backed store. Writes to the campaigns, notifications and
/// automation_rules tables publish a [`crate::events::ChangeEvent`] on the
/// hub, standing in for the hosted platform's change feed.
pub struct Database {
    client: Client,
    events: EventHub,
}

impl Database {
    pub async fn connect(database_url: &str, events: EventHub) -> Result<Self, DatabaseError> {
        let mut builder = SslConnector::builder(SslMethod::tls())?;
        builder.set_verify(SslVerifyMode::NONE); // For development only, use proper verification in production
        let connector = MakeTlsConnector::new(builder.build());

        let mut config = Config::from_str(database_url)
            .map_err(|e| DatabaseError::InvalidConnectionString(e.to_string()))?;

        let (client, connection) = config
            .connect_timeout(std::time::Duration::from_secs(5))
            .connect(connector)
            .await
            .map_err(DatabaseError::ConnectionError)?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "database connection error");
            }
        });

        Ok(Self { client, events })
    }

    /// Create any missing tables and indexes. Safe to run on every start.
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        self.client.batch_execute(schema::SCHEMA).await?;
        tracing::info!("database schema ensured");
        Ok(())
    }

    pub fn events(&self) -> &EventHub {
        &self.events
    }
}
