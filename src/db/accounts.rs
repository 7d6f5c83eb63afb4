use super::{Database, DatabaseError};
use crate::models::{AdAccount, NewAdAccount};
use tokio_postgres::Row;
use uuid::Uuid;

const ACCOUNT_COLUMNS: &str = "id, user_id, platform, account_id, account_name, \
     access_token_encrypted, refresh_token_encrypted, expires_at, is_active, created_at, updated_at";

fn account_from_row(row: &Row) -> Result<AdAccount, DatabaseError> {
    let platform: String = row.get("platform");
    Ok(AdAccount {
        id: row.get("id"),
        user_id: row.get("user_id"),
        platform: platform
            .parse()
            .map_err(|e: crate::models::UnknownPlatform| DatabaseError::UnexpectedValue(e.to_string()))?,
        account_id: row.get("account_id"),
        account_name: row.get("account_name"),
        access_token_encrypted: row.get("access_token_encrypted"),
        refresh_token_encrypted: row.get("refresh_token_encrypted"),
        expires_at: row.get("expires_at"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

impl Database {
    pub async fn ad_accounts_for_user(&self, user_id: Uuid) -> Result<Vec<AdAccount>, DatabaseError> {
        let rows = self
            .client
            .query(
                &format!(
                    "SELECT {ACCOUNT_COLUMNS} FROM ad_accounts WHERE user_id = $1 ORDER BY created_at DESC"
                ),
                &[&user_id],
            )
            .await?;
        rows.iter().map(account_from_row).collect()
    }

    pub async fn active_ad_accounts_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<AdAccount>, DatabaseError> {
        let rows = self
            .client
            .query(
                &format!(
                    "SELECT {ACCOUNT_COLUMNS} FROM ad_accounts \
                     WHERE user_id = $1 AND is_active = TRUE ORDER BY created_at DESC"
                ),
                &[&user_id],
            )
            .await?;
        rows.iter().map(account_from_row).collect()
    }

    /// Every active account across all users, for the background sync loop.
    pub async fn all_active_ad_accounts(&self) -> Result<Vec<AdAccount>, DatabaseError> {
        let rows = self
            .client
            .query(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM ad_accounts WHERE is_active = TRUE"),
                &[],
            )
            .await?;
        rows.iter().map(account_from_row).collect()
    }

    pub async fn ad_account(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<AdAccount>, DatabaseError> {
        let row = self
            .client
            .query_opt(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM ad_accounts WHERE id = $1 AND user_id = $2"),
                &[&id, &user_id],
            )
            .await?;
        row.as_ref().map(account_from_row).transpose()
    }

    pub async fn insert_ad_account(&self, new: &NewAdAccount) -> Result<AdAccount, DatabaseError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO ad_accounts \
                     (user_id, platform, account_id, account_name, access_token_encrypted, \
                      refresh_token_encrypted, expires_at) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7) \
                     RETURNING {ACCOUNT_COLUMNS}"
                ),
                &[
                    &new.user_id,
                    &new.platform.as_str(),
                    &new.account_id,
                    &new.account_name,
                    &new.access_token,
                    &new.refresh_token,
                    &new.expires_at,
                ],
            )
            .await?;
        account_from_row(&row)
    }

    pub async fn update_ad_account(
        &self,
        user_id: Uuid,
        id: Uuid,
        account_name: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Option<AdAccount>, DatabaseError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE ad_accounts SET \
                     account_name = COALESCE($3, account_name), \
                     is_active = COALESCE($4, is_active), \
                     updated_at = NOW() \
                     WHERE id = $1 AND user_id = $2 \
                     RETURNING {ACCOUNT_COLUMNS}"
                ),
                &[&id, &user_id, &account_name, &is_active],
            )
            .await?;
        row.as_ref().map(account_from_row).transpose()
    }

    /// Idempotent: deleting an id that does not exist is not an error.
    pub async fn delete_ad_account(&self, user_id: Uuid, id: Uuid) -> Result<(), DatabaseError> {
        self.client
            .execute(
                "DELETE FROM ad_accounts WHERE id = $1 AND user_id = $2",
                &[&id, &user_id],
            )
            .await?;
        Ok(())
    }
}
