use super::{Database, DatabaseError};
use crate::models::{AlertSetting, AlertSettingPatch, NewAlertSetting};
use tokio_postgres::Row;
use uuid::Uuid;

const ALERT_COLUMNS: &str = "id, user_id, alert_type, threshold_value, is_enabled, \
     email_enabled, push_enabled, created_at, updated_at";

fn alert_from_row(row: &Row) -> AlertSetting {
    AlertSetting {
        id: row.get("id"),
        user_id: row.get("user_id"),
        alert_type: row.get("alert_type"),
        threshold_value: row.get("threshold_value"),
        is_enabled: row.get("is_enabled"),
        email_enabled: row.get("email_enabled"),
        push_enabled: row.get("push_enabled"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl Database {
    pub async fn alert_settings_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<AlertSetting>, DatabaseError> {
        let rows = self
            .client
            .query(
                &format!(
                    "SELECT {ALERT_COLUMNS} FROM alert_settings \
                     WHERE user_id = $1 ORDER BY created_at DESC"
                ),
                &[&user_id],
            )
            .await?;
        Ok(rows.iter().map(alert_from_row).collect())
    }

    pub async fn insert_alert_setting(
        &self,
        user_id: Uuid,
        new: &NewAlertSetting,
    ) -> Result<AlertSetting, DatabaseError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO alert_settings \
                     (user_id, alert_type, threshold_value, is_enabled, email_enabled, push_enabled) \
                     VALUES ($1, $2, $3, $4, $5, $6) \
                     RETURNING {ALERT_COLUMNS}"
                ),
                &[
                    &user_id,
                    &new.alert_type,
                    &new.threshold_value,
                    &new.is_enabled,
                    &new.email_enabled,
                    &new.push_enabled,
                ],
            )
            .await?;
        Ok(alert_from_row(&row))
    }

    pub async fn update_alert_setting(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &AlertSettingPatch,
    ) -> Result<Option<AlertSetting>, DatabaseError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE alert_settings SET \
                     alert_type = COALESCE($3, alert_type), \
                     threshold_value = COALESCE($4, threshold_value), \
                     email_enabled = COALESCE($5, email_enabled), \
                     push_enabled = COALESCE($6, push_enabled), \
                     updated_at = NOW() \
                     WHERE id = $1 AND user_id = $2 \
                     RETURNING {ALERT_COLUMNS}"
                ),
                &[
                    &id,
                    &user_id,
                    &patch.alert_type,
                    &patch.threshold_value,
                    &patch.email_enabled,
                    &patch.push_enabled,
                ],
            )
            .await?;
        Ok(row.map(|r| alert_from_row(&r)))
    }

    /// Flip only the enabled flag.
    pub async fn set_alert_setting_enabled(
        &self,
        user_id: Uuid,
        id: Uuid,
        is_enabled: bool,
    ) -> Result<Option<AlertSetting>, DatabaseError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE alert_settings SET is_enabled = $3, updated_at = NOW() \
                     WHERE id = $1 AND user_id = $2 \
                     RETURNING {ALERT_COLUMNS}"
                ),
                &[&id, &user_id, &is_enabled],
            )
            .await?;
        Ok(row.map(|r| alert_from_row(&r)))
    }

    pub async fn delete_alert_setting(&self, user_id: Uuid, id: Uuid) -> Result<(), DatabaseError> {
        self.client
            .execute(
                "DELETE FROM alert_settings WHERE id = $1 AND user_id = $2",
                &[&id, &user_id],
            )
            .await?;
        Ok(())
    }
}
