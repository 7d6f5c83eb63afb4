use super::{Database, DatabaseError};
use crate::models::{AiInsight, ChangeEntry};
use tokio_postgres::Row;
use uuid::Uuid;

const CHANGE_COLUMNS: &str =
    "id, user_id, action, campaign_id, field_changed, old_value, new_value, reason, created_at";
const INSIGHT_COLUMNS: &str = "id, user_id, action, insights, campaign_data, created_at";

fn change_from_row(row: &Row) -> ChangeEntry {
    ChangeEntry {
        id: row.get("id"),
        user_id: row.get("user_id"),
        action: row.get("action"),
        campaign_id: row.get("campaign_id"),
        field_changed: row.get("field_changed"),
        old_value: row.get("old_value"),
        new_value: row.get("new_value"),
        reason: row.get("reason"),
        created_at: row.get("created_at"),
    }
}

fn insight_from_row(row: &Row) -> AiInsight {
    AiInsight {
        id: row.get("id"),
        user_id: row.get("user_id"),
        action: row.get("action"),
        insights: row.get("insights"),
        campaign_data: row.get("campaign_data"),
        created_at: row.get("created_at"),
    }
}

impl Database {
    pub async fn insert_change_entry(
        &self,
        user_id: Uuid,
        action: &str,
        campaign_id: Option<Uuid>,
        field_changed: Option<&str>,
        old_value: Option<&str>,
        new_value: Option<&str>,
        reason: Option<&str>,
    ) -> Result<ChangeEntry, DatabaseError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO change_history \
                     (user_id, action, campaign_id, field_changed, old_value, new_value, reason) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7) \
                     RETURNING {CHANGE_COLUMNS}"
                ),
                &[
                    &user_id,
                    &action,
                    &campaign_id,
                    &field_changed,
                    &old_value,
                    &new_value,
                    &reason,
                ],
            )
            .await?;
        Ok(change_from_row(&row))
    }

    pub async fn change_history_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ChangeEntry>, DatabaseError> {
        let rows = self
            .client
            .query(
                &format!(
                    "SELECT {CHANGE_COLUMNS} FROM change_history \
                     WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
                ),
                &[&user_id, &limit],
            )
            .await?;
        Ok(rows.iter().map(change_from_row).collect())
    }

    pub async fn insert_ai_insight(
        &self,
        user_id: Uuid,
        action: &str,
        insights: &str,
        campaign_data: &serde_json::Value,
    ) -> Result<AiInsight, DatabaseError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO ai_insights (user_id, action, insights, campaign_data) \
                     VALUES ($1, $2, $3, $4) \
                     RETURNING {INSIGHT_COLUMNS}"
                ),
                &[&user_id, &action, &insights, campaign_data],
            )
            .await?;
        Ok(insight_from_row(&row))
    }

    pub async fn ai_insights_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AiInsight>, DatabaseError> {
        let rows = self
            .client
            .query(
                &format!(
                    "SELECT {INSIGHT_COLUMNS} FROM ai_insights \
                     WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
                ),
                &[&user_id, &limit],
            )
            .await?;
        Ok(rows.iter().map(insight_from_row).collect())
    }
}
