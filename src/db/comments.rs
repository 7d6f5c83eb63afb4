use super::{Database, DatabaseError};
use crate::models::{CampaignComment, NewCampaignComment};
use tokio_postgres::Row;
use uuid::Uuid;

const COMMENT_COLUMNS: &str =
    "id, user_id, campaign_id, comment, is_internal, created_at, updated_at";

fn comment_from_row(row: &Row) -> CampaignComment {
    CampaignComment {
        id: row.get("id"),
        user_id: row.get("user_id"),
        campaign_id: row.get("campaign_id"),
        comment: row.get("comment"),
        is_internal: row.get("is_internal"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl Database {
    pub async fn comments_for_campaign(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
    ) -> Result<Vec<CampaignComment>, DatabaseError> {
        let rows = self
            .client
            .query(
                &format!(
                    "SELECT {COMMENT_COLUMNS} FROM campaign_comments \
                     WHERE user_id = $1 AND campaign_id = $2 ORDER BY created_at DESC"
                ),
                &[&user_id, &campaign_id],
            )
            .await?;
        Ok(rows.iter().map(comment_from_row).collect())
    }

    pub async fn insert_comment(
        &self,
        user_id: Uuid,
        new: &NewCampaignComment,
    ) -> Result<CampaignComment, DatabaseError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO campaign_comments (user_id, campaign_id, comment, is_internal) \
                     VALUES ($1, $2, $3, $4) \
                     RETURNING {COMMENT_COLUMNS}"
                ),
                &[&user_id, &new.campaign_id, &new.comment, &new.is_internal],
            )
            .await?;
        Ok(comment_from_row(&row))
    }

    /// Idempotent: deleting an id that no longer exists succeeds.
    pub async fn delete_comment(&self, user_id: Uuid, id: Uuid) -> Result<(), DatabaseError> {
        self.client
            .execute(
                "DELETE FROM campaign_comments WHERE id = $1 AND user_id = $2",
                &[&id, &user_id],
            )
            .await?;
        Ok(())
    }
}
