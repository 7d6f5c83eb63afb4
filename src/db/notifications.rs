use super::{Database, DatabaseError};
use crate::events::{ChangeEvent, ChangeOp, ChangeTable};
use crate::models::{NewNotification, Notification};
use tokio_postgres::Row;
use uuid::Uuid;

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, type, title, message, priority, campaign_id, is_read, created_at, updated_at";

fn notification_from_row(row: &Row) -> Notification {
    Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        notification_type: row.get("type"),
        title: row.get("title"),
        message: row.get("message"),
        priority: row.get("priority"),
        campaign_id: row.get("campaign_id"),
        is_read: row.get("is_read"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl Database {
    pub async fn notifications_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Notification>, DatabaseError> {
        let rows = self
            .client
            .query(
                &format!(
                    "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
                     WHERE user_id = $1 ORDER BY created_at DESC"
                ),
                &[&user_id],
            )
            .await?;
        Ok(rows.iter().map(notification_from_row).collect())
    }

    /// Inserts and publishes a notifications change event; the feed carries
    /// the priority so clients can decide whether to surface it.
    pub async fn insert_notification(
        &self,
        new: &NewNotification,
    ) -> Result<Notification, DatabaseError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO notifications (user_id, type, title, message, priority, campaign_id) \
                     VALUES ($1, $2, $3, $4, $5, $6) \
                     RETURNING {NOTIFICATION_COLUMNS}"
                ),
                &[
                    &new.user_id,
                    &new.notification_type,
                    &new.title,
                    &new.message,
                    &new.priority,
                    &new.campaign_id,
                ],
            )
            .await?;

        let notification = notification_from_row(&row);
        self.events().publish(ChangeEvent {
            table: ChangeTable::Notifications,
            op: ChangeOp::Insert,
            user_id: notification.user_id,
            row: serde_json::to_value(&notification).unwrap_or_default(),
        });
        Ok(notification)
    }

    /// Flip only the read flag.
    pub async fn mark_notification_read(
        &self,
        user_id: Uuid,
        id: Uuid,
        is_read: bool,
    ) -> Result<Option<Notification>, DatabaseError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE notifications SET is_read = $3, updated_at = NOW() \
                     WHERE id = $1 AND user_id = $2 \
                     RETURNING {NOTIFICATION_COLUMNS}"
                ),
                &[&id, &user_id, &is_read],
            )
            .await?;
        Ok(row.map(|r| notification_from_row(&r)))
    }

    pub async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, DatabaseError> {
        let updated = self
            .client
            .execute(
                "UPDATE notifications SET is_read = TRUE, updated_at = NOW() \
                 WHERE user_id = $1 AND is_read = FALSE",
                &[&user_id],
            )
            .await?;
        Ok(updated)
    }

    pub async fn delete_notification(&self, user_id: Uuid, id: Uuid) -> Result<(), DatabaseError> {
        self.client
            .execute(
                "DELETE FROM notifications WHERE id = $1 AND user_id = $2",
                &[&id, &user_id],
            )
            .await?;
        Ok(())
    }
}
