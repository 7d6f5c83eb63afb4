use super::{Database, DatabaseError};
use crate::models::{AutomatedReport, AutomatedReportPatch, NewAutomatedReport};
use tokio_postgres::Row;
use uuid::Uuid;

const REPORT_COLUMNS: &str = "id, user_id, name, report_type, schedule_day, email_recipients, \
     is_active, last_sent_at, created_at, updated_at";

fn report_from_row(row: &Row) -> AutomatedReport {
    AutomatedReport {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        report_type: row.get("report_type"),
        schedule_day: row.get("schedule_day"),
        email_recipients: row.get("email_recipients"),
        is_active: row.get("is_active"),
        last_sent_at: row.get("last_sent_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl Database {
    pub async fn automated_reports_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<AutomatedReport>, DatabaseError> {
        let rows = self
            .client
            .query(
                &format!(
                    "SELECT {REPORT_COLUMNS} FROM automated_reports \
                     WHERE user_id = $1 ORDER BY created_at DESC"
                ),
                &[&user_id],
            )
            .await?;
        Ok(rows.iter().map(report_from_row).collect())
    }

    pub async fn insert_automated_report(
        &self,
        user_id: Uuid,
        new: &NewAutomatedReport,
    ) -> Result<AutomatedReport, DatabaseError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO automated_reports \
                     (user_id, name, report_type, schedule_day, email_recipients) \
                     VALUES ($1, $2, $3, $4, $5) \
                     RETURNING {REPORT_COLUMNS}"
                ),
                &[
                    &user_id,
                    &new.name,
                    &new.report_type,
                    &new.schedule_day,
                    &new.email_recipients,
                ],
            )
            .await?;
        Ok(report_from_row(&row))
    }

    pub async fn update_automated_report(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &AutomatedReportPatch,
    ) -> Result<Option<AutomatedReport>, DatabaseError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE automated_reports SET \
                     name = COALESCE($3, name), \
                     report_type = COALESCE($4, report_type), \
                     schedule_day = COALESCE($5, schedule_day), \
                     email_recipients = COALESCE($6, email_recipients), \
                     updated_at = NOW() \
                     WHERE id = $1 AND user_id = $2 \
                     RETURNING {REPORT_COLUMNS}"
                ),
                &[
                    &id,
                    &user_id,
                    &patch.name,
                    &patch.report_type,
                    &patch.schedule_day,
                    &patch.email_recipients,
                ],
            )
            .await?;
        Ok(row.map(|r| report_from_row(&r)))
    }

    /// Flip only the active flag.
    pub async fn set_automated_report_active(
        &self,
        user_id: Uuid,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<AutomatedReport>, DatabaseError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE automated_reports SET is_active = $3, updated_at = NOW() \
                     WHERE id = $1 AND user_id = $2 \
                     RETURNING {REPORT_COLUMNS}"
                ),
                &[&id, &user_id, &is_active],
            )
            .await?;
        Ok(row.map(|r| report_from_row(&r)))
    }

    pub async fn delete_automated_report(&self, user_id: Uuid, id: Uuid) -> Result<(), DatabaseError> {
        self.client
            .execute(
                "DELETE FROM automated_reports WHERE id = $1 AND user_id = $2",
                &[&id, &user_id],
            )
            .await?;
        Ok(())
    }
}
