use super::{Database, DatabaseError};
use crate::models::{BudgetGoal, BudgetGoalPatch, NewBudgetGoal};
use tokio_postgres::Row;
use uuid::Uuid;

const GOAL_COLUMNS: &str = "id, user_id, campaign_id, month_year, monthly_budget, target_ctr, \
     target_cpc, target_roas, target_conversions, created_at, updated_at";

fn goal_from_row(row: &Row) -> BudgetGoal {
    BudgetGoal {
        id: row.get("id"),
        user_id: row.get("user_id"),
        campaign_id: row.get("campaign_id"),
        month_year: row.get("month_year"),
        monthly_budget: row.get("monthly_budget"),
        target_ctr: row.get("target_ctr"),
        target_cpc: row.get("target_cpc"),
        target_roas: row.get("target_roas"),
        target_conversions: row.get("target_conversions"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl Database {
    pub async fn budget_goals_for_user(&self, user_id: Uuid) -> Result<Vec<BudgetGoal>, DatabaseError> {
        let rows = self
            .client
            .query(
                &format!(
                    "SELECT {GOAL_COLUMNS} FROM budget_goals WHERE user_id = $1 ORDER BY created_at DESC"
                ),
                &[&user_id],
            )
            .await?;
        Ok(rows.iter().map(goal_from_row).collect())
    }

    pub async fn insert_budget_goal(
        &self,
        user_id: Uuid,
        new: &NewBudgetGoal,
    ) -> Result<BudgetGoal, DatabaseError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO budget_goals \
                     (user_id, campaign_id, month_year, monthly_budget, target_ctr, target_cpc, \
                      target_roas, target_conversions) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                     RETURNING {GOAL_COLUMNS}"
                ),
                &[
                    &user_id,
                    &new.campaign_id,
                    &new.month_year,
                    &new.monthly_budget,
                    &new.target_ctr,
                    &new.target_cpc,
                    &new.target_roas,
                    &new.target_conversions,
                ],
            )
            .await?;
        Ok(goal_from_row(&row))
    }

    pub async fn update_budget_goal(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &BudgetGoalPatch,
    ) -> Result<Option<BudgetGoal>, DatabaseError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE budget_goals SET \
                     month_year = COALESCE($3, month_year), \
                     monthly_budget = COALESCE($4, monthly_budget), \
                     target_ctr = COALESCE($5, target_ctr), \
                     target_cpc = COALESCE($6, target_cpc), \
                     target_roas = COALESCE($7, target_roas), \
                     target_conversions = COALESCE($8, target_conversions), \
                     updated_at = NOW() \
                     WHERE id = $1 AND user_id = $2 \
                     RETURNING {GOAL_COLUMNS}"
                ),
                &[
                    &id,
                    &user_id,
                    &patch.month_year,
                    &patch.monthly_budget,
                    &patch.target_ctr,
                    &patch.target_cpc,
                    &patch.target_roas,
                    &patch.target_conversions,
                ],
            )
            .await?;
        Ok(row.map(|r| goal_from_row(&r)))
    }

    pub async fn delete_budget_goal(&self, user_id: Uuid, id: Uuid) -> Result<(), DatabaseError> {
        self.client
            .execute(
                "DELETE FROM budget_goals WHERE id = $1 AND user_id = $2",
                &[&id, &user_id],
            )
            .await?;
        Ok(())
    }
}
