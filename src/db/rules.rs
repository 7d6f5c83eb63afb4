use super::{Database, DatabaseError};
use crate::events::{ChangeEvent, ChangeOp, ChangeTable};
use crate::models::{AutomationRule, AutomationRulePatch, NewAutomationRule};
use tokio_postgres::Row;
use uuid::Uuid;

const RULE_COLUMNS: &str = "id, user_id, name, rule_type, condition_type, condition_value, \
     action_type, action_value, campaigns, is_active, created_at, updated_at";

fn rule_from_row(row: &Row) -> AutomationRule {
    AutomationRule {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        rule_type: row.get("rule_type"),
        condition_type: row.get("condition_type"),
        condition_value: row.get("condition_value"),
        action_type: row.get("action_type"),
        action_value: row.get("action_value"),
        campaigns: row.get("campaigns"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl Database {
    pub async fn automation_rules_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<AutomationRule>, DatabaseError> {
        let rows = self
            .client
            .query(
                &format!(
                    "SELECT {RULE_COLUMNS} FROM automation_rules \
                     WHERE user_id = $1 ORDER BY created_at DESC"
                ),
                &[&user_id],
            )
            .await?;
        Ok(rows.iter().map(rule_from_row).collect())
    }

    pub async fn insert_automation_rule(
        &self,
        user_id: Uuid,
        new: &NewAutomationRule,
    ) -> Result<AutomationRule, DatabaseError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO automation_rules \
                     (user_id, name, rule_type, condition_type, condition_value, action_type, \
                      action_value, campaigns) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                     RETURNING {RULE_COLUMNS}"
                ),
                &[
                    &user_id,
                    &new.name,
                    &new.rule_type,
                    &new.condition_type,
                    &new.condition_value,
                    &new.action_type,
                    &new.action_value,
                    &new.campaigns,
                ],
            )
            .await?;
        Ok(rule_from_row(&row))
    }

    pub async fn update_automation_rule(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &AutomationRulePatch,
    ) -> Result<Option<AutomationRule>, DatabaseError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE automation_rules SET \
                     name = COALESCE($3, name), \
                     rule_type = COALESCE($4, rule_type), \
                     condition_type = COALESCE($5, condition_type), \
                     condition_value = COALESCE($6, condition_value), \
                     action_type = COALESCE($7, action_type), \
                     action_value = COALESCE($8, action_value), \
                     campaigns = COALESCE($9, campaigns), \
                     updated_at = NOW() \
                     WHERE id = $1 AND user_id = $2 \
                     RETURNING {RULE_COLUMNS}"
                ),
                &[
                    &id,
                    &user_id,
                    &patch.name,
                    &patch.rule_type,
                    &patch.condition_type,
                    &patch.condition_value,
                    &patch.action_type,
                    &patch.action_value,
                    &patch.campaigns,
                ],
            )
            .await?;

        let rule = row.map(|r| rule_from_row(&r));
        if let Some(rule) = &rule {
            self.publish_rule_update(rule);
        }
        Ok(rule)
    }

    /// Toggle only the active flag; every other field is untouched.
    pub async fn set_automation_rule_active(
        &self,
        user_id: Uuid,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<AutomationRule>, DatabaseError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE automation_rules SET is_active = $3, updated_at = NOW() \
                     WHERE id = $1 AND user_id = $2 \
                     RETURNING {RULE_COLUMNS}"
                ),
                &[&id, &user_id, &is_active],
            )
            .await?;

        let rule = row.map(|r| rule_from_row(&r));
        if let Some(rule) = &rule {
            self.publish_rule_update(rule);
        }
        Ok(rule)
    }

    pub async fn delete_automation_rule(&self, user_id: Uuid, id: Uuid) -> Result<(), DatabaseError> {
        self.client
            .execute(
                "DELETE FROM automation_rules WHERE id = $1 AND user_id = $2",
                &[&id, &user_id],
            )
            .await?;
        Ok(())
    }

    fn publish_rule_update(&self, rule: &AutomationRule) {
        self.events().publish(ChangeEvent {
            table: ChangeTable::AutomationRules,
            op: ChangeOp::Update,
            user_id: rule.user_id,
            row: serde_json::to_value(rule).unwrap_or_default(),
        });
    }
}
