use super::{Database, DatabaseError};
use crate::models::{NewTeamMember, TeamMember, TeamMemberPatch};
use tokio_postgres::Row;
use uuid::Uuid;

const MEMBER_COLUMNS: &str = "id, owner_id, member_id, role, permissions, is_active, \
     invited_at, accepted_at, created_at, updated_at";

fn member_from_row(row: &Row) -> TeamMember {
    TeamMember {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        member_id: row.get("member_id"),
        role: row.get("role"),
        permissions: row.get("permissions"),
        is_active: row.get("is_active"),
        invited_at: row.get("invited_at"),
        accepted_at: row.get("accepted_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl Database {
    pub async fn team_members_for_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<TeamMember>, DatabaseError> {
        let rows = self
            .client
            .query(
                &format!(
                    "SELECT {MEMBER_COLUMNS} FROM team_members \
                     WHERE owner_id = $1 ORDER BY created_at DESC"
                ),
                &[&owner_id],
            )
            .await?;
        Ok(rows.iter().map(member_from_row).collect())
    }

    pub async fn insert_team_member(
        &self,
        owner_id: Uuid,
        new: &NewTeamMember,
    ) -> Result<TeamMember, DatabaseError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO team_members (owner_id, member_id, role, permissions) \
                     VALUES ($1, $2, $3, $4) \
                     RETURNING {MEMBER_COLUMNS}"
                ),
                &[&owner_id, &new.member_id, &new.role, &new.permissions],
            )
            .await?;
        Ok(member_from_row(&row))
    }

    pub async fn update_team_member(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: &TeamMemberPatch,
    ) -> Result<Option<TeamMember>, DatabaseError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE team_members SET \
                     role = COALESCE($3, role), \
                     permissions = COALESCE($4, permissions), \
                     is_active = COALESCE($5, is_active), \
                     accepted_at = COALESCE($6, accepted_at), \
                     updated_at = NOW() \
                     WHERE id = $1 AND owner_id = $2 \
                     RETURNING {MEMBER_COLUMNS}"
                ),
                &[
                    &id,
                    &owner_id,
                    &patch.role,
                    &patch.permissions,
                    &patch.is_active,
                    &patch.accepted_at,
                ],
            )
            .await?;
        Ok(row.map(|r| member_from_row(&r)))
    }

    pub async fn delete_team_member(&self, owner_id: Uuid, id: Uuid) -> Result<(), DatabaseError> {
        self.client
            .execute(
                "DELETE FROM team_members WHERE id = $1 AND owner_id = $2",
                &[&id, &owner_id],
            )
            .await?;
        Ok(())
    }
}
