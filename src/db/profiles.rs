use super::{Database, DatabaseError};
use crate::models::{Profile, ProfilePatch};
use tokio_postgres::Row;
use uuid::Uuid;

const PROFILE_COLUMNS: &str = "id, email, full_name, avatar_url, created_at, updated_at";

fn profile_from_row(row: &Row) -> Profile {
    Profile {
        id: row.get("id"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        avatar_url: row.get("avatar_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl Database {
    pub async fn profile(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        let row = self
            .client
            .query_opt(
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"),
                &[&user_id],
            )
            .await?;
        Ok(row.map(|r| profile_from_row(&r)))
    }

    /// Creates the profile row on first write.
    pub async fn upsert_profile(
        &self,
        user_id: Uuid,
        patch: &ProfilePatch,
    ) -> Result<Profile, DatabaseError> {
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO profiles (id, email, full_name, avatar_url) \
                     VALUES ($1, $2, $3, $4) \
                     ON CONFLICT (id) DO UPDATE SET \
                       email = COALESCE(EXCLUDED.email, profiles.email), \
                       full_name = COALESCE(EXCLUDED.full_name, profiles.full_name), \
                       avatar_url = COALESCE(EXCLUDED.avatar_url, profiles.avatar_url), \
                       updated_at = NOW() \
                     RETURNING {PROFILE_COLUMNS}"
                ),
                &[&user_id, &patch.email, &patch.full_name, &patch.avatar_url],
            )
            .await?;
        Ok(profile_from_row(&row))
    }
}
