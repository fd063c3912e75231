use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::Team;

pub struct TeamRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TeamRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find team by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Team> {
        sqlx::query_as::<_, Team>(
            r#"
            SELECT team_id, name, sport, coach_id, created_at
            FROM teams
            WHERE team_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }
}
