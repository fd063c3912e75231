use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, QueryBuilder, types::Json};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{
    CoachFeedback, Goal, GoalCategory, GoalPriority, GoalProgress, GoalStatus, Sport, TargetMetric,
};

const GOAL_COLUMNS: &str = "goal_id, athlete_id, created_by, title, description, category, sport, \
     target_metric, start_date, target_date, status, priority, progress, editors, viewers, \
     feedback, completed_at, created_at, updated_at";

#[derive(Debug, FromRow)]
struct GoalRow {
    goal_id: Uuid,
    athlete_id: Uuid,
    created_by: Uuid,
    title: String,
    description: Option<String>,
    category: GoalCategory,
    sport: Sport,
    target_metric: Json<TargetMetric>,
    start_date: NaiveDate,
    target_date: NaiveDate,
    status: GoalStatus,
    priority: GoalPriority,
    progress: Json<GoalProgress>,
    editors: Vec<Uuid>,
    viewers: Vec<Uuid>,
    feedback: Json<Vec<CoachFeedback>>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GoalRow> for Goal {
    fn from(row: GoalRow) -> Self {
        Self {
            goal_id: row.goal_id,
            athlete_id: row.athlete_id,
            created_by: row.created_by,
            title: row.title,
            description: row.description,
            category: row.category,
            sport: row.sport,
            target_metric: row.target_metric.0,
            start_date: row.start_date,
            target_date: row.target_date,
            status: row.status,
            priority: row.priority,
            progress: row.progress.0,
            editors: row.editors,
            viewers: row.viewers,
            feedback: row.feedback.0,
            completed_at: row.completed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct GoalRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GoalRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Goals owned by an athlete, soonest deadline first
    pub async fn list_by_athlete(
        &self,
        athlete_id: Uuid,
        status: Option<GoalStatus>,
    ) -> Result<Vec<Goal>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE athlete_id = "
        ));
        query.push_bind(athlete_id);

        if let Some(status) = status {
            query.push(" AND status = ");
            query.push_bind(status);
        }

        query.push(" ORDER BY target_date ASC, created_at ASC");

        let rows: Vec<GoalRow> = query.build_query_as().fetch_all(self.pool).await?;

        Ok(rows.into_iter().map(Goal::from).collect())
    }

    /// Find goal by ID
    pub async fn find_by_id(&self, goal_id: Uuid) -> Result<Goal> {
        let row = sqlx::query_as::<_, GoalRow>(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE goal_id = $1"
        ))
        .bind(goal_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    /// Insert a fully built goal
    pub async fn create(&self, goal: &Goal) -> Result<Goal> {
        let row = sqlx::query_as::<_, GoalRow>(&format!(
            r#"
            INSERT INTO goals (goal_id, athlete_id, created_by, title, description, category, sport,
                               target_metric, start_date, target_date, status, priority, progress,
                               editors, viewers, feedback, completed_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING {GOAL_COLUMNS}
            "#
        ))
        .bind(goal.goal_id)
        .bind(goal.athlete_id)
        .bind(goal.created_by)
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.category)
        .bind(goal.sport)
        .bind(Json(&goal.target_metric))
        .bind(goal.start_date)
        .bind(goal.target_date)
        .bind(goal.status)
        .bind(goal.priority)
        .bind(Json(&goal.progress))
        .bind(&goal.editors)
        .bind(&goal.viewers)
        .bind(Json(&goal.feedback))
        .bind(goal.completed_at)
        .bind(goal.created_at)
        .bind(goal.updated_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).classify("goal"))?;

        Ok(row.into())
    }

    /// Persist every mutable field of a goal in one statement
    pub async fn save(&self, goal: &Goal) -> Result<Goal> {
        let row = sqlx::query_as::<_, GoalRow>(&format!(
            r#"
            UPDATE goals
            SET title = $2,
                description = $3,
                category = $4,
                target_metric = $5,
                target_date = $6,
                status = $7,
                priority = $8,
                progress = $9,
                editors = $10,
                viewers = $11,
                feedback = $12,
                completed_at = $13,
                updated_at = $14
            WHERE goal_id = $1
            RETURNING {GOAL_COLUMNS}
            "#
        ))
        .bind(goal.goal_id)
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.category)
        .bind(Json(&goal.target_metric))
        .bind(goal.target_date)
        .bind(goal.status)
        .bind(goal.priority)
        .bind(Json(&goal.progress))
        .bind(&goal.editors)
        .bind(&goal.viewers)
        .bind(Json(&goal.feedback))
        .bind(goal.completed_at)
        .bind(goal.updated_at)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StorageError::from(e).classify("goal"))?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a goal by ID
    pub async fn delete(&self, goal_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM goals WHERE goal_id = $1")
            .bind(goal_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Flip every active goal past its target date to overdue
    pub async fn mark_overdue(&self, today: NaiveDate) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE goals
            SET status = 'overdue', updated_at = now()
            WHERE status = 'active' AND target_date < $1
            "#,
        )
        .bind(today)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
