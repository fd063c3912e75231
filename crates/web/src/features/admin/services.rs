use chrono::Utc;
use sqlx::PgPool;
use storage::{dto::goal::OverdueSweepResponse, models::Role, repository::GoalRepository};

use crate::error::{ApiResult, WebError};
use crate::middleware::auth::AuthUser;

/// Flip every active goal past its target date to overdue
pub async fn refresh_overdue(pool: &PgPool, user: &AuthUser) -> ApiResult<OverdueSweepResponse> {
    if user.0.role != Role::Admin {
        tracing::warn!(user_id = %user.user_id(), "Non-admin attempted overdue sweep");
        return Err(WebError::Forbidden);
    }

    let updated_goals = GoalRepository::new(pool)
        .mark_overdue(Utc::now().date_naive())
        .await?;

    tracing::info!(updated_goals, "Overdue sweep completed");

    Ok(OverdueSweepResponse { updated_goals })
}
