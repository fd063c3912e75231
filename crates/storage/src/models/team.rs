use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Sport;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Team {
    pub team_id: Uuid,
    pub name: String,
    pub sport: Sport,
    pub coach_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
