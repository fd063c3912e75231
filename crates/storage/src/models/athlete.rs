use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Sport;

/// Athlete profile joined with the owning user's identity fields.
///
/// `athlete_id` is the athlete's `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Athlete {
    pub athlete_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub sport: Sport,
    pub position: Option<String>,
    pub team_id: Option<Uuid>,
    pub coach_id: Option<Uuid>,
    pub jersey_number: Option<i32>,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Athlete {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
