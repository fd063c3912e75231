use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::goal::GoalProgressRollup;
use crate::models::{Athlete, Sport, Team};

/// Response containing an athlete profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AthleteResponse {
    pub athlete_id: Uuid,
    pub name: String,
    pub email: String,
    pub sport: Sport,
    pub position: Option<String>,
    pub team_id: Option<Uuid>,
    pub coach_id: Option<Uuid>,
    pub jersey_number: Option<i32>,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<Athlete> for AthleteResponse {
    fn from(athlete: Athlete) -> Self {
        Self {
            name: athlete.full_name(),
            athlete_id: athlete.athlete_id,
            email: athlete.email,
            sport: athlete.sport,
            position: athlete.position,
            team_id: athlete.team_id,
            coach_id: athlete.coach_id,
            jersey_number: athlete.jersey_number,
            date_of_birth: athlete.date_of_birth,
            created_at: athlete.created_at,
        }
    }
}

/// Athlete profile with team and goal overview
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AthleteDetailResponse {
    #[serde(flatten)]
    pub athlete: AthleteResponse,
    pub team: Option<Team>,
    pub total_sessions: i64,
    pub goal_progress: GoalProgressRollup,
}

/// Request payload for creating an athlete profile on an existing user
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAthleteRequest {
    /// Defaults to the caller
    pub user_id: Option<Uuid>,

    pub sport: Sport,

    #[validate(length(min = 1, max = 100))]
    pub position: Option<String>,

    pub team_id: Option<Uuid>,

    pub coach_id: Option<Uuid>,

    #[validate(range(min = 0, max = 99, message = "Jersey number must be between 0 and 99"))]
    pub jersey_number: Option<i32>,

    pub date_of_birth: Option<NaiveDate>,
}

/// Request payload for updating an athlete profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAthleteRequest {
    pub sport: Option<Sport>,

    #[validate(length(min = 1, max = 100))]
    pub position: Option<String>,

    pub team_id: Option<Uuid>,

    pub coach_id: Option<Uuid>,

    #[validate(range(min = 0, max = 99, message = "Jersey number must be between 0 and 99"))]
    pub jersey_number: Option<i32>,

    pub date_of_birth: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jersey_number_range() {
        let mut req = UpdateAthleteRequest {
            jersey_number: Some(23),
            ..Default::default()
        };
        assert!(req.validate().is_ok());

        req.jersey_number = Some(120);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_empty_position_is_rejected() {
        let req = UpdateAthleteRequest {
            position: Some(String::new()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
