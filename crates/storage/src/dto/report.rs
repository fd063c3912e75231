use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::analytics::{AnalyticsSummary, ReportPeriod};
use super::goal::GoalProgressRollup;
use crate::models::{Athlete, Sport};

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
}

impl ReportQuery {
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return Err("from must not be after to".to_string());
        }
        Ok(())
    }

    pub fn period(&self) -> ReportPeriod {
        ReportPeriod {
            from: self.from,
            to: self.to,
        }
    }
}

/// Who a report is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AthleteIdentity {
    pub athlete_id: Uuid,
    pub name: String,
    pub sport: Sport,
    pub position: Option<String>,
    pub jersey_number: Option<i32>,
    pub team_name: Option<String>,
}

impl AthleteIdentity {
    pub fn from_athlete(athlete: &Athlete, team_name: Option<String>) -> Self {
        Self {
            athlete_id: athlete.athlete_id,
            name: athlete.full_name(),
            sport: athlete.sport,
            position: athlete.position.clone(),
            jersey_number: athlete.jersey_number,
            team_name,
        }
    }
}

/// Structured report handed to the document renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Report {
    pub athlete: AthleteIdentity,
    pub period: ReportPeriod,
    pub analytics: AnalyticsSummary,
    pub goal_progress: GoalProgressRollup,
    pub summary: String,
    pub generated_at: DateTime<Utc>,
}
