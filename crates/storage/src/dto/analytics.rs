use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::goal::GoalProgressRollup;
use crate::models::Sport;

/// Inclusive date window a summary or report covers. Open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReportPeriod {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Defaults to the athlete's (or team's) sport
    pub sport: Option<Sport>,
}

impl AnalyticsQuery {
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

/// Aggregated statistics over a set of metric records for one athlete.
///
/// `breakdown` is absent when there are no records or the sport has no
/// defined field set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsSummary {
    pub total_games: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<SportBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "sport", rename_all = "lowercase")]
pub enum SportBreakdown {
    Basketball(BasketballBreakdown),
    Soccer(SoccerBreakdown),
    Football(FootballBreakdown),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BasketballBreakdown {
    pub average_points: f64,
    pub average_rebounds: f64,
    pub average_assists: f64,
    pub average_field_goal_percentage: f64,
    pub average_three_point_percentage: f64,
    pub average_free_throw_percentage: f64,
    pub best_game: BestGame,
}

/// Highest-scoring session; all-zero when no session scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BestGame {
    pub record_id: Option<Uuid>,
    pub session_date: Option<NaiveDate>,
    pub opponent: Option<String>,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SoccerBreakdown {
    pub total_goals: u64,
    pub total_assists: u64,
    pub average_pass_accuracy: f64,
    pub average_shots: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FootballBreakdown {
    pub total_passing_yards: u64,
    pub total_rushing_yards: u64,
    pub total_touchdowns: u64,
    pub average_completion_percentage: f64,
}

/// One point of the per-session chart series.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TrendPoint {
    pub session_date: NaiveDate,
    #[schema(value_type = Object)]
    pub counters: BTreeMap<&'static str, u32>,
}

/// Per-athlete input to the team rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AthleteAnalytics {
    pub athlete_id: Uuid,
    pub athlete_name: String,
    pub summary: AnalyticsSummary,
    pub goal_progress: GoalProgressRollup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TeamAnalyticsSummary {
    pub sport: Sport,
    pub athlete_count: usize,
    pub average_total_games: f64,
    pub average_goal_progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<TeamBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "sport", rename_all = "lowercase")]
pub enum TeamBreakdown {
    Basketball(TeamBasketballBreakdown),
    Soccer(SoccerBreakdown),
    Football(FootballBreakdown),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TeamBasketballBreakdown {
    pub average_points: f64,
    pub average_rebounds: f64,
    pub average_assists: f64,
    pub average_field_goal_percentage: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AthleteAnalyticsResponse {
    pub athlete_id: Uuid,
    pub sport: Sport,
    pub period: ReportPeriod,
    pub summary: AnalyticsSummary,
    pub goal_progress: GoalProgressRollup,
    pub trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamAnalyticsResponse {
    pub team_id: Uuid,
    pub team_name: String,
    pub period: ReportPeriod,
    pub summary: TeamAnalyticsSummary,
    pub athletes: Vec<AthleteAnalytics>,
}
