use sqlx::PgPool;
use storage::{
    dto::analytics::{
        AnalyticsQuery, AthleteAnalytics, AthleteAnalyticsResponse, ReportPeriod,
        TeamAnalyticsResponse,
    },
    models::{Athlete, Goal, MetricRecord, Sport},
    repository::{AthleteRepository, GoalRepository, MetricRepository, TeamRepository},
    services::{
        analytics,
        authorization::{Permission, Resource},
        goal_progress,
    },
};
use uuid::Uuid;

use crate::error::{ApiResult, WebError};
use crate::middleware::auth::{AuthUser, authorize};

/// Records of one sport in the period plus every goal of the athlete
pub(crate) async fn load_activity(
    pool: &PgPool,
    athlete_id: Uuid,
    sport: Sport,
    period: ReportPeriod,
) -> ApiResult<(Vec<MetricRecord>, Vec<Goal>)> {
    let records = MetricRepository::new(pool)
        .find_in_period(athlete_id, sport, period)
        .await?;
    let goals = GoalRepository::new(pool)
        .list_by_athlete(athlete_id, None)
        .await?;
    Ok((records, goals))
}

pub async fn athlete_analytics(
    pool: &PgPool,
    user: &AuthUser,
    athlete_id: Uuid,
    query: &AnalyticsQuery,
) -> ApiResult<AthleteAnalyticsResponse> {
    query.validate().map_err(WebError::BadRequest)?;

    let athlete = AthleteRepository::new(pool).find_by_id(athlete_id).await?;
    authorize(user, Permission::ViewAthlete, Resource::Athlete(&athlete))?;

    let sport = query.sport.unwrap_or(athlete.sport);
    let period = query.period();
    let (records, goals) = load_activity(pool, athlete_id, sport, period).await?;

    Ok(AthleteAnalyticsResponse {
        athlete_id,
        sport,
        period,
        summary: analytics::summarize(&records, sport),
        goal_progress: goal_progress::rollup(&goals),
        trend: analytics::trend_data(&records).collect(),
    })
}

async fn roster_entry(
    pool: &PgPool,
    athlete: &Athlete,
    sport: Sport,
    period: ReportPeriod,
) -> ApiResult<AthleteAnalytics> {
    let (records, goals) = load_activity(pool, athlete.athlete_id, sport, period).await?;

    Ok(AthleteAnalytics {
        athlete_id: athlete.athlete_id,
        athlete_name: athlete.full_name(),
        summary: analytics::summarize(&records, sport),
        goal_progress: goal_progress::rollup(&goals),
    })
}

/// Team rollup over every athlete on the roster
pub async fn team_analytics(
    pool: &PgPool,
    user: &AuthUser,
    team_id: Uuid,
    query: &AnalyticsQuery,
) -> ApiResult<TeamAnalyticsResponse> {
    query.validate().map_err(WebError::BadRequest)?;

    let team = TeamRepository::new(pool).find_by_id(team_id).await?;
    authorize(user, Permission::ViewTeam, Resource::Team(&team))?;

    let sport = query.sport.unwrap_or(team.sport);
    let period = query.period();
    let roster = AthleteRepository::new(pool).list_by_team(team_id).await?;

    let mut athletes = Vec::with_capacity(roster.len());
    for athlete in &roster {
        athletes.push(roster_entry(pool, athlete, sport, period).await?);
    }

    tracing::debug!(%team_id, athletes = athletes.len(), "Team analytics computed");

    Ok(TeamAnalyticsResponse {
        team_id,
        team_name: team.name,
        period,
        summary: analytics::team_summarize(&athletes, sport),
        athletes,
    })
}
