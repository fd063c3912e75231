use chrono::Utc;
use sqlx::PgPool;
use storage::{
    dto::report::{AthleteIdentity, Report, ReportQuery},
    error::StorageError,
    models::Athlete,
    repository::{AthleteRepository, TeamRepository},
    services::{
        authorization::{Permission, Resource},
        report,
    },
};
use uuid::Uuid;

use crate::error::{ApiResult, WebError};
use crate::features::analytics::services::load_activity;
use crate::middleware::auth::{AuthUser, authorize};

async fn team_name(pool: &PgPool, athlete: &Athlete) -> ApiResult<Option<String>> {
    let Some(team_id) = athlete.team_id else {
        return Ok(None);
    };

    match TeamRepository::new(pool).find_by_id(team_id).await {
        Ok(team) => Ok(Some(team.name)),
        Err(StorageError::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub async fn athlete_report(
    pool: &PgPool,
    user: &AuthUser,
    athlete_id: Uuid,
    query: &ReportQuery,
) -> ApiResult<Report> {
    query.validate().map_err(WebError::BadRequest)?;

    let athlete = AthleteRepository::new(pool).find_by_id(athlete_id).await?;
    authorize(user, Permission::ViewAthlete, Resource::Athlete(&athlete))?;

    let period = query.period();
    let (records, goals) = load_activity(pool, athlete_id, athlete.sport, period).await?;
    let identity = AthleteIdentity::from_athlete(&athlete, team_name(pool, &athlete).await?);

    tracing::info!(%athlete_id, requested_by = %user.user_id(), "Athlete report generated");

    Ok(report::compose(identity, &records, &goals, period, Utc::now()))
}

/// One report per rostered athlete
pub async fn team_report(
    pool: &PgPool,
    user: &AuthUser,
    team_id: Uuid,
    query: &ReportQuery,
) -> ApiResult<Vec<Report>> {
    query.validate().map_err(WebError::BadRequest)?;

    let team = TeamRepository::new(pool).find_by_id(team_id).await?;
    authorize(user, Permission::ViewTeam, Resource::Team(&team))?;

    let period = query.period();
    let roster = AthleteRepository::new(pool).list_by_team(team_id).await?;

    let mut entries = Vec::with_capacity(roster.len());
    for athlete in &roster {
        let (records, goals) =
            load_activity(pool, athlete.athlete_id, athlete.sport, period).await?;
        let identity = AthleteIdentity::from_athlete(athlete, Some(team.name.clone()));
        entries.push((identity, records, goals));
    }

    let reports = report::team_reports(
        entries
            .iter()
            .map(|(identity, records, goals)| {
                (identity.clone(), records.as_slice(), goals.as_slice())
            }),
        period,
        Utc::now(),
    );

    tracing::info!(%team_id, reports = reports.len(), "Team report generated");

    Ok(reports)
}
