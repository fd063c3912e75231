use sqlx::PgPool;
use storage::{
    dto::athlete::{AthleteDetailResponse, CreateAthleteRequest, UpdateAthleteRequest},
    error::StorageError,
    models::{Athlete, Role},
    repository::{
        AthleteRepository, GoalRepository, MetricRepository, TeamRepository, UserRepository,
    },
    services::{
        authorization::{Permission, Resource},
        goal_progress,
    },
};
use uuid::Uuid;

use crate::error::{ApiResult, WebError};
use crate::middleware::auth::{AuthUser, authorize};

/// List the athletes visible to the caller
pub async fn list_athletes(pool: &PgPool, user: &AuthUser) -> ApiResult<Vec<Athlete>> {
    let repo = AthleteRepository::new(pool);
    Ok(repo.list_visible(user.user_id(), user.0.role).await?)
}

/// Profile with team, session count and goal overview
pub async fn get_athlete(
    pool: &PgPool,
    user: &AuthUser,
    athlete_id: Uuid,
) -> ApiResult<AthleteDetailResponse> {
    let athlete = AthleteRepository::new(pool).find_by_id(athlete_id).await?;
    authorize(user, Permission::ViewAthlete, Resource::Athlete(&athlete))?;

    let team = match athlete.team_id {
        Some(team_id) => match TeamRepository::new(pool).find_by_id(team_id).await {
            Ok(team) => Some(team),
            Err(StorageError::NotFound) => None,
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    let total_sessions = MetricRepository::new(pool)
        .count_for_athlete(athlete_id)
        .await?;
    let goals = GoalRepository::new(pool)
        .list_by_athlete(athlete_id, None)
        .await?;

    Ok(AthleteDetailResponse {
        athlete: athlete.into(),
        team,
        total_sessions,
        goal_progress: goal_progress::rollup(&goals),
    })
}

/// Create an athlete profile.
///
/// Athletes may only create their own; a coach creating a profile without a
/// coach becomes its coach.
pub async fn create_athlete(
    pool: &PgPool,
    user: &AuthUser,
    req: &CreateAthleteRequest,
) -> ApiResult<Athlete> {
    let target_id = req.user_id.unwrap_or(user.user_id());

    let mut req = req.clone();
    match user.0.role {
        Role::Athlete if target_id != user.user_id() => return Err(WebError::Forbidden),
        Role::Athlete => {
            req.coach_id = None;
            req.team_id = None;
        }
        Role::Coach => {
            req.coach_id.get_or_insert(user.user_id());
        }
        Role::Admin => {}
    }

    let target = UserRepository::new(pool).find_by_id(target_id).await?;
    if target.role != Role::Athlete {
        return Err(WebError::BadRequest(format!(
            "User {} is not an athlete",
            target.user_id
        )));
    }

    let athlete = AthleteRepository::new(pool).create(target_id, &req).await?;

    tracing::info!(
        athlete_id = %athlete.athlete_id,
        created_by = %user.user_id(),
        "Athlete profile created"
    );

    Ok(athlete)
}

/// Update an athlete profile. Only coaches and admins reassign team or coach.
pub async fn update_athlete(
    pool: &PgPool,
    user: &AuthUser,
    athlete_id: Uuid,
    req: &UpdateAthleteRequest,
) -> ApiResult<Athlete> {
    let repo = AthleteRepository::new(pool);
    let existing = repo.find_by_id(athlete_id).await?;
    authorize(user, Permission::ManageAthlete, Resource::Athlete(&existing))?;

    if user.0.role == Role::Athlete && (req.team_id.is_some() || req.coach_id.is_some()) {
        tracing::warn!(%athlete_id, "Athlete attempted to reassign team or coach");
        return Err(WebError::Forbidden);
    }

    let athlete = repo.update(&existing, req).await?;

    tracing::info!(%athlete_id, updated_by = %user.user_id(), "Athlete profile updated");

    Ok(athlete)
}
