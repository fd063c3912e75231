use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::goal::{
        CreateGoalRequest, FeedbackRequest, GoalFilter, MilestoneInput, ProgressUpdateRequest,
        UpdateGoalRequest,
    },
    models::Goal,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::AuthUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/athletes/{id}/goals",
    params(
        ("id" = Uuid, Path, description = "Athlete ID"),
        GoalFilter
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Goals visible to the caller", body = Vec<Goal>),
        (status = 404, description = "Athlete not found")
    ),
    tag = "goals"
)]
pub async fn list_goals(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Query(filter): Query<GoalFilter>,
) -> Result<Response, WebError> {
    let goals = services::list_goals(db.pool(), &user, id, &filter).await?;

    Ok(Json(goals).into_response())
}

#[utoipa::path(
    post,
    path = "/api/athletes/{id}/goals",
    params(
        ("id" = Uuid, Path, description = "Athlete ID")
    ),
    request_body = CreateGoalRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Goal created", body = Goal),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Athlete not found")
    ),
    tag = "goals"
)]
pub async fn create_goal(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateGoalRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let goal = services::create_goal(db.pool(), &user, id, &req).await?;

    Ok((StatusCode::CREATED, Json(goal)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/goals/{goal_id}",
    params(
        ("goal_id" = Uuid, Path, description = "Goal ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Goal found", body = Goal),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Goal not found")
    ),
    tag = "goals"
)]
pub async fn get_goal(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let goal = services::get_goal(db.pool(), &user, goal_id).await?;

    Ok(Json(goal).into_response())
}

#[utoipa::path(
    put,
    path = "/api/goals/{goal_id}",
    params(
        ("goal_id" = Uuid, Path, description = "Goal ID")
    ),
    request_body = UpdateGoalRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Goal updated", body = Goal),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Goal not found")
    ),
    tag = "goals"
)]
pub async fn update_goal(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
    Json(req): Json<UpdateGoalRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let goal = services::update_goal(db.pool(), &user, goal_id, &req).await?;

    Ok(Json(goal).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/goals/{goal_id}",
    params(
        ("goal_id" = Uuid, Path, description = "Goal ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Goal deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Goal not found")
    ),
    tag = "goals"
)]
pub async fn delete_goal(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_goal(db.pool(), &user, goal_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/goals/{goal_id}/progress",
    params(
        ("goal_id" = Uuid, Path, description = "Goal ID")
    ),
    request_body = ProgressUpdateRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Progress recorded", body = Goal),
        (status = 400, description = "Validation error or zero target"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Goal not found")
    ),
    tag = "goals"
)]
pub async fn record_progress(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
    Json(req): Json<ProgressUpdateRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let goal = services::record_progress(db.pool(), &user, goal_id, &req).await?;

    Ok(Json(goal).into_response())
}

#[utoipa::path(
    post,
    path = "/api/goals/{goal_id}/milestones",
    params(
        ("goal_id" = Uuid, Path, description = "Goal ID")
    ),
    request_body = MilestoneInput,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Milestone added", body = Goal),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Goal not found")
    ),
    tag = "goals"
)]
pub async fn add_milestone(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
    Json(req): Json<MilestoneInput>,
) -> Result<Response, WebError> {
    req.validate()?;

    let goal = services::add_milestone(db.pool(), &user, goal_id, &req).await?;

    Ok((StatusCode::CREATED, Json(goal)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/goals/{goal_id}/feedback",
    params(
        ("goal_id" = Uuid, Path, description = "Goal ID")
    ),
    request_body = FeedbackRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Feedback added", body = Goal),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Only the athlete's coach may review"),
        (status = 404, description = "Goal not found")
    ),
    tag = "goals"
)]
pub async fn add_feedback(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let goal = services::add_feedback(db.pool(), &user, goal_id, &req).await?;

    Ok((StatusCode::CREATED, Json(goal)).into_response())
}
