use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::analytics::{AnalyticsQuery, AthleteAnalyticsResponse, TeamAnalyticsResponse},
};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::AuthUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/athletes/{id}/analytics",
    params(
        ("id" = Uuid, Path, description = "Athlete ID"),
        AnalyticsQuery
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Summary and trend for the period", body = AthleteAnalyticsResponse),
        (status = 400, description = "Invalid period"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Athlete not found")
    ),
    tag = "analytics"
)]
pub async fn athlete_analytics(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Response, WebError> {
    let analytics = services::athlete_analytics(db.pool(), &user, id, &query).await?;

    Ok(Json(analytics).into_response())
}

#[utoipa::path(
    get,
    path = "/api/teams/{team_id}/analytics",
    params(
        ("team_id" = Uuid, Path, description = "Team ID"),
        AnalyticsQuery
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Team summary", body = TeamAnalyticsResponse),
        (status = 400, description = "Invalid period"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Team not found")
    ),
    tag = "analytics"
)]
pub async fn team_analytics(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(team_id): Path<Uuid>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Response, WebError> {
    let analytics = services::team_analytics(db.pool(), &user, team_id, &query).await?;

    Ok(Json(analytics).into_response())
}
