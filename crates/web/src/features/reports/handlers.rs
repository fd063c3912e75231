use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::report::{Report, ReportQuery},
};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::AuthUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/athletes/{id}/report",
    params(
        ("id" = Uuid, Path, description = "Athlete ID"),
        ReportQuery
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Structured athlete report", body = Report),
        (status = 400, description = "Invalid period"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Athlete not found")
    ),
    tag = "reports"
)]
pub async fn athlete_report(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, WebError> {
    let report = services::athlete_report(db.pool(), &user, id, &query).await?;

    Ok(Json(report).into_response())
}

#[utoipa::path(
    get,
    path = "/api/teams/{team_id}/report",
    params(
        ("team_id" = Uuid, Path, description = "Team ID"),
        ReportQuery
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "One report per athlete on the roster", body = Vec<Report>),
        (status = 400, description = "Invalid period"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Team not found")
    ),
    tag = "reports"
)]
pub async fn team_report(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(team_id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, WebError> {
    let reports = services::team_report(db.pool(), &user, team_id, &query).await?;

    Ok(Json(reports).into_response())
}
