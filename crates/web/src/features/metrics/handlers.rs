use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::Paginated,
        metric::{CreateMetricRequest, MetricFilter, MetricRecordResponse},
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::AuthUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/athletes/{id}/metrics",
    params(
        ("id" = Uuid, Path, description = "Athlete ID"),
        MetricFilter
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Metric records, newest first", body = Paginated<MetricRecordResponse>),
        (status = 400, description = "Invalid filter"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Athlete not found")
    ),
    tag = "metrics"
)]
pub async fn list_metrics(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Query(filter): Query<MetricFilter>,
) -> Result<Response, WebError> {
    let page = services::list_metrics(db.pool(), &user, id, &filter).await?;

    Ok(Json(page).into_response())
}

#[utoipa::path(
    post,
    path = "/api/athletes/{id}/metrics",
    params(
        ("id" = Uuid, Path, description = "Athlete ID")
    ),
    request_body = CreateMetricRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Session recorded", body = MetricRecordResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Athlete not found")
    ),
    tag = "metrics"
)]
pub async fn create_metric(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateMetricRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let record = services::create_metric(db.pool(), &user, id, &req).await?;

    Ok((StatusCode::CREATED, Json(MetricRecordResponse::from(record))).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/metrics/{record_id}",
    params(
        ("record_id" = Uuid, Path, description = "Metric record ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Record not found")
    ),
    tag = "metrics"
)]
pub async fn delete_metric(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(record_id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_metric(db.pool(), &user, record_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/metrics/{record_id}/verify",
    params(
        ("record_id" = Uuid, Path, description = "Metric record ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Record verified", body = MetricRecordResponse),
        (status = 400, description = "Already verified"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Record not found")
    ),
    tag = "metrics"
)]
pub async fn verify_metric(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(record_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let record = services::verify_metric(db.pool(), &user, record_id).await?;

    Ok(Json(MetricRecordResponse::from(record)).into_response())
}
