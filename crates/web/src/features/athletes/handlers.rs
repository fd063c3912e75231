use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::athlete::{
        AthleteDetailResponse, AthleteResponse, CreateAthleteRequest, UpdateAthleteRequest,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::AuthUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/athletes",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Athletes visible to the caller", body = Vec<AthleteResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "athletes"
)]
pub async fn list_athletes(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, WebError> {
    let athletes = services::list_athletes(db.pool(), &user).await?;

    let response: Vec<AthleteResponse> = athletes.into_iter().map(AthleteResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/athletes/{id}",
    params(
        ("id" = Uuid, Path, description = "Athlete ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Athlete found", body = AthleteDetailResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Athlete not found")
    ),
    tag = "athletes"
)]
pub async fn get_athlete(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let athlete = services::get_athlete(db.pool(), &user, id).await?;

    Ok(Json(athlete).into_response())
}

#[utoipa::path(
    post,
    path = "/api/athletes",
    request_body = CreateAthleteRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Athlete profile created", body = AthleteResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Profile already exists")
    ),
    tag = "athletes"
)]
pub async fn create_athlete(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateAthleteRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let athlete = services::create_athlete(db.pool(), &user, &req).await?;

    Ok((StatusCode::CREATED, Json(AthleteResponse::from(athlete))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/athletes/{id}",
    params(
        ("id" = Uuid, Path, description = "Athlete ID")
    ),
    request_body = UpdateAthleteRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Athlete updated successfully", body = AthleteResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Athlete not found")
    ),
    tag = "athletes"
)]
pub async fn update_athlete(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(update_req): Json<UpdateAthleteRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let updated = services::update_athlete(db.pool(), &user, id, &update_req).await?;

    Ok(Json(AthleteResponse::from(updated)).into_response())
}
