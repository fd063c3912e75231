use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{Database, dto::goal::OverdueSweepResponse};

use crate::error::WebError;
use crate::middleware::auth::AuthUser;

use super::services;

#[utoipa::path(
    post,
    path = "/api/admin/goals/refresh-overdue",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Number of goals marked overdue", body = OverdueSweepResponse),
        (status = 403, description = "Admins only")
    ),
    tag = "admin"
)]
pub async fn refresh_overdue(
    State(db): State<Database>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, WebError> {
    let sweep = services::refresh_overdue(db.pool(), &user).await?;

    Ok(Json(sweep).into_response())
}
