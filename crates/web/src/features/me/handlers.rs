use axum::{
    Extension, Json,
    response::{IntoResponse, Response},
};
use storage::models::User;

use crate::error::WebError;
use crate::middleware::auth::AuthUser;

#[utoipa::path(
    get,
    path = "/api/me",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The authenticated user", body = User),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users"
)]
pub async fn get_me(Extension(user): Extension<AuthUser>) -> Result<Response, WebError> {
    Ok(Json(user.0).into_response())
}
