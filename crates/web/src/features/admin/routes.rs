use axum::{Router, routing::post};
use storage::Database;

use super::handlers::refresh_overdue;

pub fn routes() -> Router<Database> {
    Router::new().route("/admin/goals/refresh-overdue", post(refresh_overdue))
}
