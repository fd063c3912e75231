use axum::{Router, routing::get};
use storage::Database;

use super::handlers::get_me;

pub fn routes() -> Router<Database> {
    Router::new().route("/me", get(get_me))
}
