use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{athlete_analytics, team_analytics};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/athletes/:id/analytics", get(athlete_analytics))
        .route("/teams/:team_id/analytics", get(team_analytics))
}
