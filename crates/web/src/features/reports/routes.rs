use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{athlete_report, team_report};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/athletes/:id/report", get(athlete_report))
        .route("/teams/:team_id/report", get(team_report))
}
