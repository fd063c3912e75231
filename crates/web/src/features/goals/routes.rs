use axum::{
    Router,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{
    add_feedback, add_milestone, create_goal, delete_goal, get_goal, list_goals, record_progress,
    update_goal,
};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/athletes/:id/goals", get(list_goals).post(create_goal))
        .route(
            "/goals/:goal_id",
            get(get_goal).put(update_goal).delete(delete_goal),
        )
        .route("/goals/:goal_id/progress", post(record_progress))
        .route("/goals/:goal_id/milestones", post(add_milestone))
        .route("/goals/:goal_id/feedback", post(add_feedback))
}
