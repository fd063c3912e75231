use axum::{
    Router,
    routing::{delete, get, post},
};
use storage::Database;

use super::handlers::{create_metric, delete_metric, list_metrics, verify_metric};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/athletes/:id/metrics", get(list_metrics).post(create_metric))
        .route("/metrics/:record_id", delete(delete_metric))
        .route("/metrics/:record_id/verify", post(verify_metric))
}
