use axum::{
    Router,
    routing::get,
};
use storage::Database;

use super::handlers::{create_athlete, get_athlete, list_athletes, update_athlete};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/athletes", get(list_athletes).post(create_athlete))
        .route("/athletes/:id", get(get_athlete).put(update_athlete))
}
