pub mod admin;
pub mod analytics;
pub mod athletes;
pub mod goals;
pub mod me;
pub mod metrics;
pub mod reports;

use axum::{Router, middleware};
use storage::Database;

use crate::middleware::auth::{AuthState, require_auth};

/// Every `/api` route; all of them require a bearer token.
pub fn routes(auth: AuthState) -> Router<Database> {
    Router::new()
        .merge(me::routes::routes())
        .merge(athletes::routes::routes())
        .merge(metrics::routes::routes())
        .merge(goals::routes::routes())
        .merge(analytics::routes::routes())
        .merge(reports::routes::routes())
        .merge(admin::routes::routes())
        .route_layer(middleware::from_fn_with_state(auth, require_auth))
}
