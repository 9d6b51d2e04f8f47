//! REST API routes.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{plan, request_id, stations};
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/v1/routes/plan", post(plan::plan_route))
        .route(
            "/v1/stations",
            get(stations::list_stations).put(stations::replace_stations),
        )
        .route("/v1/stations/:id", get(stations::get_station))
        .layer(middleware::from_fn(request_id::ensure_request_id))
}
