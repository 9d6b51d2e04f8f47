//! API routes for the fuel planning server.

pub mod error;
pub mod plan;
pub mod request_id;
mod routes;
pub mod stations;

use axum::Router;

pub use error::ApiError;

pub fn routes() -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router()
}

#[cfg(test)]
mod tests;
