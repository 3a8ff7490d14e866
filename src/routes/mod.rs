//! HTTP routes
//!
//! - `/`, `/health` - liveness
//! - `/person`, `/person/count` - single-file (CSV) store
//! - `/insert`, `/count` - multi-file (JSON per record) store

pub mod extract;
pub mod health;
pub mod person;
pub mod persona;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the application router with both record groups mounted.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let origins = state.config.server.cors_allowed_origins.clone();
    let router = Router::new()
        .merge(health::router())
        .merge(person::router(state.clone()))
        .merge(persona::router(state))
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &origins)
}
