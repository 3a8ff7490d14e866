// Person Registry - stores person records in an S3-compatible bucket

pub mod config;
pub mod middleware;
pub mod models;
pub mod records;
pub mod routes;
pub mod storage;
pub mod types;
pub mod utils;
pub mod validation;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
