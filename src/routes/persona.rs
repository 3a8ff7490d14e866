//! Multi-file routes: one JSON object per persona.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, warn};

use super::extract::ValidJson;
use crate::models::{AppState, FileCountResponse, InsertResponse, PersonaInput};
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/insert", post(insert_persona))
        .route("/count", get(file_count))
        .with_state(state)
}

async fn insert_persona(
    State(state): State<AppState>,
    ValidJson(persona): ValidJson<PersonaInput>,
) -> AppResult<Json<InsertResponse>> {
    info!(name = %persona.name, city = %persona.city, "Insert persona request received");

    let (file, saved_data) = state.json_store.insert(persona).await?;
    // The object is already stored; a failed count must not turn into a 500
    // that invites the client to insert it again.
    let total_file_count = match state.json_store.count_all().await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!(file = %file, error = %e, "Persona saved but counting failed");
            None
        }
    };

    Ok(Json(InsertResponse {
        message: "Persona saved".to_string(),
        file,
        total_file_count,
        saved_data,
    }))
}

async fn file_count(State(state): State<AppState>) -> AppResult<Json<FileCountResponse>> {
    let file_count = state.json_store.count_all().await?;

    Ok(Json(FileCountResponse {
        file_count,
        bucket_name: state.json_store.bucket().to_string(),
    }))
}
