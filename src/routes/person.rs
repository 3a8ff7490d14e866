//! Single-file routes: every person lives in one CSV object.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use super::extract::ValidJson;
use crate::models::{AddPersonResponse, AppState, PersonCountResponse, PersonInput};
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/person", post(add_person))
        .route("/person/count", get(person_count))
        .with_state(state)
}

async fn add_person(
    State(state): State<AppState>,
    ValidJson(person): ValidJson<PersonInput>,
) -> AppResult<Json<AddPersonResponse>> {
    info!(name = %person.name, "Add person request received");

    let total_rows = state.csv_store.append(person).await?;

    Ok(Json(AddPersonResponse {
        message: "Person added".to_string(),
        total_rows,
    }))
}

async fn person_count(State(state): State<AppState>) -> AppResult<Json<PersonCountResponse>> {
    let row_count = state.csv_store.count().await?;

    Ok(Json(PersonCountResponse {
        row_count,
        file_name: state.csv_store.key().to_string(),
    }))
}
