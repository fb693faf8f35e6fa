use axum::{extract::State, http::StatusCode, Json};
use common::types::Message;
use models::{Actress, ActressPatch, NewActress};

use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

/// List every actress.
pub async fn list_actresses(State(state): State<AppState>) -> Json<Vec<Actress>> {
    Json(state.store.list().await)
}

pub async fn get_actress(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<Actress>, ApiError> {
    Ok(Json(state.store.get(id).await?))
}

/// Create an actress; responds 201 with the stored record.
pub async fn create_actress(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewActress>,
) -> Result<(StatusCode, Json<Actress>), ApiError> {
    let created = state.store.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Partial update: only fields present in the body change.
pub async fn update_actress(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(patch): ApiJson<ActressPatch>,
) -> Result<Json<Actress>, ApiError> {
    Ok(Json(state.store.update(id, patch).await?))
}

pub async fn delete_actress(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<Message>, ApiError> {
    state.store.delete(id).await?;
    Ok(Json(Message::new("Actress deleted successfully!")))
}
