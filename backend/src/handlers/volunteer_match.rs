//! Match HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::error::AppError;
use crate::services::volunteer_match::{CreateMatchInput, MatchService};
use crate::AppState;

/// Record a match
pub async fn create_match(
    State(state): State<AppState>,
    Json(input): Json<CreateMatchInput>,
) -> impl IntoResponse {
    if let Err(e) = input.validate() {
        return AppError::from(e).into_response();
    }

    let service = MatchService::new(state.db.clone());

    match service.create_match(input).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a match
pub async fn get_match(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
) -> impl IntoResponse {
    let service = MatchService::new(state.db.clone());

    match service.get_match(match_id).await {
        Ok(found) => (StatusCode::OK, Json(found)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a match
pub async fn delete_match(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
) -> impl IntoResponse {
    let service = MatchService::new(state.db.clone());

    match service.delete_match(match_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
