//! Need HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::ListParams;
use validator::Validate;

use crate::error::AppError;
use crate::services::need::{NeedInput, NeedService};
use crate::AppState;

/// List needs
pub async fn list_needs(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let service = NeedService::new(state.db.clone());

    match service.get_needs(params).await {
        Ok(needs) => (StatusCode::OK, Json(needs)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a need
pub async fn get_need(
    State(state): State<AppState>,
    Path(need_id): Path<i64>,
) -> impl IntoResponse {
    let service = NeedService::new(state.db.clone());

    match service.get_need(need_id).await {
        Ok(need) => (StatusCode::OK, Json(need)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a need
pub async fn create_need(
    State(state): State<AppState>,
    Json(input): Json<NeedInput>,
) -> impl IntoResponse {
    if let Err(e) = input.validate() {
        return AppError::from(e).into_response();
    }

    let service = NeedService::new(state.db.clone());

    match service.create_need(input).await {
        Ok(need) => (StatusCode::CREATED, Json(need)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Replace a need
pub async fn update_need(
    State(state): State<AppState>,
    Path(need_id): Path<i64>,
    Json(input): Json<NeedInput>,
) -> impl IntoResponse {
    if let Err(e) = input.validate() {
        return AppError::from(e).into_response();
    }

    let service = NeedService::new(state.db.clone());

    match service.update_need(need_id, input).await {
        Ok(need) => (StatusCode::OK, Json(need)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a need
pub async fn delete_need(
    State(state): State<AppState>,
    Path(need_id): Path<i64>,
) -> impl IntoResponse {
    let service = NeedService::new(state.db.clone());

    match service.delete_need(need_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

/// List the volunteers matched to a need
pub async fn get_need_matches(
    State(state): State<AppState>,
    Path(need_id): Path<i64>,
) -> impl IntoResponse {
    let service = NeedService::new(state.db.clone());

    match service.get_matches(need_id).await {
        Ok(matches) => (StatusCode::OK, Json(matches)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Remove every match of a need
pub async fn clear_need_matches(
    State(state): State<AppState>,
    Path(need_id): Path<i64>,
) -> impl IntoResponse {
    let service = NeedService::new(state.db.clone());

    match service.clear_matches(need_id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
