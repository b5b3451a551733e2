//! Volunteer HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::ListParams;
use validator::Validate;

use crate::error::AppError;
use crate::services::volunteer::{CreateVolunteerInput, UpdateVolunteerInput, VolunteerService};
use crate::AppState;

/// List volunteer profiles
pub async fn list_volunteers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let service = VolunteerService::new(state.db.clone());

    match service.get_volunteers(params).await {
        Ok(volunteers) => (StatusCode::OK, Json(volunteers)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a volunteer profile
pub async fn get_volunteer(
    State(state): State<AppState>,
    Path(volunteer_id): Path<i64>,
) -> impl IntoResponse {
    let service = VolunteerService::new(state.db.clone());

    match service.get_volunteer(volunteer_id).await {
        Ok(volunteer) => (StatusCode::OK, Json(volunteer)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a volunteer profile
pub async fn create_volunteer(
    State(state): State<AppState>,
    Json(input): Json<CreateVolunteerInput>,
) -> impl IntoResponse {
    if let Err(e) = input.validate() {
        return AppError::from(e).into_response();
    }

    let service = VolunteerService::new(state.db.clone());

    match service.create_volunteer(input).await {
        Ok(volunteer) => (StatusCode::CREATED, Json(volunteer)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a volunteer profile
pub async fn update_volunteer(
    State(state): State<AppState>,
    Path(volunteer_id): Path<i64>,
    Json(input): Json<UpdateVolunteerInput>,
) -> impl IntoResponse {
    if let Err(e) = input.validate() {
        return AppError::from(e).into_response();
    }

    let service = VolunteerService::new(state.db.clone());

    match service.update_volunteer(volunteer_id, input).await {
        Ok(volunteer) => (StatusCode::OK, Json(volunteer)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a volunteer profile
pub async fn delete_volunteer(
    State(state): State<AppState>,
    Path(volunteer_id): Path<i64>,
) -> impl IntoResponse {
    let service = VolunteerService::new(state.db.clone());

    match service.delete_volunteer(volunteer_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

/// List the needs a volunteer has been matched to
pub async fn get_volunteer_matches(
    State(state): State<AppState>,
    Path(volunteer_id): Path<i64>,
) -> impl IntoResponse {
    let service = VolunteerService::new(state.db.clone());

    match service.get_matches(volunteer_id).await {
        Ok(matches) => (StatusCode::OK, Json(matches)).into_response(),
        Err(e) => e.into_response(),
    }
}
