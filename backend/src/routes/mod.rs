//! Route definitions for the getVolunteer API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/volunteers", volunteer_routes())
        .nest("/needs", need_routes())
        .nest("/matches", match_routes())
}

/// Volunteer profile routes
fn volunteer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_volunteers).post(handlers::create_volunteer),
        )
        .route(
            "/:volunteer_id",
            get(handlers::get_volunteer)
                .put(handlers::update_volunteer)
                .delete(handlers::delete_volunteer),
        )
        .route(
            "/:volunteer_id/matches",
            get(handlers::get_volunteer_matches),
        )
}

/// Need routes
fn need_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_needs).post(handlers::create_need))
        .route(
            "/:need_id",
            get(handlers::get_need)
                .put(handlers::update_need)
                .delete(handlers::delete_need),
        )
        .route(
            "/:need_id/matches",
            get(handlers::get_need_matches).delete(handlers::clear_need_matches),
        )
}

/// Match routes
fn match_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_match))
        .route(
            "/:match_id",
            get(handlers::get_match).delete(handlers::delete_match),
        )
}
