use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod handlers;
pub mod libraries;
pub mod models;
pub mod services;

use handlers::{
    get_bounds, get_location, get_route, health, list_locations, reload_data, validate_data,
    AppState,
};

/// Build the HTTP router over shared state
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
        .route("/api/locations", get(list_locations))
        .route("/api/locations/:index", get(get_location))
        .route("/api/bounds", get(get_bounds))
        .route("/api/route", get(get_route))
        .route("/api/reload", post(reload_data))
        .route("/api/validate", post(validate_data))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
