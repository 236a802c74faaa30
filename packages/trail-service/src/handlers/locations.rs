use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;

use super::AppState;
use crate::models::{
    BoundsResponse, LocationEntry, LocationPoint, LocationQuery, LocationsResponse, RouteResponse,
};

fn not_found(message: String) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": message })),
    )
        .into_response()
}

/// Locations for the marker layer and table, narrowed by `search` / `difficulty`
pub async fn list_locations(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Json<LocationsResponse> {
    let dataset = state.dataset.read().await;

    let locations: Vec<LocationEntry> = dataset
        .filter(&query)
        .into_iter()
        .map(|(index, location)| LocationEntry::new(index, location.clone()))
        .collect();

    debug!(
        "Returning {} of {} locations (search={:?}, difficulty={:?})",
        locations.len(),
        dataset.len(),
        query.search,
        query.difficulty
    );

    Json(LocationsResponse {
        total_count: locations.len(),
        locations,
        source: dataset.source.clone(),
        loaded_at: dataset.loaded_at,
    })
}

pub async fn get_location(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Response {
    let dataset = state.dataset.read().await;

    match dataset.get(index) {
        Some(location) => Json(LocationEntry::new(index, location.clone())).into_response(),
        None => not_found(format!("No location at index {}", index)),
    }
}

/// Area to fit the map to, with the configured zoom limits
pub async fn get_bounds(State(state): State<AppState>) -> Json<BoundsResponse> {
    let dataset = state.dataset.read().await;
    let bounds = dataset.bounds();

    Json(BoundsResponse {
        south_west: bounds.map(|b| b.south_west),
        north_east: bounds.map(|b| b.north_east),
        center: LocationPoint::new(state.config.map_center_lat, state.config.map_center_lng),
        default_zoom: state.config.default_zoom,
        max_zoom: state.config.max_fit_zoom,
    })
}

pub async fn get_route(State(state): State<AppState>) -> Response {
    let dataset = state.dataset.read().await;

    match &dataset.route {
        Some(route) => Json(RouteResponse {
            name: route.name.clone(),
            points: route.points.clone(),
            length_meters: route.length_meters(),
        })
        .into_response(),
        None => not_found("No route configured".to_string()),
    }
}
