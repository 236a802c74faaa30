pub mod locations;
pub mod reload;
pub mod validate_data;

use axum::{response::IntoResponse, Json};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{config::Config, services::dataset::TrailDataset};

pub use locations::{get_bounds, get_location, get_route, list_locations};
pub use reload::reload_data;
pub use validate_data::validate_data;

/// Shared handler state: configuration plus the currently loaded dataset
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub dataset: Arc<RwLock<TrailDataset>>,
}

impl AppState {
    pub fn new(config: Config, dataset: TrailDataset) -> Self {
        Self {
            config,
            dataset: Arc::new(RwLock::new(dataset)),
        }
    }
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "trail-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
