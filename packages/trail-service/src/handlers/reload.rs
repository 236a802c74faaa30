use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::{error, info};

use super::AppState;
use crate::services::dataset::TrailDataset;

/// Re-read the configured sources. The current dataset is only replaced
/// when the new load succeeds.
pub async fn reload_data(State(state): State<AppState>) -> impl IntoResponse {
    info!("Reloading trail data from {}", state.config.data_path);

    match TrailDataset::load(&state.config).await {
        Ok(dataset) => {
            let count = dataset.len();
            *state.dataset.write().await = dataset;
            info!("Reloaded {} trail locations", count);

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "total_count": count,
                    "message": format!("Loaded {} trail locations", count)
                })),
            )
        }
        Err(e) => {
            error!("Failed to reload trail data: {:#}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "success": false,
                    "error": format!("Error loading data: {}", e)
                })),
            )
        }
    }
}
