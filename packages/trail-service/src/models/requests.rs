use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::location::{LocationPoint, TrailLocation};

/// Table filter parameters for `GET /api/locations`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationEntry {
    pub index: usize,
    pub difficulty_level: i64,
    pub difficulty_label: String,
    #[serde(flatten)]
    pub location: TrailLocation,
}

impl LocationEntry {
    pub fn new(index: usize, location: TrailLocation) -> Self {
        let difficulty = location.difficulty();
        Self {
            index,
            difficulty_level: difficulty.level(),
            difficulty_label: difficulty.label().to_string(),
            location,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationsResponse {
    pub locations: Vec<LocationEntry>,
    pub total_count: usize,
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundsResponse {
    // None when no locations are loaded
    pub south_west: Option<LocationPoint>,
    pub north_east: Option<LocationPoint>,
    pub center: LocationPoint,
    pub default_zoom: u8,
    pub max_zoom: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub points: Vec<LocationPoint>,
    pub length_meters: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedRow {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateDataResponse {
    pub success: bool,
    pub valid: Vec<TrailLocation>,
    pub rejected: Vec<RejectedRow>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidateDataResponse {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            valid: Vec::new(),
            rejected: Vec::new(),
            error: Some(message),
        }
    }
}
