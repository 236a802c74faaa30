use geo::{HaversineLength, LineString};
use serde::{Deserialize, Serialize};

use super::location::LocationPoint;

/// An ordered path drawn alongside the trail markers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub points: Vec<LocationPoint>,
}

impl Route {
    /// Total path length in meters along great circles
    pub fn length_meters(&self) -> f64 {
        let line: LineString<f64> = self
            .points
            .iter()
            .map(|p| (p.longitude, p.latitude))
            .collect();
        line.haversine_length()
    }
}
