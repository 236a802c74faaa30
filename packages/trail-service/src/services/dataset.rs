use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use geo::{BoundingRect, MultiPoint, Point};

use crate::config::Config;
use crate::models::{LocationPoint, LocationQuery, Route, TrailLocation};
use crate::services::loader;

/// South-west and north-east corners of the area covering every location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: LocationPoint,
    pub north_east: LocationPoint,
}

/// Validated trail data as served to the map.
#[derive(Debug, Clone)]
pub struct TrailDataset {
    pub locations: Vec<TrailLocation>,
    pub route: Option<Route>,
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

impl TrailDataset {
    pub fn new(locations: Vec<TrailLocation>, route: Option<Route>, source: String) -> Self {
        Self {
            locations,
            route,
            source,
            loaded_at: Utc::now(),
        }
    }

    /// Load locations (and the route when configured). A source with no
    /// valid locations is an error.
    pub async fn load(config: &Config) -> Result<Self> {
        let locations = loader::load_locations(&config.data_path).await?;
        if locations.is_empty() {
            tracing::error!("No valid trail data found in {}", config.data_path);
            return Err(anyhow!("No valid trail data found"));
        }

        let route = match &config.route_path {
            Some(path) => Some(loader::load_route(path).await?),
            None => None,
        };

        Ok(Self::new(locations, route, config.data_path.clone()))
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrailLocation> {
        self.locations.get(index)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let points: MultiPoint<f64> = self
            .locations
            .iter()
            .map(|l| Point::new(l.longitude, l.latitude))
            .collect();

        points.bounding_rect().map(|rect| Bounds {
            south_west: LocationPoint::new(rect.min().y, rect.min().x),
            north_east: LocationPoint::new(rect.max().y, rect.max().x),
        })
    }

    /// Locations matching the table filter, paired with their index in the
    /// full dataset.
    pub fn filter(&self, query: &LocationQuery) -> Vec<(usize, &TrailLocation)> {
        let search = query
            .search
            .as_deref()
            .map(|s| s.to_lowercase())
            .filter(|s| !s.is_empty());
        let difficulty = query.difficulty.as_deref().filter(|d| !d.is_empty());

        self.locations
            .iter()
            .enumerate()
            .filter(|(_, location)| {
                let matches_search = search.as_deref().map_or(true, |term| {
                    ["name", "description", "trail", "comments"]
                        .iter()
                        .filter_map(|field| location.field(field))
                        .any(|value| value.to_lowercase().contains(term))
                });

                let matches_difficulty = difficulty.map_or(true, |wanted| {
                    location.fields.get("difficulty").map(String::as_str) == Some(wanted)
                });

                matches_search && matches_difficulty
            })
            .collect()
    }
}
