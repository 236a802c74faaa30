use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;

use crate::libraries::{csv_parser, validator};
use crate::models::{LocationPoint, RawRecord, Route, TrailLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    /// `.json` / `.csv` extensions win; otherwise sniff the first non-blank character.
    pub fn detect(source: &str, text: &str) -> Self {
        let path = source
            .split(['?', '#'])
            .next()
            .unwrap_or(source)
            .to_ascii_lowercase();
        if path.ends_with(".json") {
            return SourceFormat::Json;
        }
        if path.ends_with(".csv") {
            return SourceFormat::Csv;
        }
        match text.trim_start().chars().next() {
            Some('[') | Some('{') => SourceFormat::Json,
            _ => SourceFormat::Csv,
        }
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Read a data file from a local path or an http(s) URL.
pub async fn load_text(source: &str) -> Result<String> {
    if !is_remote(source) {
        return tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("Failed to read data file {}", source));
    }

    tracing::debug!("Fetching data file from {}", source);

    let client = reqwest::Client::builder()
        .user_agent(concat!("trail-service/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(15))
        .build()
        .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

    let response = client.get(source).send().await.map_err(|e| {
        let mut error_msg = format!("Request for {} failed: {}", source, e);
        let mut cause = e.source();
        while let Some(err) = cause {
            error_msg.push_str(&format!("\n  Caused by: {}", err));
            cause = err.source();
        }
        anyhow!(error_msg)
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("Failed to load data file: {}", status));
    }

    response
        .text()
        .await
        .map_err(|e| anyhow!("Failed to read response body from {}: {}", source, e))
}

/// Turn file contents into unvalidated records.
pub fn parse_records(text: &str, format: SourceFormat) -> Result<Vec<RawRecord>> {
    match format {
        SourceFormat::Csv => Ok(csv_parser::parse_csv(text)?),
        SourceFormat::Json => json_records(text),
    }
}

fn json_records(text: &str) -> Result<Vec<RawRecord>> {
    let value: Value = serde_json::from_str(text).context("Invalid JSON location data")?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("locations") {
            Some(Value::Array(items)) => items,
            _ => return Err(anyhow!("JSON object must contain a \"locations\" array")),
        },
        _ => return Err(anyhow!("JSON location data must be an array or object")),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map
                .into_iter()
                .filter_map(|(key, value)| {
                    let value = match value {
                        Value::String(s) => s.trim().to_string(),
                        Value::Number(n) => n.to_string(),
                        Value::Bool(b) => b.to_string(),
                        Value::Null => return None,
                        other => other.to_string(),
                    };
                    Some((key.trim().to_string(), value))
                })
                .collect()),
            _ => Err(anyhow!("Location entry {} is not an object", i + 1)),
        })
        .collect()
}

/// Load, parse and validate the locations at `source`.
pub async fn load_locations(source: &str) -> Result<Vec<TrailLocation>> {
    let result = async {
        let text = load_text(source).await?;
        let records = parse_records(&text, SourceFormat::detect(source, &text))?;
        Ok::<_, anyhow::Error>(validator::validate_location_data(records))
    }
    .await;

    match result {
        Ok(locations) => {
            tracing::info!("Loaded {} valid locations from {}", locations.len(), source);
            Ok(locations)
        }
        Err(e) => {
            tracing::error!("Error loading location data from {}: {:#}", source, e);
            Err(e)
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoutePointInput {
    Pair([f64; 2]),
    Long { latitude: f64, longitude: f64 },
    Short { lat: f64, lng: f64 },
}

impl From<RoutePointInput> for LocationPoint {
    fn from(input: RoutePointInput) -> Self {
        match input {
            RoutePointInput::Pair([lat, lng]) => LocationPoint::new(lat, lng),
            RoutePointInput::Long {
                latitude,
                longitude,
            } => LocationPoint::new(latitude, longitude),
            RoutePointInput::Short { lat, lng } => LocationPoint::new(lat, lng),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RouteInput {
    Points(Vec<RoutePointInput>),
    Named {
        #[serde(default)]
        name: Option<String>,
        points: Vec<RoutePointInput>,
    },
}

/// Parse route JSON, dropping points outside valid coordinate ranges.
pub fn parse_route(text: &str) -> Result<Route> {
    let input: RouteInput = serde_json::from_str(text).context("Invalid route JSON")?;
    let (name, points) = match input {
        RouteInput::Points(points) => (None, points),
        RouteInput::Named { name, points } => (name, points),
    };

    let points = points
        .into_iter()
        .map(LocationPoint::from)
        .enumerate()
        .filter_map(|(i, point)| {
            if point.is_valid() {
                Some(point)
            } else {
                tracing::warn!(
                    "Route point {} has out-of-range coordinates: lat={}, lng={}",
                    i + 1,
                    point.latitude,
                    point.longitude
                );
                None
            }
        })
        .collect();

    Ok(Route { name, points })
}

pub async fn load_route(source: &str) -> Result<Route> {
    let text = load_text(source).await?;
    let route = parse_route(&text).map_err(|e| {
        tracing::error!("Error loading route from {}: {:#}", source, e);
        e
    })?;
    tracing::info!("Loaded route with {} points from {}", route.points.len(), source);
    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(SourceFormat::detect("data/trails.csv", "[]"), SourceFormat::Csv);
        assert_eq!(SourceFormat::detect("data/trails.JSON", "name"), SourceFormat::Json);
        assert_eq!(
            SourceFormat::detect("https://example.com/trails.json?v=2", ""),
            SourceFormat::Json
        );
        assert_eq!(SourceFormat::detect("trails", "  \n[{}]"), SourceFormat::Json);
        assert_eq!(SourceFormat::detect("trails", "name,latitude"), SourceFormat::Csv);
    }

    #[test]
    fn test_json_records_stringify_values() {
        let text = r#"[
            {"name": " Valley Green ", "latitude": 40.0559, "longitude": "-75.2185", "dog_friendly": true, "comments": null}
        ]"#;
        let records = parse_records(text, SourceFormat::Json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "Valley Green");
        assert_eq!(records[0]["latitude"], "40.0559");
        assert_eq!(records[0]["longitude"], "-75.2185");
        assert_eq!(records[0]["dog_friendly"], "true");
        assert!(!records[0].contains_key("comments"));
    }

    #[test]
    fn test_json_records_wrapped_object() {
        let text = r#"{"locations": [{"name": "A", "latitude": 1, "longitude": 2}]}"#;
        let records = parse_records(text, SourceFormat::Json).unwrap();
        assert_eq!(records[0]["latitude"], "1");
    }

    #[test]
    fn test_json_records_errors() {
        assert!(parse_records("{\"trails\": []}", SourceFormat::Json).is_err());
        assert!(parse_records("[1, 2]", SourceFormat::Json).is_err());
        assert!(parse_records("not json", SourceFormat::Json).is_err());
    }

    #[test]
    fn test_csv_records_error_propagates() {
        let err = parse_records("name,latitude,longitude", SourceFormat::Csv).unwrap_err();
        assert_eq!(
            err.to_string(),
            "CSV must have at least a header row and one data row"
        );
    }

    #[test]
    fn test_parse_route_shapes() {
        let route = parse_route("[[40.0, -75.0], [40.1, -75.1]]").unwrap();
        assert_eq!(route.points.len(), 2);
        assert!(route.name.is_none());

        let route = parse_route(
            r#"{"name": "Loop", "points": [
                {"latitude": 40.0, "longitude": -75.0},
                {"lat": 40.1, "lng": -75.1},
                {"lat": 140.0, "lng": -75.1}
            ]}"#,
        )
        .unwrap();
        assert_eq!(route.name.as_deref(), Some("Loop"));
        assert_eq!(route.points.len(), 2);
        assert_eq!(route.points[1], LocationPoint::new(40.1, -75.1));
    }

    #[tokio::test]
    async fn test_load_locations_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trails.csv");
        std::fs::write(
            &path,
            "name,latitude,longitude\nA,40.0,-75.0\nB,abc,-75.0\nC,41.0,-76.0\n",
        )
        .unwrap();

        let locations = load_locations(path.to_str().unwrap()).await.unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[1].name, "C");
    }

    async fn serve_fixtures() -> String {
        use axum::{http::StatusCode, routing::get, Router};

        let app = Router::new()
            .route(
                "/trails.csv",
                get(|| async { "name,latitude,longitude\nA,40.0,-75.0\nB,95,-75.0\n" }),
            )
            .route(
                "/trails.json",
                get(|| async { r#"[{"name": "C", "latitude": 41.0, "longitude": -76.0}]"# }),
            )
            .route(
                "/missing.csv",
                get(|| async { (StatusCode::NOT_FOUND, "not here") }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_load_locations_over_http() {
        let base = serve_fixtures().await;

        let locations = load_locations(&format!("{}/trails.csv", base)).await.unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].name, "A");

        // the .json extension on the URL selects the JSON reader
        let locations = load_locations(&format!("{}/trails.json", base)).await.unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].latitude, 41.0);
    }

    #[tokio::test]
    async fn test_load_text_reports_http_status() {
        let base = serve_fixtures().await;

        let err = load_text(&format!("{}/missing.csv", base)).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to load data file: 404 Not Found");

        assert!(load_locations(&format!("{}/missing.csv", base)).await.is_err());
    }

    #[tokio::test]
    async fn test_load_locations_missing_file() {
        assert!(load_locations("/nonexistent/trails.csv").await.is_err());
    }
}
