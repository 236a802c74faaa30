use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A parsed row before validation: trimmed header name to trimmed value.
pub type RawRecord = BTreeMap<String, String>;

pub const REQUIRED_FIELDS: [&str; 3] = ["name", "latitude", "longitude"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationPoint {
    /// Create a new location point
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Validate that coordinates are within valid GPS ranges
    pub fn is_valid(&self) -> bool {
        validate_coordinates(self.latitude, self.longitude)
    }
}

/// Check if a coordinate pair is inside [-90, 90] / [-180, 180]
pub fn validate_coordinates(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

/// A record that passed validation. Columns other than the required ones are
/// carried through untouched under `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl TrailLocation {
    /// Look up a field by name, including `name`. Empty values count as absent.
    pub fn field(&self, key: &str) -> Option<&str> {
        if key == "name" {
            return Some(self.name.as_str()).filter(|s| !s.is_empty());
        }
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::parse(self.field("difficulty").unwrap_or_default())
    }
}

/// Trail difficulty on a 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty(pub i64);

impl Difficulty {
    /// Leading-integer parse; anything unparsable (or zero) is level 1.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim_start();
        let (sign, digits) = match s.as_bytes().first() {
            Some(b'-') => (-1, &s[1..]),
            Some(b'+') => (1, &s[1..]),
            _ => (1, s),
        };
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        match digits[..end].parse::<i64>() {
            Ok(0) | Err(_) => Difficulty(1),
            Ok(n) => Difficulty(sign * n),
        }
    }

    pub fn level(&self) -> i64 {
        self.0
    }

    pub fn label(&self) -> &'static str {
        match self.0 {
            1 => "Very Easy",
            2 => "Easy",
            3 => "Moderate",
            4 => "Difficult",
            5 => "Very Difficult",
            _ => "Easy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("has invalid coordinates: lat={latitude}, lng={longitude}")]
    InvalidCoordinates { latitude: String, longitude: String },

    #[error(
        "has out-of-range coordinates: lat={}, lng={}",
        js_number(.latitude),
        js_number(.longitude)
    )]
    OutOfRange { latitude: f64, longitude: f64 },
}

/// Render a number the way a browser console prints it: `Infinity`, and
/// exponent notation with an explicit sign outside [1e-6, 1e21).
pub fn js_number(value: &f64) -> String {
    let value = *value;
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let exp = format!("{:e}", value);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}
