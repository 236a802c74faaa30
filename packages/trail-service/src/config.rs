use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    // Local path or http(s) URL of the CSV/JSON location file
    #[serde(default = "default_data_path")]
    pub data_path: String,

    // Optional JSON route drawn with the markers
    #[serde(default, deserialize_with = "empty_as_none")]
    pub route_path: Option<String>,

    #[serde(default = "default_center_lat")]
    pub map_center_lat: f64,

    #[serde(default = "default_center_lng")]
    pub map_center_lng: f64,

    #[serde(default = "default_zoom")]
    pub default_zoom: u8,

    // Upper zoom limit once the map is fitted to the markers
    #[serde(default = "default_max_fit_zoom")]
    pub max_fit_zoom: u8,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Config>()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            data_path: default_data_path(),
            route_path: None,
            map_center_lat: default_center_lat(),
            map_center_lng: default_center_lng(),
            default_zoom: default_zoom(),
            max_fit_zoom: default_max_fit_zoom(),
        }
    }
}

// `ROUTE_PATH=` in a .env file means no route
fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn default_port() -> u16 {
    3000
}

fn default_data_path() -> String {
    "data/trails.csv".to_string()
}

// Philadelphia
fn default_center_lat() -> f64 {
    40.0244751
}

fn default_center_lng() -> f64 {
    -75.2311484
}

fn default_zoom() -> u8 {
    6
}

fn default_max_fit_zoom() -> u8 {
    15
}
