use crate::sensors::Sensor;
use serde::Serialize;
use tracing::warn;

const CENTER: (f64, f64) = (19.0760, 72.8777);
const DEFAULT_ZOOM: u8 = 10;

const OSM_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const OSM_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
const OWM_ATTRIBUTION: &str = "&copy; <a href=\"https://openweathermap.org/\">OpenWeatherMap</a>";

/// (display name, OpenWeatherMap layer id)
const WEATHER_OVERLAYS: [(&str, &str); 4] = [
    ("Precipitation", "precipitation_new"),
    ("Clouds", "clouds_new"),
    ("Temperature", "temp_new"),
    ("Wind Speed", "wind_new"),
];

#[derive(Debug, Clone, Serialize)]
pub struct TileLayer {
    pub name: String,
    pub url_template: String,
    pub attribution: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lng: f64,
    pub color: &'static str,
    pub fill_opacity: f64,
    pub radius: u32,
    pub popup: String,
}

/// Everything the browser needs to draw the map widget
#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub center: (f64, f64),
    pub zoom: u8,
    pub base_layer: TileLayer,
    pub overlays: Vec<TileLayer>,
    pub markers: Vec<Marker>,
}

impl MapView {
    /// Weather overlays are only offered when an OpenWeatherMap key is configured.
    pub fn new(owm_api_key: Option<&str>, sensors: &[Sensor]) -> Self {
        let overlays = match owm_api_key.filter(|k| !k.trim().is_empty()) {
            Some(key) => weather_overlays(key),
            None => {
                warn!("OWM_API_KEY not set, weather overlays disabled");
                Vec::new()
            }
        };

        Self {
            center: CENTER,
            zoom: DEFAULT_ZOOM,
            base_layer: TileLayer {
                name: "OpenStreetMap".to_string(),
                url_template: OSM_TEMPLATE.to_string(),
                attribution: OSM_ATTRIBUTION.to_string(),
            },
            overlays,
            markers: sensors.iter().map(marker_for).collect(),
        }
    }
}

fn weather_overlays(api_key: &str) -> Vec<TileLayer> {
    WEATHER_OVERLAYS
        .iter()
        .map(|(name, layer)| TileLayer {
            name: name.to_string(),
            url_template: format!(
                "https://tile.openweathermap.org/map/{}/{{z}}/{{x}}/{{y}}.png?appid={}",
                layer, api_key
            ),
            attribution: OWM_ATTRIBUTION.to_string(),
        })
        .collect()
}

fn marker_for(sensor: &Sensor) -> Marker {
    Marker {
        lat: sensor.lat,
        lng: sensor.lng,
        color: sensor.status.marker_color(),
        fill_opacity: 0.5,
        radius: 8,
        popup: format!(
            "<b>{}</b><br>Status: {}",
            sensor.name,
            sensor.status.as_str().to_uppercase()
        ),
    }
}
