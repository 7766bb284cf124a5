use crate::controller::ControllerConfig;
use crate::ui::MAX_REFRESH_SECS;
use clap::Parser;
use std::time::Duration;

/// One day; longer timer periods are rejected at start-up
const MAX_INTERVAL_MS: u64 = 86_400_000;

/// Disaster monitoring dashboard service
#[derive(Debug, Clone, Parser)]
#[command(name = "dashboard", version, about)]
pub struct Config {
    /// Address of the HTTP API
    #[arg(long, env = "HTTP_ADDR", default_value = "0.0.0.0:8080")]
    pub http_addr: String,

    /// Telemetry refresh interval in milliseconds
    #[arg(long, env = "REFRESH_MS", default_value_t = 5000, value_parser = clap::value_parser!(u64).range(1..=MAX_REFRESH_SECS * 1000))]
    pub refresh_ms: u64,

    /// How often the random alert injector rolls, in milliseconds
    #[arg(long, env = "ALERT_INTERVAL_MS", default_value_t = 15000, value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_MS))]
    pub alert_interval_ms: u64,

    /// Chance that an injector roll raises an alert
    #[arg(long, env = "ALERT_PROBABILITY", default_value_t = 0.15, value_parser = parse_probability)]
    pub alert_probability: f64,

    /// OpenWeatherMap key for the weather map overlays
    #[arg(long, env = "OWM_API_KEY", hide_env_values = true)]
    pub owm_api_key: Option<String>,

    /// Raise the start-up sample alerts
    #[arg(long, env = "SAMPLE_ALERTS", default_value_t = true, action = clap::ArgAction::Set)]
    pub sample_alerts: bool,

    /// Capacity of the controller command channel
    #[arg(long, env = "CHANNEL_CAPACITY", default_value_t = 1024)]
    pub channel_capacity: usize,
}

impl Config {
    pub fn controller(&self) -> ControllerConfig {
        ControllerConfig {
            refresh: Duration::from_millis(self.refresh_ms),
            alert_interval: Duration::from_millis(self.alert_interval_ms),
            alert_probability: self.alert_probability.clamp(0.0, 1.0),
            sample_alerts: self.sample_alerts,
            channel_capacity: self.channel_capacity,
        }
    }
}

fn parse_probability(value: &str) -> Result<f64, String> {
    let probability: f64 = value.parse().map_err(|e| format!("{}", e))?;
    if probability.is_finite() {
        Ok(probability)
    } else {
        Err(format!("probability must be a finite number, got {}", value))
    }
}
